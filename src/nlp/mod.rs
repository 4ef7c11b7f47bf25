//! Text handling: tokenization and normalization of verse lines.

pub mod normalize;
pub mod tokenizer;

pub use normalize::{key_variants, normalize_key, normalize_line};
pub use tokenizer::{is_function_word, VerseTokenizer, WordToken};
