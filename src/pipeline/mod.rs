//! Annotation pipeline: input validation, orchestration, and reporting.
//!
//! ## Submodules
//!
//! - [`artifacts`]: Input and output records
//! - [`validation`]: Rule-based checks on input poems
//! - [`runner`]: The [`Annotator`] and its batch runner
//! - [`report`]: Per-run statistics
//! - [`errors`], [`error_code`]: Poem-level failures

pub mod artifacts;
pub mod error_code;
pub mod errors;
pub mod report;
pub mod runner;
pub mod validation;

pub use artifacts::{
    AnnotatedLine, AnnotatedPoem, AnnotatedStanza, InputLine, NormalizedPoem, WordPhonology,
};
pub use error_code::ErrorCode;
pub use errors::PoemFailure;
pub use report::RunReport;
pub use runner::{Annotator, BatchOutcome};
pub use validation::{Severity, ValidationEngine, ValidationReport, ValidationRule};
