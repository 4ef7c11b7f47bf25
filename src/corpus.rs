//! Corpus I/O: normalized poem JSON in, annotated poem JSON out.
//!
//! Input is a directory of `*.json` files, one [`NormalizedPoem`] each.
//! Output is one pretty-printed [`AnnotatedPoem`] per poem id. Files are
//! processed in sorted order and the report is folded in that order, so a
//! rerun over the same inputs yields the same report and the same bytes.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::errors::{AnnotateError, Result};
use crate::pipeline::{AnnotatedPoem, Annotator, ErrorCode, NormalizedPoem, PoemFailure, RunReport};

/// Options for [`annotate_corpus`].
#[derive(Debug, Clone, Default)]
pub struct CorpusOptions {
    /// Annotate at most `n` poems, in input order
    pub limit: Option<usize>,
    /// Leave poems whose output file already exists untouched
    pub skip_existing: bool,
}

enum Outcome {
    Annotated(AnnotatedPoem),
    Existing,
    Failed(PoemFailure),
}

/// Sorted `*.json` files directly under `dir`.
pub fn list_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| AnnotateError::io(dir, &e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| AnnotateError::io(dir, &e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read one normalized poem. Unreadable or malformed records are reported
/// under the file stem.
pub fn read_poem(path: &Path) -> std::result::Result<NormalizedPoem, PoemFailure> {
    let text = fs::read_to_string(path).map_err(|e| {
        PoemFailure::new(file_stem(path), ErrorCode::IoFailed, "", format!("{}: {e}", path.display()))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        PoemFailure::new(file_stem(path), ErrorCode::InvalidRecord, "", e.to_string())
            .with_hint("Expected {\"id\", \"stanzas\": [[{\"raw\", \"normalized\"}]]}")
    })
}

/// Output file for a poem id. Characters outside `[A-Za-z0-9._-]` become `_`.
pub fn output_path(dir: &Path, poem_id: &str) -> PathBuf {
    let name: String = poem_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = if name.is_empty() || name.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        name
    };
    dir.join(format!("{name}.json"))
}

/// Write an annotated poem as pretty JSON with a trailing newline.
pub fn write_poem(path: &Path, poem: &AnnotatedPoem) -> Result<()> {
    let mut json = serde_json::to_string_pretty(poem)?;
    json.push('\n');
    fs::write(path, json).map_err(|e| AnnotateError::io(path, &e))
}

fn annotate_one(annotator: &Annotator, poem: &NormalizedPoem, output: &Path) -> Outcome {
    let annotated = match annotator.annotate_poem(poem) {
        Ok(annotated) => annotated,
        Err(failure) => return Outcome::Failed(failure),
    };

    let target = output_path(output, &poem.id);
    match write_poem(&target, &annotated) {
        Ok(()) => Outcome::Annotated(annotated),
        Err(err) => Outcome::Failed(PoemFailure::new(
            &poem.id,
            ErrorCode::IoFailed,
            "",
            err.to_string(),
        )),
    }
}

/// Annotate every poem under `input`, writing results to `output`.
///
/// Per-poem problems are collected in the returned report. Only a missing
/// input directory, an unwritable output directory, or a thread-pool
/// failure abort the run.
///
/// With `skip_existing`, poems whose output already exists are set aside
/// before `limit` applies, so repeated limited runs work through the corpus.
pub fn annotate_corpus(
    annotator: &Annotator,
    input: &Path,
    output: &Path,
    options: &CorpusOptions,
) -> Result<RunReport> {
    let mut paths = list_inputs(input)?;
    if !options.skip_existing {
        if let Some(limit) = options.limit {
            paths.truncate(limit);
        }
    }
    fs::create_dir_all(output).map_err(|e| AnnotateError::io(output, &e))?;

    tracing::info!(inputs = paths.len(), input = %input.display(), output = %output.display(), "annotating corpus");

    let outcomes: Vec<Outcome> = annotator.config().batch.scoped(|| {
        let loaded: Vec<_> = paths.par_iter().map(|path| read_poem(path)).collect();

        let mut outcomes = Vec::with_capacity(loaded.len());
        let mut pending = Vec::with_capacity(loaded.len());
        for item in loaded {
            match item {
                Ok(poem) if options.skip_existing && output_path(output, &poem.id).exists() => {
                    tracing::debug!(poem_id = %poem.id, "output exists, skipping");
                    outcomes.push(Outcome::Existing);
                }
                other => pending.push(other),
            }
        }
        if let Some(limit) = options.limit {
            pending.truncate(limit);
        }

        let annotated: Vec<Outcome> = pending
            .into_par_iter()
            .map(|item| match item {
                Ok(poem) => annotate_one(annotator, &poem, output),
                Err(failure) => Outcome::Failed(failure),
            })
            .collect();
        outcomes.extend(annotated);
        outcomes
    })?;

    let mut report = RunReport::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Annotated(poem) => report.record_poem(&poem),
            Outcome::Existing => report.record_existing(),
            Outcome::Failed(failure) => {
                tracing::warn!(
                    poem_id = %failure.poem_id,
                    code = %failure.code,
                    "skipping poem: {}",
                    failure.message
                );
                report.record_failure(failure);
            }
        }
    }

    tracing::info!(
        annotated = report.poems_annotated,
        skipped = report.poems_skipped,
        existing = report.poems_already_done,
        degraded_lines = report.degraded_lines,
        unresolved_words = report.unresolved_words,
        irregular_lines = report.irregular_lines,
        "corpus complete"
    );
    Ok(report)
}
