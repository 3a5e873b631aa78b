//! Error taxonomy for the analysis pipeline.
//!
//! Every failure here is scoped to a single source unit or fixture. Nothing
//! in the library terminates the process; the binary decides exit codes.
//!
//! - `ParseError`: malformed syntax, located by byte offset
//! - `NormalizationError`: a syntax shape with no structural mapping
//! - `GoldenError`: fixture lookup, analysis, or golden-artifact problems
//! - `ConfigError`: configuration loading and validation

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Syntax error reported by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("parse error at byte {offset} (line {line}, column {column}): {message}")]
pub struct ParseError {
    pub offset: usize,
    /// 1-based line of `offset`.
    pub line: usize,
    /// 1-based column of `offset`.
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(offset: usize, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            line,
            column,
            message: message.into(),
        }
    }
}

/// A CST shape the normalizer has no rule for.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("cannot normalize {construct} at byte {offset}: {message}")]
pub struct NormalizationError {
    pub construct: String,
    pub offset: usize,
    pub message: String,
}

impl NormalizationError {
    pub fn new(construct: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Self {
            construct: construct.into(),
            offset,
            message: message.into(),
        }
    }
}

/// Failure of one `analyze` call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),
}

impl AnalysisError {
    /// Byte offset the failure points at.
    pub fn offset(&self) -> usize {
        match self {
            AnalysisError::Parse(e) => e.offset,
            AnalysisError::Normalization(e) => e.offset,
        }
    }
}

/// Failures of golden comparison other than a metric mismatch.
///
/// A mismatch is a result (`GoldenMismatch`), not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum GoldenError {
    #[error("fixture '{id}' not found")]
    FixtureNotFound { id: String },

    #[error("fixture '{id}' could not be analyzed: {source}")]
    Analysis {
        id: String,
        #[source]
        source: AnalysisError,
    },

    #[error("golden artifact for '{id}' is malformed: {message}")]
    MalformedGolden { id: String, message: String },
}

impl GoldenError {
    pub fn fixture_id(&self) -> &str {
        match self {
            GoldenError::FixtureNotFound { id }
            | GoldenError::Analysis { id, .. }
            | GoldenError::MalformedGolden { id, .. } => id,
        }
    }
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}
