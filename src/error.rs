//! Error type for metric computation and tooltip formatting.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RocError {
    /// Malformed input: empty or mismatched sequences, non-binary labels,
    /// a single class, NaN scores, or negative confusion-matrix counts.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, RocError>;
