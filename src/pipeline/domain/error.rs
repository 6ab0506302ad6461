//! Error types for pipeline domain validation and parsing.

use super::StageId;
use thiserror::Error;

/// Errors returned while constructing domain deal values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineDomainError {
    /// The deal name is empty after trimming.
    #[error("deal name must not be empty")]
    EmptyDealName,

    /// The probability is not an integer between 0 and 100.
    #[error("invalid probability '{0}', expected an integer between 0 and 100")]
    InvalidProbability(String),

    /// The monetary value is negative or not a number.
    #[error("invalid deal value '{0}', expected a non-negative amount")]
    InvalidDealValue(String),

    /// The stage identifier is empty after trimming.
    #[error("stage identifier must not be empty")]
    EmptyStageId,
}

/// Result type for pipeline domain constructors.
pub type PipelineDomainResult<T> = Result<T, PipelineDomainError>;

/// Returned when a stage identifier is not present in the registry.
///
/// Callers hide or ignore the affected deal instead of failing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown pipeline stage: {0}")]
pub struct StageNotFound(pub StageId);

/// Error returned while parsing deal priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown deal priority: {0}")]
pub struct ParsePriorityError(pub String);
