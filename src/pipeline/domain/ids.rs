//! Identifier types for the pipeline domain.

use super::{PipelineDomainError, PipelineDomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque unique identifier for a deal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(Uuid);

impl DealId {
    /// Creates a new random deal identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deal identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for DealId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for DealId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a pipeline stage, such as `prospecting` or `closed-won`.
///
/// A `StageId` is not guaranteed to name a registered stage. Records loaded
/// from the store may carry identifiers the registry does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(String);

impl StageId {
    /// Creates a stage identifier, normalised to trimmed lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::EmptyStageId`] when the value is blank.
    pub fn new(value: impl AsRef<str>) -> PipelineDomainResult<Self> {
        let normalized = value.as_ref().trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(PipelineDomainError::EmptyStageId);
        }
        Ok(Self(normalized))
    }

    /// Creates a stage identifier from a literal known to be valid.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StageId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
