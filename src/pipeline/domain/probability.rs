//! Close-probability percentage and the per-stage suggestion table.

use super::{PipelineDomainError, PipelineDomainResult, StageId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability of closing a deal, as an integer percentage from 0 to 100.
///
/// Values outside the range are rejected rather than clamped, so an
/// out-of-range edit on the confirmation surface never reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Probability(u8);

impl Probability {
    /// Largest accepted percentage.
    pub const MAX: u8 = 100;

    /// Suggestion used for stages that are missing from the table.
    pub const DEFAULT_SUGGESTION: Self = Self(50);

    /// Creates a validated probability.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::InvalidProbability`] when the value
    /// exceeds 100.
    pub fn new(value: u8) -> PipelineDomainResult<Self> {
        if value > Self::MAX {
            return Err(PipelineDomainError::InvalidProbability(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parses user input such as `"75"` into a probability.
    ///
    /// Surrounding whitespace is ignored. Fractions, signs and other
    /// non-numeric input are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::InvalidProbability`] when the input is
    /// not an integer between 0 and 100.
    pub fn parse(raw: &str) -> PipelineDomainResult<Self> {
        let trimmed = raw.trim();
        let is_digits = !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit());
        if !is_digits {
            return Err(PipelineDomainError::InvalidProbability(raw.to_owned()));
        }
        let value: u8 = trimmed
            .parse()
            .map_err(|_| PipelineDomainError::InvalidProbability(raw.to_owned()))?;
        Self::new(value)
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Probability {
    type Error = PipelineDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for u8 {
    fn from(value: Probability) -> Self {
        value.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Returns the tabled suggestion for a stage, or `None` when the stage is
/// not one of the standard pipeline stages.
#[must_use]
pub fn known_suggested_probability(stage: &StageId) -> Option<Probability> {
    let percent = match stage.as_str() {
        "prospecting" => 10,
        "qualification" => 25,
        "proposal" => 50,
        "negotiation" => 75,
        "closed-won" => 100,
        "closed-lost" => 0,
        _ => return None,
    };
    Some(Probability(percent))
}

/// Suggested close probability for a deal newly entering `stage`.
///
/// Stages outside the standard table fall back to
/// [`Probability::DEFAULT_SUGGESTION`].
#[must_use]
pub fn suggested_probability_for(stage: &StageId) -> Probability {
    known_suggested_probability(stage).unwrap_or(Probability::DEFAULT_SUGGESTION)
}
