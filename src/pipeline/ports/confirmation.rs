//! Confirmation surface port: the user-facing approval step that gates each
//! stage transition.

use crate::pipeline::domain::{DealId, PipelineDomainResult, Probability};
use async_trait::async_trait;

/// Everything the surface shows when asking the user to confirm a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPrompt {
    /// Deal being moved.
    pub deal_id: DealId,
    /// Deal display name.
    pub deal_name: String,
    /// Human-readable source stage name.
    pub from_stage_name: String,
    /// Human-readable target stage name.
    pub to_stage_name: String,
    /// Editable default for the probability field.
    pub suggested_probability: Probability,
}

/// Result returned by the confirmation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationDecision {
    /// The user approved the move.
    Confirm {
        /// Probability to record, possibly edited by the user.
        probability: Probability,
        /// Optional free-text annotation.
        annotation: Option<String>,
    },
    /// The user dismissed the surface.
    Cancel,
}

impl ConfirmationDecision {
    /// Builds a confirm decision.
    #[must_use]
    pub fn confirm(probability: Probability, annotation: Option<&str>) -> Self {
        Self::Confirm {
            probability,
            annotation: annotation.map(str::to_owned),
        }
    }

    /// Builds a confirm decision from raw form input.
    ///
    /// The probability field must hold an integer from 0 to 100. Invalid
    /// input is rejected here and never clamped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::pipeline::domain::PipelineDomainError::InvalidProbability`]
    /// when the probability input is not a valid percentage.
    pub fn from_form(raw_probability: &str, annotation: &str) -> PipelineDomainResult<Self> {
        let probability = Probability::parse(raw_probability)?;
        let trimmed = annotation.trim();
        Ok(Self::Confirm {
            probability,
            annotation: (!trimmed.is_empty()).then(|| annotation.to_owned()),
        })
    }

    /// Accepts the prompt's suggestion without an annotation.
    #[must_use]
    pub const fn accept_suggestion(prompt: &TransitionPrompt) -> Self {
        Self::Confirm {
            probability: prompt.suggested_probability,
            annotation: None,
        }
    }
}

/// Surface that asks the user to approve a stage transition.
///
/// Implementations may take arbitrarily long to answer. There is no timeout.
/// Dropping the returned future abandons the request.
#[async_trait]
pub trait ConfirmationSurface: Send + Sync {
    /// Presents `prompt` and waits for the user's decision.
    async fn confirm(&self, prompt: &TransitionPrompt) -> ConfirmationDecision;
}
