//! Confirmation surface that replays scripted decisions.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::pipeline::ports::{ConfirmationDecision, ConfirmationSurface, TransitionPrompt};

/// Answers prompts from a queue of prepared decisions.
///
/// Each prompt consumes one decision. Once the queue is empty, every prompt
/// is cancelled. Prompts are recorded so tests can check what the user was
/// shown.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirmationSurface {
    state: Arc<Mutex<ScriptedState>>,
}

#[derive(Debug, Default)]
struct ScriptedState {
    decisions: VecDeque<ConfirmationDecision>,
    prompts: Vec<TransitionPrompt>,
}

impl ScriptedConfirmationSurface {
    /// Creates a surface that answers with `decisions` in order.
    #[must_use]
    pub fn new(decisions: impl IntoIterator<Item = ConfirmationDecision>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptedState {
                decisions: decisions.into_iter().collect(),
                prompts: Vec::new(),
            })),
        }
    }

    /// Queues another decision.
    pub fn push(&self, decision: ConfirmationDecision) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .decisions
            .push_back(decision);
    }

    /// Returns the prompts presented so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<TransitionPrompt> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .prompts
            .clone()
    }
}

#[async_trait]
impl ConfirmationSurface for ScriptedConfirmationSurface {
    async fn confirm(&self, prompt: &TransitionPrompt) -> ConfirmationDecision {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.prompts.push(prompt.clone());
        state
            .decisions
            .pop_front()
            .unwrap_or(ConfirmationDecision::Cancel)
    }
}
