//! Confirmation surface backed by tokio channels.
//!
//! The engine side sends each prompt over an unbounded channel and waits on
//! a oneshot reply. The interface side receives [`ConfirmationRequest`]s
//! from its event loop and answers them whenever the user decides.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::pipeline::ports::{ConfirmationDecision, ConfirmationSurface, TransitionPrompt};

/// One outstanding prompt waiting for the user's answer.
#[derive(Debug)]
pub struct ConfirmationRequest {
    prompt: TransitionPrompt,
    reply: oneshot::Sender<ConfirmationDecision>,
}

impl ConfirmationRequest {
    /// Returns the prompt to render.
    #[must_use]
    pub const fn prompt(&self) -> &TransitionPrompt {
        &self.prompt
    }

    /// Sends the user's decision back to the engine.
    ///
    /// Returns `false` when the engine has already abandoned the request.
    #[must_use]
    pub fn respond(self, decision: ConfirmationDecision) -> bool {
        self.reply.send(decision).is_ok()
    }
}

/// Confirmation surface whose answers come from another task.
///
/// Dropping the receiving half, or a request without answering it, counts
/// as a cancellation.
#[derive(Debug, Clone)]
pub struct ChannelConfirmationSurface {
    sender: mpsc::UnboundedSender<ConfirmationRequest>,
}

impl ChannelConfirmationSurface {
    /// Creates a surface and the receiver the interface loop reads from.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ConfirmationRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ConfirmationSurface for ChannelConfirmationSurface {
    async fn confirm(&self, prompt: &TransitionPrompt) -> ConfirmationDecision {
        let (reply, answer) = oneshot::channel();
        let request = ConfirmationRequest {
            prompt: prompt.clone(),
            reply,
        };
        if self.sender.send(request).is_err() {
            debug!(deal_id = %prompt.deal_id, "confirmation surface closed; cancelling");
            return ConfirmationDecision::Cancel;
        }
        answer.await.unwrap_or_else(|_| {
            debug!(deal_id = %prompt.deal_id, "confirmation request dropped; cancelling");
            ConfirmationDecision::Cancel
        })
    }
}
