//! Port contracts for the deal pipeline.
//!
//! Ports define the collaborators the pipeline core consumes: the record
//! store, the confirmation surface and the notification sink.

pub mod confirmation;
pub mod notification;
pub mod store;

pub use confirmation::{ConfirmationDecision, ConfirmationSurface, TransitionPrompt};
pub use notification::{Notification, NotificationLevel, NotificationSink};
pub use store::{DealStore, DealStoreError, DealStoreResult};
