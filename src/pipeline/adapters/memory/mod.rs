//! In-memory adapter implementations for testing.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! unit testing without a remote store or a user interface.

mod confirmation;
mod notification;
mod store;

pub use confirmation::ScriptedConfirmationSurface;
pub use notification::RecordingNotificationSink;
pub use store::InMemoryDealStore;
