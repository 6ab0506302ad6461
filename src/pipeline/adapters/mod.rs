//! Adapter implementations for the pipeline ports.

pub mod memory;

mod channel;
mod log_sink;

pub use channel::{ChannelConfirmationSurface, ConfirmationRequest};
pub use log_sink::TracingNotificationSink;
