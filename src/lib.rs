//! Dealflow: sales pipeline stage-transition engine.
//!
//! This crate moves deals between pipeline stages behind a user
//! confirmation step, records each move in the deal's append-only notes log,
//! and derives the grouped board view from the persisted deal set.
//!
//! # Architecture
//!
//! Dealflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the record store, the
//!   confirmation surface and the notification sink
//! - **Adapters**: Concrete implementations of ports (in-memory, channels,
//!   tracing)
//!
//! # Modules
//!
//! - [`pipeline`]: Stage registry, board view model and transition engine
//! - [`config`]: Runtime configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod pipeline;
pub mod telemetry;
