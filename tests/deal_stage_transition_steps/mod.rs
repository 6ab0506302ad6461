//! Step definitions for deal stage transition scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
