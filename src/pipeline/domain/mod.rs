//! Domain model for the deal pipeline.
//!
//! Deals, stages, probabilities and the notes log are plain values with no
//! infrastructure dependencies. The stage registry is read-only once built.

mod deal;
mod error;
mod ids;
pub mod notes;
mod probability;
mod stage;
mod value;

pub use deal::{Deal, DealDraft, DealPatch, DealPriority, PersistedDealData};
pub use error::{ParsePriorityError, PipelineDomainError, PipelineDomainResult, StageNotFound};
pub use ids::{DealId, StageId};
pub use notes::{AuditEntry, NotesLog};
pub use probability::{Probability, known_suggested_probability, suggested_probability_for};
pub use stage::{Stage, StageRegistry};
pub use value::DealValue;
