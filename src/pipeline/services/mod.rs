//! Application services for the deal pipeline.

mod board;
mod collection;
mod transition;
mod view;

pub use board::{BoardError, BoardResult, PipelineBoardService};
pub use collection::{DealCollection, DealSnapshot};
pub use transition::{
    DropEvent, IgnoreReason, PendingTransition, Proposal, StageTransitionService,
    TransitionError, TransitionOutcome, TransitionResult,
};
pub use view::{PipelineBoard, PipelineView, StageColumn, StageFilter};
