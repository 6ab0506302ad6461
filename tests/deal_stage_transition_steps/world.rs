//! Shared world state for deal stage transition BDD scenarios.

use std::sync::Arc;

use dealflow::pipeline::{
    adapters::memory::{InMemoryDealStore, RecordingNotificationSink, ScriptedConfirmationSurface},
    domain::{Deal, DealId},
    services::{
        DealCollection, PipelineBoardService, StageTransitionService, TransitionOutcome,
        TransitionResult,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Engine type used by the BDD world.
pub type TestEngine = StageTransitionService<
    InMemoryDealStore,
    ScriptedConfirmationSurface,
    RecordingNotificationSink,
    DefaultClock,
>;

/// Scenario world for deal transition behaviour tests.
pub struct DealTransitionWorld {
    pub store: InMemoryDealStore,
    pub surface: ScriptedConfirmationSurface,
    pub sink: RecordingNotificationSink,
    pub board: PipelineBoardService<InMemoryDealStore, RecordingNotificationSink>,
    pub engine: TestEngine,
    pub deal_id: Option<DealId>,
    pub last_outcome: Option<TransitionResult<TransitionOutcome>>,
}

impl DealTransitionWorld {
    /// Creates a world with an empty store and board.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryDealStore::new();
        let surface = ScriptedConfirmationSurface::default();
        let sink = RecordingNotificationSink::new();
        let collection = DealCollection::new();
        let board = PipelineBoardService::new(
            Arc::new(store.clone()),
            Arc::new(sink.clone()),
            collection.clone(),
        );
        let engine = StageTransitionService::new(
            Arc::new(store.clone()),
            Arc::new(surface.clone()),
            Arc::new(sink.clone()),
            Arc::new(DefaultClock),
            collection,
        );

        Self {
            store,
            surface,
            sink,
            board,
            engine,
            deal_id: None,
            last_outcome: None,
        }
    }

    /// Returns the scenario's deal identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when no deal was created.
    pub fn deal_id(&self) -> eyre::Result<DealId> {
        self.deal_id
            .ok_or_else(|| eyre::eyre!("missing deal in scenario world"))
    }

    /// Returns the scenario's deal as the board currently holds it.
    ///
    /// # Errors
    ///
    /// Returns an error when the deal is not in the collection.
    pub fn current_deal(&self) -> eyre::Result<Deal> {
        let deal_id = self.deal_id()?;
        self.board
            .collection()
            .get(deal_id)
            .ok_or_else(|| eyre::eyre!("deal {deal_id} missing from collection"))
    }
}

impl Default for DealTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DealTransitionWorld {
    DealTransitionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
