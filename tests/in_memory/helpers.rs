//! Shared fixtures for in-memory pipeline integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use dealflow::pipeline::{
    adapters::memory::{InMemoryDealStore, RecordingNotificationSink, ScriptedConfirmationSurface},
    domain::{Deal, DealDraft, DealId, DealPatch, DealValue, StageId},
    ports::{DealStore, DealStoreError, DealStoreResult},
    services::{DealCollection, PipelineBoardService, StageTransitionService},
};
use mockable::DefaultClock;

/// Board service over the in-memory store.
pub type TestBoard = PipelineBoardService<InMemoryDealStore, RecordingNotificationSink>;

/// Transition engine over the in-memory adapters.
pub type TestEngine = StageTransitionService<
    InMemoryDealStore,
    ScriptedConfirmationSurface,
    RecordingNotificationSink,
    DefaultClock,
>;

/// Services wired to one store, one sink and one shared collection.
pub struct Pipeline {
    pub store: InMemoryDealStore,
    pub sink: RecordingNotificationSink,
    pub surface: ScriptedConfirmationSurface,
    pub board: TestBoard,
    pub engine: TestEngine,
}

/// Builds the services over a fresh store.
#[must_use]
pub fn pipeline() -> Pipeline {
    let store = InMemoryDealStore::new();
    let sink = RecordingNotificationSink::new();
    let surface = ScriptedConfirmationSurface::default();
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
    Pipeline {
        store,
        sink,
        surface,
        board,
        engine,
    }
}

/// Parses a stage identifier.
///
/// # Errors
///
/// Returns an error when the identifier is blank.
pub fn stage(id: &str) -> eyre::Result<StageId> {
    Ok(StageId::new(id)?)
}

/// Builds a draft with a company and a whole-dollar value.
///
/// # Errors
///
/// Returns an error when the name or stage is blank.
pub fn draft(name: &str, company: &str, stage_id: &str, dollars: u64) -> eyre::Result<DealDraft> {
    Ok(DealDraft::new(name, stage(stage_id)?)?
        .with_company(company)
        .with_value(DealValue::from_units(dollars)?))
}

/// Store whose every call fails, standing in for an unreachable backend.
#[derive(Debug, Default)]
pub struct UnreachableStore;

#[async_trait]
impl DealStore for UnreachableStore {
    async fn fetch_deals(&self) -> DealStoreResult<Vec<Deal>> {
        Err(DealStoreError::rejected("store unreachable"))
    }

    async fn create_deal(&self, _draft: &DealDraft) -> DealStoreResult<Deal> {
        Err(DealStoreError::rejected("store unreachable"))
    }

    async fn update_deal(&self, _id: DealId, _patch: &DealPatch) -> DealStoreResult<Deal> {
        Err(DealStoreError::rejected("store unreachable"))
    }
}
