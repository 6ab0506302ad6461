//! Unit tests for the deal pipeline.


use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::pipeline::{
    adapters::memory::{InMemoryDealStore, RecordingNotificationSink, ScriptedConfirmationSurface},
    domain::{
        Deal, DealDraft, DealId, DealPatch, DealPriority, DealValue, PersistedDealData,
        Probability, StageId,
    },
    ports::{DealStore, DealStoreResult},
    services::{DealCollection, StageTransitionService},
};

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) fn fixed_clock() -> FixedClock {
    FixedClock(
        Utc.with_ymd_and_hms(2024, 3, 14, 9, 30, 0)
            .single()
            .expect("valid fixed timestamp"),
    )
}

pub(super) fn stage(id: &str) -> StageId {
    StageId::new(id).expect("valid stage id")
}

pub(super) fn probability(value: u8) -> Probability {
    Probability::new(value).expect("valid probability")
}

/// Builds a persisted deal record.
pub(super) fn deal(name: &str, company: Option<&str>, stage_id: &str, notes: Option<&str>) -> Deal {
    let timestamp = fixed_clock().0;
    Deal::from_persisted(PersistedDealData {
        id: DealId::new(),
        name: name.to_owned(),
        company: company.map(str::to_owned),
        value: DealValue::from_cents(1_000_000),
        priority: DealPriority::Medium,
        stage: stage(stage_id),
        probability: probability(10),
        expected_close_date: None,
        days_in_stage: 4,
        last_activity: None,
        notes: notes.map(str::to_owned),
        created_at: timestamp,
        updated_at: timestamp,
    })
}

pub(super) type TestEngine = StageTransitionService<
    InMemoryDealStore<FixedClock>,
    ScriptedConfirmationSurface,
    RecordingNotificationSink,
    FixedClock,
>;

/// Engine wired to in-memory adapters sharing one seeded collection.
pub(super) struct Harness {
    pub engine: TestEngine,
    pub store: InMemoryDealStore<FixedClock>,
    pub surface: ScriptedConfirmationSurface,
    pub sink: RecordingNotificationSink,
    pub collection: DealCollection,
}

pub(super) fn harness(deals: Vec<Deal>) -> Harness {
    let clock = Arc::new(fixed_clock());
    let store = InMemoryDealStore::with_clock(Arc::clone(&clock));
    store.seed(deals.clone()).expect("seed store");
    let collection = DealCollection::new();
    collection.replace_all(deals);
    let surface = ScriptedConfirmationSurface::default();
    let sink = RecordingNotificationSink::new();

    let engine = StageTransitionService::new(
        Arc::new(store.clone()),
        Arc::new(surface.clone()),
        Arc::new(sink.clone()),
        clock,
        collection.clone(),
    );

    Harness {
        engine,
        store,
        surface,
        sink,
        collection,
    }
}

mockall::mock! {
    pub Store {}

    #[async_trait]
    impl DealStore for Store {
        async fn fetch_deals(&self) -> DealStoreResult<Vec<Deal>>;
        async fn create_deal(&self, draft: &DealDraft) -> DealStoreResult<Deal>;
        async fn update_deal(&self, id: DealId, patch: &DealPatch) -> DealStoreResult<Deal>;
    }
}
