//! Runs one stage change against an in-memory store and logs the board.
//!
//! Usage:
//!
//! ```text
//! pipeline_demo [annotation]
//! ```
//!
//! Configuration comes from `DEALFLOW_*` environment variables. The
//! confirmation surface answers from a separate task, the same way an
//! interactive front end would.

use std::env;
use std::sync::Arc;

use dealflow::config::PipelineConfig;
use dealflow::pipeline::{
    adapters::{ChannelConfirmationSurface, TracingNotificationSink, memory::InMemoryDealStore},
    domain::{DealDraft, DealPriority, DealValue, StageId},
    ports::ConfirmationDecision,
    services::{
        DealCollection, DropEvent, PipelineBoardService, StageTransitionService, TransitionOutcome,
    },
};
use dealflow::telemetry::init_tracing;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::info;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum DemoError {
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error("demo deal was not created")]
    MissingDeal,
}

fn main() -> Result<(), BoxError> {
    let config = PipelineConfig::from_env()?;
    init_tracing(config.log_filter.as_deref())?;
    let annotation = env::args().nth(1).unwrap_or_default();

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(DemoError::RuntimeInit)?;
    runtime.block_on(run(config, annotation))
}

async fn run(config: PipelineConfig, annotation: String) -> Result<(), BoxError> {
    let store = Arc::new(InMemoryDealStore::new());
    let notifier = Arc::new(TracingNotificationSink);
    let collection = DealCollection::new();
    let (surface, mut requests) = ChannelConfirmationSurface::new();

    let board_service =
        PipelineBoardService::new(Arc::clone(&store), Arc::clone(&notifier), collection.clone());
    let engine = StageTransitionService::new(
        store,
        Arc::new(surface),
        notifier,
        Arc::new(mockable::DefaultClock),
        collection,
    )
    .with_config(config);

    let prospecting = StageId::new("prospecting")?;
    let draft = DealDraft::new("Enterprise Software License", prospecting)?
        .with_company("TechCorp Inc.")
        .with_value(DealValue::from_units(75_000)?)
        .with_priority(DealPriority::High);
    board_service.create_deal(&draft).await?;
    board_service.load().await?;

    let deal_id = collection_first(&board_service)?;

    let responder = tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            let prompt = request.prompt().clone();
            info!(
                deal = %prompt.deal_name,
                from = %prompt.from_stage_name,
                to = %prompt.to_stage_name,
                suggested = prompt.suggested_probability.value(),
                "confirming stage change"
            );
            let decision = ConfirmationDecision::confirm(
                prompt.suggested_probability,
                Some(annotation.as_str()),
            );
            if !request.respond(decision) {
                info!("engine abandoned the request");
            }
        }
    });

    let outcome = engine
        .handle_drop(DropEvent::new(deal_id, StageId::new("negotiation")?))
        .await?;
    if let TransitionOutcome::Completed(deal) = &outcome {
        info!(notes = deal.notes().unwrap_or_default(), "audit log");
    }
    drop(engine);
    responder.await?;

    let view = board_service.board().view();
    for column in view.columns() {
        info!(
            stage = column.stage().name(),
            count = column.count(),
            total = %column.total_value(),
            "column"
        );
    }
    info!(
        total = %view.total_value(),
        weighted = %view.weighted_value(),
        "pipeline"
    );
    Ok(())
}

fn collection_first<S, N>(
    service: &PipelineBoardService<S, N>,
) -> Result<dealflow::pipeline::domain::DealId, DemoError>
where
    S: dealflow::pipeline::ports::DealStore,
    N: dealflow::pipeline::ports::NotificationSink,
{
    service
        .collection()
        .snapshot()
        .deals()
        .first()
        .map(dealflow::pipeline::domain::Deal::id)
        .ok_or(DemoError::MissingDeal)
}
