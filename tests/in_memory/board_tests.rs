//! Loading and creating deals through the board service.

use std::sync::Arc;

use dealflow::pipeline::{
    adapters::memory::RecordingNotificationSink,
    ports::NotificationLevel,
    services::{BoardError, DealCollection, PipelineBoardService, StageFilter},
};
use eyre::{OptionExt, ensure};
use rstest::rstest;

use super::helpers::{UnreachableStore, draft, pipeline, stage};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_deals_appear_first() -> eyre::Result<()> {
    let services = pipeline();

    services
        .board
        .create_deal(&draft("Acme Renewal", "Acme", "prospecting", 75_000)?)
        .await?;
    let newest = services
        .board
        .create_deal(&draft("Beta Expansion", "Beta", "proposal", 1_200)?)
        .await?;

    let snapshot = services.board.collection().snapshot();
    ensure!(snapshot.deals().len() == 2);
    ensure!(snapshot.deals().first().map(|deal| deal.id()) == Some(newest.id()));
    ensure!(services.sink.count(NotificationLevel::Success) == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_replaces_collection_with_store_contents() -> eyre::Result<()> {
    let services = pipeline();
    services
        .board
        .create_deal(&draft("Acme Renewal", "Acme", "prospecting", 75_000)?)
        .await?;
    let other = pipeline();

    let loaded = PipelineBoardService::new(
        Arc::new(services.store.clone()),
        Arc::new(other.sink.clone()),
        other.board.collection().clone(),
    )
    .load()
    .await?;

    ensure!(loaded == 1);
    ensure!(other.board.collection().snapshot().deals().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_load_keeps_collection_and_notifies() -> eyre::Result<()> {
    let sink = RecordingNotificationSink::new();
    let collection = DealCollection::new();
    let board = PipelineBoardService::new(
        Arc::new(UnreachableStore),
        Arc::new(sink.clone()),
        collection.clone(),
    );
    let version = collection.version();

    let result = board.load().await;

    ensure!(matches!(result, Err(BoardError::Store(_))));
    ensure!(collection.version() == version);
    let notifications = sink.notifications();
    let toast = notifications.first().ok_or_eyre("notification recorded")?;
    ensure!(toast.level == NotificationLevel::Error);
    ensure!(toast.description == "Failed to fetch deals");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_create_notifies_error() -> eyre::Result<()> {
    let sink = RecordingNotificationSink::new();
    let board = PipelineBoardService::new(
        Arc::new(UnreachableStore),
        Arc::new(sink.clone()),
        DealCollection::new(),
    );

    let result = board
        .create_deal(&draft("Acme Renewal", "Acme", "prospecting", 10)?)
        .await;

    ensure!(result.is_err());
    ensure!(board.collection().snapshot().deals().is_empty());
    ensure!(sink.count(NotificationLevel::Error) == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_view_groups_created_deals() -> eyre::Result<()> {
    let services = pipeline();
    for (name, company, stage_id) in [
        ("Acme Renewal", "Acme Corp", "prospecting"),
        ("Beta Expansion", "Beta Ltd", "prospecting"),
        ("Acme Pilot", "Acme Labs", "negotiation"),
    ] {
        services
            .board
            .create_deal(&draft(name, company, stage_id, 1_000)?)
            .await?;
    }
    let mut board = services.board.board();
    board.set_search("acme");
    board.set_filter(StageFilter::from_selection("prospecting"));

    let view = board.view();

    let column = view
        .column(&stage("prospecting")?)
        .ok_or_eyre("prospecting column")?;
    ensure!(column.count() == 1);
    ensure!(view.total_count() == 1);
    ensure!(view.column(&stage("negotiation")?).is_some_and(|found| found.count() == 0));
    Ok(())
}
