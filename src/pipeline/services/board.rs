//! Board loading and deal creation.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::pipeline::{
    domain::{Deal, DealDraft, StageRegistry},
    ports::{DealStore, DealStoreError, Notification, NotificationSink},
};

use super::{DealCollection, PipelineBoard};

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] DealStoreError),
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Loads deals from the store into the shared collection and records newly
/// created deals.
#[derive(Clone)]
pub struct PipelineBoardService<S, N>
where
    S: DealStore,
    N: NotificationSink,
{
    store: Arc<S>,
    notifier: Arc<N>,
    registry: Arc<StageRegistry>,
    collection: DealCollection,
}

impl<S, N> PipelineBoardService<S, N>
where
    S: DealStore,
    N: NotificationSink,
{
    /// Creates a board service over `collection` using the standard stages.
    #[must_use]
    pub fn new(store: Arc<S>, notifier: Arc<N>, collection: DealCollection) -> Self {
        Self {
            store,
            notifier,
            registry: Arc::new(StageRegistry::standard().clone()),
            collection,
        }
    }

    /// Replaces the stage registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<StageRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the shared collection.
    #[must_use]
    pub const fn collection(&self) -> &DealCollection {
        &self.collection
    }

    /// Returns a board holder over the shared collection.
    #[must_use]
    pub fn board(&self) -> PipelineBoard {
        PipelineBoard::new(Arc::clone(&self.registry), self.collection.clone())
    }

    /// Replaces the collection with the store's current deals.
    ///
    /// Returns the number of deals loaded. On failure the collection is
    /// left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] when the store rejects the request.
    pub async fn load(&self) -> BoardResult<usize> {
        match self.store.fetch_deals().await {
            Ok(deals) => {
                let count = deals.len();
                let hidden = deals
                    .iter()
                    .filter(|deal| !self.registry.contains(deal.stage()))
                    .count();
                if hidden > 0 {
                    warn!(hidden, "deals with unknown stages will not be shown");
                }
                self.collection.replace_all(deals);
                info!(count, "deals loaded");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch deals");
                self.notifier
                    .notify(Notification::error("Failed to fetch deals"));
                Err(err.into())
            }
        }
    }

    /// Creates a deal and places the stored record first in the collection.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] when the store rejects the draft.
    pub async fn create_deal(&self, draft: &DealDraft) -> BoardResult<Deal> {
        match self.store.create_deal(draft).await {
            Ok(deal) => {
                self.collection.prepend(deal.clone());
                info!(deal_id = %deal.id(), stage = %deal.stage(), "deal created");
                self.notifier
                    .notify(Notification::success("Deal created successfully"));
                Ok(deal)
            }
            Err(err) => {
                warn!(error = %err, "failed to create deal");
                self.notifier
                    .notify(Notification::error("Failed to create deal"));
                Err(err.into())
            }
        }
    }
}
