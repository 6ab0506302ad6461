//! Deal store port: the CRUD record API that owns deal persistence.

use crate::pipeline::domain::{Deal, DealDraft, DealId, DealPatch};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for deal store operations.
pub type DealStoreResult<T> = Result<T, DealStoreError>;

/// Remote record store for deals.
///
/// The store is the single source of truth. Writes return the full stored
/// record, including any fields the store computes itself.
#[async_trait]
pub trait DealStore: Send + Sync {
    /// Returns every deal visible to the session, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DealStoreError`] when the store rejects the request.
    async fn fetch_deals(&self) -> DealStoreResult<Vec<Deal>>;

    /// Creates a deal and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DealStoreError`] when the store rejects the draft.
    async fn create_deal(&self, draft: &DealDraft) -> DealStoreResult<Deal>;

    /// Applies `patch` to an existing deal and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DealStoreError::NotFound`] when the deal does not exist, or
    /// another variant when the store rejects the update.
    async fn update_deal(&self, id: DealId, patch: &DealPatch) -> DealStoreResult<Deal>;
}

/// Errors returned by deal store implementations.
#[derive(Debug, Clone, Error)]
pub enum DealStoreError {
    /// The deal does not exist in the store.
    #[error("deal not found: {0}")]
    NotFound(DealId),

    /// The store refused the operation with a human-readable reason.
    #[error("{0}")]
    Rejected(String),

    /// Transport or persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DealStoreError {
    /// Creates a rejection carrying the store's message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
