//! In-memory deal store for tests and embedding.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, RwLock};

use crate::pipeline::{
    domain::{Deal, DealDraft, DealId, DealPatch},
    ports::{DealStore, DealStoreError, DealStoreResult},
};

/// Thread-safe in-memory deal store.
///
/// Records are kept newest first. The store counts update calls and can be
/// told to reject the next update, which lets tests observe exactly how the
/// engine talks to persistence.
#[derive(Debug)]
pub struct InMemoryDealStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<InMemoryDealState>>,
    clock: Arc<C>,
}

#[derive(Debug, Default)]
struct InMemoryDealState {
    deals: Vec<Deal>,
    update_calls: usize,
    pending_failure: Option<String>,
}

impl<C> Clone for InMemoryDealStore<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl InMemoryDealStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryDealStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(err: impl std::fmt::Display) -> DealStoreError {
    DealStoreError::persistence(std::io::Error::other(err.to_string()))
}

impl<C> InMemoryDealStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store that stamps records with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryDealState::default())),
            clock,
        }
    }

    /// Inserts existing records, keeping the given order after any records
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns [`DealStoreError::Persistence`] when the store lock is
    /// poisoned.
    pub fn seed(&self, deals: impl IntoIterator<Item = Deal>) -> DealStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.deals.extend(deals);
        Ok(())
    }

    /// Makes the next `update_deal` call fail with `message`.
    ///
    /// # Errors
    ///
    /// Returns [`DealStoreError::Persistence`] when the store lock is
    /// poisoned.
    pub fn fail_next_update(&self, message: impl Into<String>) -> DealStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.pending_failure = Some(message.into());
        Ok(())
    }

    /// Returns how many `update_deal` calls the store has received,
    /// including rejected ones.
    ///
    /// # Errors
    ///
    /// Returns [`DealStoreError::Persistence`] when the store lock is
    /// poisoned.
    pub fn update_calls(&self) -> DealStoreResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.update_calls)
    }

    /// Returns the stored copy of a deal, if present.
    ///
    /// # Errors
    ///
    /// Returns [`DealStoreError::Persistence`] when the store lock is
    /// poisoned.
    pub fn find(&self, id: DealId) -> DealStoreResult<Option<Deal>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.deals.iter().find(|deal| deal.id() == id).cloned())
    }
}

#[async_trait]
impl<C> DealStore for InMemoryDealStore<C>
where
    C: Clock + Send + Sync,
{
    async fn fetch_deals(&self) -> DealStoreResult<Vec<Deal>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.deals.clone())
    }

    async fn create_deal(&self, draft: &DealDraft) -> DealStoreResult<Deal> {
        let mut state = self.state.write().map_err(lock_error)?;
        let deal = Deal::new_from_draft(draft, &*self.clock);
        state.deals.insert(0, deal.clone());
        Ok(deal)
    }

    async fn update_deal(&self, id: DealId, patch: &DealPatch) -> DealStoreResult<Deal> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.update_calls = state.update_calls.saturating_add(1);
        if let Some(message) = state.pending_failure.take() {
            return Err(DealStoreError::Rejected(message));
        }

        let slot = state
            .deals
            .iter_mut()
            .find(|deal| deal.id() == id)
            .ok_or(DealStoreError::NotFound(id))?;
        let updated = slot.patched(patch, &*self.clock);
        *slot = updated.clone();
        Ok(updated)
    }
}
