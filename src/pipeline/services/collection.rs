//! Shared, versioned snapshot of the session's deals.

use std::sync::{Arc, PoisonError, RwLock};

use crate::pipeline::domain::{Deal, DealId};

/// Immutable view of the deal collection at one version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealSnapshot {
    version: u64,
    deals: Vec<Deal>,
}

impl DealSnapshot {
    /// Returns the snapshot version. Every write increments it.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the deals in collection order.
    #[must_use]
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Returns a deal by identifier.
    #[must_use]
    pub fn get(&self, id: DealId) -> Option<&Deal> {
        self.deals.iter().find(|deal| deal.id() == id)
    }

    fn next(&self, deals: Vec<Deal>) -> Self {
        Self {
            version: self.version.saturating_add(1),
            deals,
        }
    }
}

/// The single in-memory deal collection shared by the view and the engine.
///
/// Readers take cheap `Arc` snapshots. Writers publish a whole new snapshot
/// and only ever swap complete records, so a reader never observes a
/// partially applied change. Writes are confined to the pipeline services.
#[derive(Debug, Clone, Default)]
pub struct DealCollection {
    current: Arc<RwLock<Arc<DealSnapshot>>>,
}

impl DealCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DealSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns a copy of the current record for `id`.
    #[must_use]
    pub fn get(&self, id: DealId) -> Option<Deal> {
        self.snapshot().get(id).cloned()
    }

    /// Returns the current version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.snapshot().version()
    }

    /// Replaces the whole collection.
    pub(crate) fn replace_all(&self, deals: Vec<Deal>) {
        self.publish(|_| Some(deals));
    }

    /// Inserts a record at the front of the collection.
    pub(crate) fn prepend(&self, deal: Deal) {
        self.publish(|current| {
            let mut deals = Vec::with_capacity(current.len().saturating_add(1));
            deals.push(deal);
            deals.extend(current.iter().cloned());
            Some(deals)
        });
    }

    /// Swaps the record with the same identifier for `deal`.
    ///
    /// Returns `false`, leaving the collection untouched, when no record
    /// with that identifier exists.
    pub(crate) fn replace(&self, deal: Deal) -> bool {
        let mut replaced = false;
        self.publish(|current| {
            let position = current.iter().position(|existing| existing.id() == deal.id())?;
            let mut deals = current.to_vec();
            if let Some(slot) = deals.get_mut(position) {
                *slot = deal;
                replaced = true;
            }
            Some(deals)
        });
        replaced
    }

    fn publish(&self, change: impl FnOnce(&[Deal]) -> Option<Vec<Deal>>) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(deals) = change(guard.deals()) {
            let next = Arc::new(guard.next(deals));
            *guard = next;
        }
    }
}
