//! Board view model: deals grouped by stage under search and filter.

use std::sync::Arc;

use crate::pipeline::domain::{Deal, DealValue, Stage, StageId, StageRegistry};

use super::DealCollection;

/// Stage filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StageFilter {
    /// Every stage matches.
    #[default]
    All,
    /// Only the given stage matches.
    Only(StageId),
}

impl StageFilter {
    /// Interprets a selector value: `"all"` (any case) or blank selects every
    /// stage, anything else names one stage.
    #[must_use]
    pub fn from_selection(selection: &str) -> Self {
        match StageId::new(selection) {
            Ok(stage) if stage.as_str() != "all" => Self::Only(stage),
            _ => Self::All,
        }
    }

    /// Returns `true` when `stage` passes the filter.
    #[must_use]
    pub fn matches(&self, stage: &StageId) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == stage,
        }
    }
}

/// One board column.
///
/// A column exists for every registered stage, even when no deal matches.
/// It remains a valid drop target in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageColumn {
    stage: Stage,
    matches_filter: bool,
    deals: Vec<Deal>,
    total_value: DealValue,
}

impl StageColumn {
    /// Returns the stage this column represents.
    #[must_use]
    pub const fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Returns `true` when the active stage filter selects this column.
    #[must_use]
    pub const fn matches_filter(&self) -> bool {
        self.matches_filter
    }

    /// Returns the matching deals in collection order.
    #[must_use]
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Returns the number of matching deals.
    #[must_use]
    pub fn count(&self) -> usize {
        self.deals.len()
    }

    /// Returns the summed value of the matching deals.
    #[must_use]
    pub const fn total_value(&self) -> DealValue {
        self.total_value
    }
}

/// Grouped board state derived from deals, a search term and a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineView {
    columns: Vec<StageColumn>,
}

impl PipelineView {
    /// Derives the board from its inputs. The result depends on nothing else.
    ///
    /// The search term is trimmed, then matched as a case-insensitive
    /// substring of the deal name or company, so `"acme "` matches `"Acme"`.
    /// Deals whose stage is not registered appear in no column.
    #[must_use]
    pub fn derive(
        registry: &StageRegistry,
        deals: &[Deal],
        search: &str,
        filter: &StageFilter,
    ) -> Self {
        let needle = search.trim().to_lowercase();
        let columns = registry
            .stages()
            .iter()
            .map(|stage| {
                let matches_filter = filter.matches(stage.id());
                let matching: Vec<Deal> = if matches_filter {
                    deals
                        .iter()
                        .filter(|deal| deal.stage() == stage.id() && matches_search(deal, &needle))
                        .cloned()
                        .collect()
                } else {
                    Vec::new()
                };
                let total_value = matching.iter().map(Deal::value).sum();
                StageColumn {
                    stage: stage.clone(),
                    matches_filter,
                    deals: matching,
                    total_value,
                }
            })
            .collect();
        Self { columns }
    }

    /// Returns the columns in stage rank order.
    #[must_use]
    pub fn columns(&self) -> &[StageColumn] {
        &self.columns
    }

    /// Returns the column for a stage, if registered.
    #[must_use]
    pub fn column(&self, stage: &StageId) -> Option<&StageColumn> {
        self.columns.iter().find(|column| column.stage.id() == stage)
    }

    /// Returns `true` when `stage` can receive a dropped deal.
    #[must_use]
    pub fn is_drop_target(&self, stage: &StageId) -> bool {
        self.column(stage).is_some()
    }

    /// Returns the number of visible deals.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.columns.iter().map(StageColumn::count).sum()
    }

    /// Returns the summed value of visible deals.
    #[must_use]
    pub fn total_value(&self) -> DealValue {
        self.columns.iter().map(StageColumn::total_value).sum()
    }

    /// Returns the probability-weighted value of visible deals.
    #[must_use]
    pub fn weighted_value(&self) -> DealValue {
        self.columns
            .iter()
            .flat_map(|column| column.deals.iter())
            .map(|deal| deal.value().weighted_by(deal.probability()))
            .sum()
    }
}

fn matches_search(deal: &Deal, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |text: &str| text.to_lowercase().contains(needle);
    contains(deal.name()) || deal.company().is_some_and(contains)
}

/// Board state holder that owns the search term and filter.
///
/// Every call to [`PipelineBoard::view`] derives a fresh view from the
/// current collection snapshot, so changes to deals, search or filter are
/// always reflected.
#[derive(Debug, Clone)]
pub struct PipelineBoard {
    registry: Arc<StageRegistry>,
    collection: DealCollection,
    search: String,
    filter: StageFilter,
}

impl PipelineBoard {
    /// Creates a board over `collection` with no search and no filter.
    #[must_use]
    pub fn new(registry: Arc<StageRegistry>, collection: DealCollection) -> Self {
        Self {
            registry,
            collection,
            search: String::new(),
            filter: StageFilter::All,
        }
    }

    /// Sets the free-text search term.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Sets the stage filter.
    pub fn set_filter(&mut self, filter: StageFilter) {
        self.filter = filter;
    }

    /// Returns the search term.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns the stage filter.
    #[must_use]
    pub const fn filter(&self) -> &StageFilter {
        &self.filter
    }

    /// Derives the board for the current deals, search and filter.
    #[must_use]
    pub fn view(&self) -> PipelineView {
        let snapshot = self.collection.snapshot();
        PipelineView::derive(&self.registry, snapshot.deals(), &self.search, &self.filter)
    }
}
