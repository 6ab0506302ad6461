//! Pipeline stages and the read-only stage registry.

use super::{Probability, StageId, StageNotFound, known_suggested_probability};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One named step of the sales pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    id: StageId,
    name: String,
    rank: u16,
    color: String,
    suggested_probability: Option<Probability>,
}

impl Stage {
    /// Creates a stage definition.
    ///
    /// Standard stages are seeded from the suggestion table. Other stages
    /// carry no suggestion until one is set with
    /// [`Stage::with_suggested_probability`].
    #[must_use]
    pub fn new(id: StageId, name: impl Into<String>, rank: u16, color: impl Into<String>) -> Self {
        let suggested_probability = known_suggested_probability(&id);
        Self {
            id,
            name: name.into(),
            rank,
            color: color.into(),
            suggested_probability,
        }
    }

    /// Returns the stage identifier.
    #[must_use]
    pub const fn id(&self) -> &StageId {
        &self.id
    }

    /// Returns the human-readable stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display ordering rank.
    #[must_use]
    pub const fn rank(&self) -> u16 {
        self.rank
    }

    /// Returns the display colour token.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Sets the probability suggested when a deal enters this stage.
    #[must_use]
    pub const fn with_suggested_probability(mut self, probability: Probability) -> Self {
        self.suggested_probability = Some(probability);
        self
    }

    /// Returns the probability suggested when a deal enters this stage, or
    /// `None` when the configured default applies.
    #[must_use]
    pub const fn suggested_probability(&self) -> Option<Probability> {
        self.suggested_probability
    }
}

/// Ordered, immutable table of known pipeline stages.
///
/// Rank is used for display ordering only. Any stage may transition to any
/// other stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRegistry {
    stages: Vec<Stage>,
}

static STANDARD_REGISTRY: OnceLock<StageRegistry> = OnceLock::new();

impl StageRegistry {
    /// Builds a registry from stage definitions, ordered by rank.
    ///
    /// Later definitions with an identifier already seen are dropped.
    #[must_use]
    pub fn new(stages: impl IntoIterator<Item = Stage>) -> Self {
        let mut ordered: Vec<Stage> = Vec::new();
        for stage in stages {
            if ordered.iter().all(|existing| existing.id != stage.id) {
                ordered.push(stage);
            }
        }
        ordered.sort_by_key(Stage::rank);
        Self { stages: ordered }
    }

    /// Returns the process-wide registry of the six standard stages.
    #[must_use]
    pub fn standard() -> &'static Self {
        STANDARD_REGISTRY.get_or_init(|| {
            Self::new([
                Stage::new(StageId::from_static("prospecting"), "Prospecting", 0, "#a78bfa"),
                Stage::new(StageId::from_static("qualification"), "Qualification", 1, "#22d3ee"),
                Stage::new(StageId::from_static("proposal"), "Proposal Sent", 2, "#fbbf24"),
                Stage::new(StageId::from_static("negotiation"), "Negotiation", 3, "#fb923c"),
                Stage::new(StageId::from_static("closed-won"), "Closed Won", 4, "#10b981"),
                Stage::new(StageId::from_static("closed-lost"), "Closed Lost", 5, "#f87171"),
            ])
        })
    }

    /// Looks up a stage by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StageNotFound`] when the identifier is not registered.
    pub fn stage_of(&self, id: &StageId) -> Result<&Stage, StageNotFound> {
        self.stages
            .iter()
            .find(|stage| &stage.id == id)
            .ok_or_else(|| StageNotFound(id.clone()))
    }

    /// Returns the display rank of a stage.
    ///
    /// # Errors
    ///
    /// Returns [`StageNotFound`] when the identifier is not registered.
    pub fn rank_of(&self, id: &StageId) -> Result<u16, StageNotFound> {
        self.stage_of(id).map(Stage::rank)
    }

    /// Returns `true` when the identifier names a registered stage.
    #[must_use]
    pub fn contains(&self, id: &StageId) -> bool {
        self.stage_of(id).is_ok()
    }

    /// Returns all stages in rank order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}
