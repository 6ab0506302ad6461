//! Deal aggregate, creation draft and partial update patch.

use super::{
    DealId, DealValue, ParsePriorityError, PipelineDomainError, PipelineDomainResult,
    Probability, StageId,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Deal priority classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealPriority {
    /// Needs immediate attention.
    Critical,
    /// Important opportunity.
    High,
    /// Normal priority.
    #[default]
    Medium,
    /// Can wait.
    Low,
}

impl DealPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl TryFrom<&str> for DealPriority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// A sales opportunity tracked through the pipeline.
///
/// Records are replaced wholesale with the store's copy after each write;
/// nothing in the crate edits a `Deal` in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    id: DealId,
    name: String,
    company: Option<String>,
    value: DealValue,
    priority: DealPriority,
    stage: StageId,
    probability: Probability,
    expected_close_date: Option<NaiveDate>,
    days_in_stage: u32,
    last_activity: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted deal record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDealData {
    /// Persisted deal identifier.
    pub id: DealId,
    /// Deal display name.
    pub name: String,
    /// Company the deal belongs to, if any.
    pub company: Option<String>,
    /// Monetary value.
    pub value: DealValue,
    /// Priority classification.
    pub priority: DealPriority,
    /// Current stage identifier.
    pub stage: StageId,
    /// Close probability.
    pub probability: Probability,
    /// Expected close date, if known.
    pub expected_close_date: Option<NaiveDate>,
    /// Days spent in the current stage.
    pub days_in_stage: u32,
    /// Short summary of the latest activity.
    pub last_activity: Option<String>,
    /// Append-only notes log.
    pub notes: Option<String>,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Store-assigned update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    /// Creates a new deal record from a draft, as a store would on insert.
    #[must_use]
    pub fn new_from_draft(draft: &DealDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: DealId::new(),
            name: draft.name.clone(),
            company: draft.company.clone(),
            value: draft.value,
            priority: draft.priority,
            stage: draft.stage.clone(),
            probability: draft.probability,
            expected_close_date: draft.expected_close_date,
            days_in_stage: 0,
            last_activity: None,
            notes: draft.notes.clone(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a deal from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDealData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            company: data.company,
            value: data.value,
            priority: data.priority,
            stage: data.stage,
            probability: data.probability,
            expected_close_date: data.expected_close_date,
            days_in_stage: data.days_in_stage,
            last_activity: data.last_activity,
            notes: data.notes,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the deal identifier.
    #[must_use]
    pub const fn id(&self) -> DealId {
        self.id
    }

    /// Returns the deal display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the company name, if any.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Returns the monetary value.
    #[must_use]
    pub const fn value(&self) -> DealValue {
        self.value
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> DealPriority {
        self.priority
    }

    /// Returns the current stage identifier.
    #[must_use]
    pub const fn stage(&self) -> &StageId {
        &self.stage
    }

    /// Returns the close probability.
    #[must_use]
    pub const fn probability(&self) -> Probability {
        self.probability
    }

    /// Returns the expected close date, if any.
    #[must_use]
    pub const fn expected_close_date(&self) -> Option<NaiveDate> {
        self.expected_close_date
    }

    /// Returns the number of days spent in the current stage.
    #[must_use]
    pub const fn days_in_stage(&self) -> u32 {
        self.days_in_stage
    }

    /// Returns the latest activity summary, if any.
    #[must_use]
    pub fn last_activity(&self) -> Option<&str> {
        self.last_activity.as_deref()
    }

    /// Returns the raw notes log, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a copy of this deal with `patch` applied and `updated_at`
    /// refreshed, as a store would produce on update.
    #[must_use]
    pub fn patched(&self, patch: &DealPatch, clock: &impl Clock) -> Self {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name.clone_from(name);
        }
        if let Some(company) = &patch.company {
            next.company = Some(company.clone());
        }
        if let Some(value) = patch.value {
            next.value = value;
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        if let Some(stage) = &patch.stage {
            next.stage = stage.clone();
        }
        if let Some(probability) = patch.probability {
            next.probability = probability;
        }
        if let Some(date) = patch.expected_close_date {
            next.expected_close_date = Some(date);
        }
        if let Some(days) = patch.days_in_stage {
            next.days_in_stage = days;
        }
        if let Some(activity) = &patch.last_activity {
            next.last_activity = Some(activity.clone());
        }
        if let Some(notes) = &patch.notes {
            next.notes = Some(notes.clone());
        }
        next.updated_at = clock.utc();
        next
    }
}

/// Payload for creating a deal through the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealDraft {
    name: String,
    company: Option<String>,
    value: DealValue,
    priority: DealPriority,
    stage: StageId,
    probability: Probability,
    expected_close_date: Option<NaiveDate>,
    days_in_stage: u32,
    notes: Option<String>,
}

impl DealDraft {
    /// Creates a draft with required fields and form defaults: medium
    /// priority, 50% probability and zero value.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::EmptyDealName`] when the name is blank.
    pub fn new(name: impl Into<String>, stage: StageId) -> PipelineDomainResult<Self> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PipelineDomainError::EmptyDealName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            company: None,
            value: DealValue::ZERO,
            priority: DealPriority::default(),
            stage,
            probability: Probability::DEFAULT_SUGGESTION,
            expected_close_date: None,
            days_in_stage: 0,
            notes: None,
        })
    }

    /// Sets the company name. Blank names are ignored.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        let raw = company.into();
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            self.company = Some(trimmed.to_owned());
        }
        self
    }

    /// Sets the monetary value.
    #[must_use]
    pub const fn with_value(mut self, value: DealValue) -> Self {
        self.value = value;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: DealPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the initial close probability.
    #[must_use]
    pub const fn with_probability(mut self, probability: Probability) -> Self {
        self.probability = probability;
        self
    }

    /// Sets the expected close date.
    #[must_use]
    pub const fn with_expected_close_date(mut self, date: NaiveDate) -> Self {
        self.expected_close_date = Some(date);
        self
    }

    /// Sets the initial notes. Blank notes are ignored.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let raw = notes.into();
        if !raw.trim().is_empty() {
            self.notes = Some(raw);
        }
        self
    }

    /// Returns the deal name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the initial stage.
    #[must_use]
    pub const fn stage(&self) -> &StageId {
        &self.stage
    }

    /// Returns the initial close probability.
    #[must_use]
    pub const fn probability(&self) -> Probability {
        self.probability
    }
}

/// Partial deal update. Absent fields are left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// New monetary value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<DealValue>,
    /// New priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<DealPriority>,
    /// New stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageId>,
    /// New close probability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<Probability>,
    /// New expected close date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_close_date: Option<NaiveDate>,
    /// New days-in-stage counter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_in_stage: Option<u32>,
    /// New latest-activity summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<String>,
    /// Full replacement notes log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DealPatch {
    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
