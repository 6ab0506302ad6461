//! Stage transition engine.
//!
//! A transition runs in two phases. [`StageTransitionService::propose`]
//! validates the move and reserves the deal. The caller then collects a
//! [`ConfirmationDecision`] and passes it to
//! [`StageTransitionService::resolve`], which commits through the store.
//! [`StageTransitionService::request_transition`] runs both phases against
//! the configured [`ConfirmationSurface`].

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::pipeline::{
    domain::{
        AuditEntry, Deal, DealId, DealPatch, NotesLog, Probability, Stage, StageId,
        StageRegistry,
    },
    ports::{
        ConfirmationDecision, ConfirmationSurface, DealStore, DealStoreError, Notification,
        NotificationSink, TransitionPrompt,
    },
};

use super::DealCollection;

/// A deal dropped onto a stage column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    /// Deal that was dragged.
    pub deal_id: DealId,
    /// Column it was dropped on.
    pub target_stage_id: StageId,
}

impl DropEvent {
    /// Creates a drop event.
    #[must_use]
    pub const fn new(deal_id: DealId, target_stage_id: StageId) -> Self {
        Self {
            deal_id,
            target_stage_id,
        }
    }
}

/// Why a request was ignored without touching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The deal is already in the target stage.
    SameStage,
    /// The target stage is not registered.
    UnknownStage(StageId),
    /// The deal is not in the collection.
    UnknownDeal(DealId),
    /// A manual note was blank.
    BlankNote,
}

/// Final result of a transition or note request.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The store accepted the update; holds the stored record.
    Completed(Deal),
    /// The user cancelled the confirmation.
    Cancelled,
    /// The request was a no-op.
    Ignored(IgnoreReason),
    /// The store rejected the update. Local state is unchanged.
    Failed(DealStoreError),
}

impl TransitionOutcome {
    /// Returns the stored record when the request completed.
    #[must_use]
    pub const fn completed(&self) -> Option<&Deal> {
        match self {
            Self::Completed(deal) => Some(deal),
            _ => None,
        }
    }
}

/// Errors returned at the engine boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// Another request for the same deal is still awaiting confirmation or
    /// the store.
    #[error("a stage change for deal {0} is already pending")]
    AlreadyPending(DealId),
}

/// Result type for transition engine operations.
pub type TransitionResult<T> = Result<T, TransitionError>;

/// Outcome of the first phase.
#[derive(Debug)]
pub enum Proposal {
    /// The request needs no transition.
    Ignored(IgnoreReason),
    /// The request awaits the user's decision.
    Pending(PendingTransition),
}

/// A transition awaiting confirmation.
///
/// Holds the deal's pending slot. Dropping it without resolving discards the
/// request and frees the deal for new requests; no store call is made.
#[derive(Debug)]
pub struct PendingTransition {
    prompt: TransitionPrompt,
    target: StageId,
    _slot: PendingSlot,
}

impl PendingTransition {
    /// Returns what the confirmation surface should show.
    #[must_use]
    pub const fn prompt(&self) -> &TransitionPrompt {
        &self.prompt
    }

    /// Returns the target stage.
    #[must_use]
    pub const fn target(&self) -> &StageId {
        &self.target
    }
}

type PendingSet = Arc<Mutex<HashSet<DealId>>>;

/// Reservation of one deal in the pending set, released on drop.
#[derive(Debug)]
struct PendingSlot {
    deal_id: DealId,
    pending: PendingSet,
}

impl PendingSlot {
    fn acquire(pending: &PendingSet, deal_id: DealId) -> TransitionResult<Self> {
        let mut reserved = pending.lock().unwrap_or_else(PoisonError::into_inner);
        if !reserved.insert(deal_id) {
            return Err(TransitionError::AlreadyPending(deal_id));
        }
        Ok(Self {
            deal_id,
            pending: Arc::clone(pending),
        })
    }
}

impl Drop for PendingSlot {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.deal_id);
    }
}

/// Orchestrates stage transitions and note appends for deals in the
/// shared collection.
#[derive(Clone)]
pub struct StageTransitionService<S, F, N, C>
where
    S: DealStore,
    F: ConfirmationSurface,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    surface: Arc<F>,
    notifier: Arc<N>,
    clock: Arc<C>,
    registry: Arc<StageRegistry>,
    collection: DealCollection,
    config: PipelineConfig,
    pending: PendingSet,
}

impl<S, F, N, C> StageTransitionService<S, F, N, C>
where
    S: DealStore,
    F: ConfirmationSurface,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    /// Creates an engine over `collection` using the standard stages and
    /// default configuration.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        surface: Arc<F>,
        notifier: Arc<N>,
        clock: Arc<C>,
        collection: DealCollection,
    ) -> Self {
        Self {
            store,
            surface,
            notifier,
            clock,
            registry: Arc::new(StageRegistry::standard().clone()),
            collection,
            config: PipelineConfig::default(),
            pending: PendingSet::default(),
        }
    }

    /// Replaces the stage registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<StageRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the collection this engine writes to.
    #[must_use]
    pub const fn collection(&self) -> &DealCollection {
        &self.collection
    }

    /// Returns `true` while a request for `deal_id` is unresolved.
    #[must_use]
    pub fn is_pending(&self, deal_id: DealId) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&deal_id)
    }

    /// Moves a deal to `target`, asking the confirmation surface first.
    ///
    /// Waits on the surface for as long as the user takes. Dropping the
    /// returned future while it waits discards the request without a store
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyPending`] when another request for
    /// the same deal is unresolved.
    pub async fn request_transition(
        &self,
        deal_id: DealId,
        target: &StageId,
    ) -> TransitionResult<TransitionOutcome> {
        match self.propose(deal_id, target)? {
            Proposal::Ignored(reason) => Ok(TransitionOutcome::Ignored(reason)),
            Proposal::Pending(pending) => {
                let decision = self.surface.confirm(pending.prompt()).await;
                Ok(self.resolve(pending, decision).await)
            }
        }
    }

    /// Handles a drag-and-drop gesture exactly like
    /// [`Self::request_transition`].
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyPending`] when another request for
    /// the same deal is unresolved.
    pub async fn handle_drop(&self, event: DropEvent) -> TransitionResult<TransitionOutcome> {
        self.request_transition(event.deal_id, &event.target_stage_id)
            .await
    }

    /// Validates a move and reserves the deal until the returned
    /// [`PendingTransition`] is resolved or dropped.
    ///
    /// Unknown stages, unknown deals and moves onto the current stage are
    /// ignored rather than reported.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyPending`] when another request for
    /// the same deal is unresolved.
    pub fn propose(&self, deal_id: DealId, target: &StageId) -> TransitionResult<Proposal> {
        let Ok(target_stage) = self.registry.stage_of(target) else {
            debug!(%deal_id, to_stage = %target, "ignoring move to unknown stage");
            return Ok(Proposal::Ignored(IgnoreReason::UnknownStage(target.clone())));
        };
        let Some(deal) = self.collection.get(deal_id) else {
            debug!(%deal_id, "ignoring move of unknown deal");
            return Ok(Proposal::Ignored(IgnoreReason::UnknownDeal(deal_id)));
        };
        if deal.stage() == target {
            debug!(%deal_id, stage = %target, "ignoring move onto current stage");
            return Ok(Proposal::Ignored(IgnoreReason::SameStage));
        }

        let slot = PendingSlot::acquire(&self.pending, deal_id).inspect_err(|_| {
            warn!(%deal_id, to_stage = %target, "rejected concurrent stage change");
        })?;

        let prompt = TransitionPrompt {
            deal_id,
            deal_name: deal.name().to_owned(),
            from_stage_name: self.stage_name(deal.stage()),
            to_stage_name: target_stage.name().to_owned(),
            suggested_probability: self.suggested_probability(target_stage),
        };
        debug!(
            %deal_id,
            from_stage = %deal.stage(),
            to_stage = %target,
            suggested = prompt.suggested_probability.value(),
            "stage change awaiting confirmation"
        );

        Ok(Proposal::Pending(PendingTransition {
            prompt,
            target: target.clone(),
            _slot: slot,
        }))
    }

    /// Applies the user's decision to a pending transition.
    ///
    /// On confirm, the audit entry is built from the deal's notes as they
    /// are now, not as they were when the transition was proposed. Exactly
    /// one store update is issued, and only the store's returned record
    /// enters the collection.
    pub async fn resolve(
        &self,
        pending: PendingTransition,
        decision: ConfirmationDecision,
    ) -> TransitionOutcome {
        let deal_id = pending.prompt.deal_id;
        let ConfirmationDecision::Confirm {
            probability,
            annotation,
        } = decision
        else {
            debug!(%deal_id, "stage change cancelled");
            return TransitionOutcome::Cancelled;
        };

        let Some(current) = self.collection.get(deal_id) else {
            debug!(%deal_id, "deal left the collection before commit");
            return TransitionOutcome::Ignored(IgnoreReason::UnknownDeal(deal_id));
        };
        if current.stage() == &pending.target {
            return TransitionOutcome::Ignored(IgnoreReason::SameStage);
        }

        let from_name = self.stage_name(current.stage());
        let to_name = self.stage_name(&pending.target);
        let entry = AuditEntry::stage_move(
            self.timestamp(),
            from_name.as_str(),
            to_name.as_str(),
            annotation.as_deref(),
        );
        let patch = transition_patch(&current, &pending.target, &to_name, probability, &entry);

        match self.store.update_deal(deal_id, &patch).await {
            Ok(stored) => {
                self.collection.replace(stored.clone());
                info!(
                    %deal_id,
                    from_stage = %current.stage(),
                    to_stage = %pending.target,
                    probability = probability.value(),
                    "deal moved"
                );
                self.notifier.notify(Notification::success(format!(
                    "Moved \"{}\" to {to_name}",
                    stored.name()
                )));
                TransitionOutcome::Completed(stored)
            }
            Err(err) => {
                warn!(%deal_id, to_stage = %pending.target, error = %err, "stage change failed");
                self.notifier
                    .notify(Notification::error(format!("Failed to update deal: {err}")));
                TransitionOutcome::Failed(err)
            }
        }
    }

    /// Appends a free-text note to a deal through the store.
    ///
    /// Blank text is ignored. The deal is reserved before its notes are read,
    /// so the append is serialised with stage changes and other notes on the
    /// same deal.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyPending`] when a request for the
    /// deal is unresolved.
    pub async fn add_note(&self, deal_id: DealId, text: &str) -> TransitionResult<TransitionOutcome> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(TransitionOutcome::Ignored(IgnoreReason::BlankNote));
        }
        let _slot = PendingSlot::acquire(&self.pending, deal_id)?;
        let Some(current) = self.collection.get(deal_id) else {
            return Ok(TransitionOutcome::Ignored(IgnoreReason::UnknownDeal(deal_id)));
        };

        let entry = AuditEntry::note(self.timestamp(), trimmed);
        let notes = NotesLog::from_existing(current.notes()).appended(&entry);
        let patch = DealPatch {
            notes: Some(notes.into_string()),
            ..DealPatch::default()
        };

        match self.store.update_deal(deal_id, &patch).await {
            Ok(stored) => {
                self.collection.replace(stored.clone());
                info!(%deal_id, "note added");
                self.notifier
                    .notify(Notification::success("Your note has been added to the deal."));
                Ok(TransitionOutcome::Completed(stored))
            }
            Err(err) => {
                warn!(%deal_id, error = %err, "note append failed");
                self.notifier
                    .notify(Notification::error(format!("Failed to update deal: {err}")));
                Ok(TransitionOutcome::Failed(err))
            }
        }
    }

    fn stage_name(&self, stage: &StageId) -> String {
        self.registry
            .stage_of(stage)
            .map_or_else(|_| stage.to_string(), |found| found.name().to_owned())
    }

    fn suggested_probability(&self, stage: &Stage) -> Probability {
        stage
            .suggested_probability()
            .unwrap_or(self.config.default_probability)
    }

    fn timestamp(&self) -> String {
        render_timestamp(self.clock.utc(), &self.config.note_timestamp_format)
    }
}

/// Formats `at` with `format`, falling back to RFC 3339 when the format
/// cannot be rendered.
fn render_timestamp(at: DateTime<Utc>, format: &str) -> String {
    let mut rendered = String::new();
    if write!(rendered, "{}", at.format(format)).is_err() {
        return at.to_rfc3339();
    }
    rendered
}

/// Builds the single patch a confirmed transition sends to the store.
fn transition_patch(
    current: &Deal,
    target: &StageId,
    target_name: &str,
    probability: Probability,
    entry: &AuditEntry,
) -> DealPatch {
    let notes = NotesLog::from_existing(current.notes()).appended(entry);
    DealPatch {
        stage: Some(target.clone()),
        probability: Some(probability),
        days_in_stage: Some(0),
        last_activity: Some(format!("Moved to {target_name}")),
        notes: Some(notes.into_string()),
        ..DealPatch::default()
    }
}
