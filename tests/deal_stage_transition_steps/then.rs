//! Then steps for deal stage transition BDD scenarios.

use super::world::DealTransitionWorld;
use dealflow::pipeline::{
    domain::{StageId, notes},
    ports::NotificationLevel,
    services::TransitionOutcome,
};
use rstest_bdd_macros::then;

#[then(r#"the deal is in stage "{stage}""#)]
fn deal_is_in_stage(world: &DealTransitionWorld, stage: String) -> Result<(), eyre::Report> {
    let expected = StageId::new(stage)?;
    let deal = world.current_deal()?;
    if deal.stage() != &expected {
        return Err(eyre::eyre!(
            "expected stage {expected}, found {}",
            deal.stage()
        ));
    }
    Ok(())
}

#[then("the deal probability is {probability:u8}")]
fn deal_probability_is(world: &DealTransitionWorld, probability: u8) -> Result<(), eyre::Report> {
    let found = world.current_deal()?.probability().value();
    if found != probability {
        return Err(eyre::eyre!("expected probability {probability}, found {found}"));
    }
    Ok(())
}

#[then(r#"the latest note ends with "{text}""#)]
fn latest_note_ends_with(world: &DealTransitionWorld, text: String) -> Result<(), eyre::Report> {
    let deal = world.current_deal()?;
    let latest = deal
        .notes()
        .map(notes::entries)
        .and_then(|entries| entries.last().copied())
        .ok_or_else(|| eyre::eyre!("deal has no notes"))?;
    if !latest.ends_with(text.as_str()) {
        return Err(eyre::eyre!("latest note '{latest}' does not end with '{text}'"));
    }
    Ok(())
}

#[then("the notes hold {count:u64} entries")]
fn notes_hold_entries(world: &DealTransitionWorld, count: u64) -> Result<(), eyre::Report> {
    let deal = world.current_deal()?;
    let found = deal.notes().map(notes::entries).unwrap_or_default().len();
    if u64::try_from(found)? != count {
        return Err(eyre::eyre!("expected {count} note entries, found {found}"));
    }
    Ok(())
}

#[then("no confirmation was requested")]
fn no_confirmation_requested(world: &DealTransitionWorld) -> Result<(), eyre::Report> {
    let prompts = world.surface.prompts();
    if !prompts.is_empty() {
        return Err(eyre::eyre!("expected no prompts, found {prompts:?}"));
    }
    Ok(())
}

#[then("the store received {count:u64} updates")]
fn store_received_updates(world: &DealTransitionWorld, count: u64) -> Result<(), eyre::Report> {
    let found = world.store.update_calls()?;
    if u64::try_from(found)? != count {
        return Err(eyre::eyre!("expected {count} store updates, found {found}"));
    }
    Ok(())
}

#[then("no transition notification was shown")]
fn no_transition_notification_shown(world: &DealTransitionWorld) -> Result<(), eyre::Report> {
    let shown = world.sink.notifications();
    if shown
        .iter()
        .any(|toast| toast.description != "Deal created successfully")
    {
        return Err(eyre::eyre!("expected only the creation notice, found {shown:?}"));
    }
    Ok(())
}

fn notification_reads(
    world: &DealTransitionWorld,
    level: NotificationLevel,
    text: &str,
) -> Result<(), eyre::Report> {
    let shown = world.sink.notifications();
    if !shown
        .iter()
        .any(|toast| toast.level == level && toast.description == text)
    {
        return Err(eyre::eyre!("no {level:?} notification '{text}' in {shown:?}"));
    }
    Ok(())
}

#[then(r#"a success notification reads "{text}""#)]
fn success_notification_reads(
    world: &DealTransitionWorld,
    text: String,
) -> Result<(), eyre::Report> {
    notification_reads(world, NotificationLevel::Success, &text)
}

#[then(r#"an error notification reads "{text}""#)]
fn error_notification_reads(world: &DealTransitionWorld, text: String) -> Result<(), eyre::Report> {
    notification_reads(world, NotificationLevel::Error, &text)
}

#[then("the prompt suggested {probability:u8} percent")]
fn prompt_suggested(world: &DealTransitionWorld, probability: u8) -> Result<(), eyre::Report> {
    let prompts = world.surface.prompts();
    let prompt = prompts
        .last()
        .ok_or_else(|| eyre::eyre!("no confirmation prompt was shown"))?;
    if prompt.suggested_probability.value() != probability {
        return Err(eyre::eyre!(
            "expected suggestion {probability}, found {}",
            prompt.suggested_probability
        ));
    }
    Ok(())
}

#[then("the request was ignored")]
fn request_was_ignored(world: &DealTransitionWorld) -> Result<(), eyre::Report> {
    match world.last_outcome.as_ref() {
        Some(Ok(TransitionOutcome::Ignored(_))) => Ok(()),
        other => Err(eyre::eyre!("expected an ignored request, got {other:?}")),
    }
}

#[then("the request was cancelled")]
fn request_was_cancelled(world: &DealTransitionWorld) -> Result<(), eyre::Report> {
    match world.last_outcome.as_ref() {
        Some(Ok(TransitionOutcome::Cancelled)) => Ok(()),
        other => Err(eyre::eyre!("expected a cancelled request, got {other:?}")),
    }
}
