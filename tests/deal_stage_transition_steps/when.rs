//! When steps for deal stage transition BDD scenarios.

use super::world::{DealTransitionWorld, run_async};
use dealflow::pipeline::{
    domain::{Probability, StageId},
    ports::ConfirmationDecision,
    services::DropEvent,
};
use rstest_bdd_macros::when;

fn drop_deal(world: &mut DealTransitionWorld, stage: &str) -> Result<(), eyre::Report> {
    let event = DropEvent::new(world.deal_id()?, StageId::new(stage)?);
    let result = run_async(world.engine.handle_drop(event));
    world.last_outcome = Some(result);
    Ok(())
}

#[when(r#"the user drops the deal on "{stage}""#)]
fn user_drops_deal(world: &mut DealTransitionWorld, stage: String) -> Result<(), eyre::Report> {
    drop_deal(world, &stage)
}

#[when(r#"the user confirms moving the deal to "{stage}" at {probability:u8} percent"#)]
fn user_confirms_move(
    world: &mut DealTransitionWorld,
    stage: String,
    probability: u8,
) -> Result<(), eyre::Report> {
    world
        .surface
        .push(ConfirmationDecision::confirm(Probability::new(probability)?, None));
    drop_deal(world, &stage)
}

#[when(
    r#"the user confirms moving the deal to "{stage}" at {probability:u8} percent noting "{note}""#
)]
fn user_confirms_move_with_note(
    world: &mut DealTransitionWorld,
    stage: String,
    probability: u8,
    note: String,
) -> Result<(), eyre::Report> {
    world.surface.push(ConfirmationDecision::confirm(
        Probability::new(probability)?,
        Some(note.as_str()),
    ));
    drop_deal(world, &stage)
}

#[when(r#"the user cancels moving the deal to "{stage}""#)]
fn user_cancels_move(world: &mut DealTransitionWorld, stage: String) -> Result<(), eyre::Report> {
    world.surface.push(ConfirmationDecision::Cancel);
    drop_deal(world, &stage)
}

#[when(r#"the user accepts the suggestion for moving the deal to "{stage}""#)]
fn user_accepts_suggestion(
    world: &mut DealTransitionWorld,
    stage: String,
) -> Result<(), eyre::Report> {
    let deal_id = world.deal_id()?;
    let target = StageId::new(stage)?;
    let suggested = dealflow::pipeline::domain::suggested_probability_for(&target);
    world
        .surface
        .push(ConfirmationDecision::confirm(suggested, None));
    let result = run_async(world.engine.request_transition(deal_id, &target));
    world.last_outcome = Some(result);
    Ok(())
}
