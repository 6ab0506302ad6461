//! Given steps for deal stage transition BDD scenarios.

use super::world::{DealTransitionWorld, run_async};
use dealflow::pipeline::domain::{DealDraft, StageId};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a deal "{name}" in stage "{stage}""#)]
fn deal_in_stage(
    world: &mut DealTransitionWorld,
    name: String,
    stage: String,
) -> Result<(), eyre::Report> {
    let draft = DealDraft::new(name, StageId::new(stage)?)?;
    let created = run_async(world.board.create_deal(&draft)).wrap_err("create scenario deal")?;
    world.deal_id = Some(created.id());
    Ok(())
}

#[given(r#"the deal has a note "{text}""#)]
fn deal_has_note(world: &mut DealTransitionWorld, text: String) -> Result<(), eyre::Report> {
    let deal_id = world.deal_id()?;
    run_async(world.engine.add_note(deal_id, &text)).wrap_err("add scenario note")?;
    Ok(())
}

#[given(r#"the store will reject the next update with "{message}""#)]
fn store_rejects_next_update(
    world: &mut DealTransitionWorld,
    message: String,
) -> Result<(), eyre::Report> {
    world.store.fail_next_update(message)?;
    Ok(())
}
