//! Given steps for conversation messaging BDD scenarios.

use super::world::{MessagingWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn register(world: &mut MessagingWorld, name: String) -> Result<(), eyre::Report> {
    let ctx = world.core.register(&name)?;
    world.users.insert(name, ctx);
    Ok(())
}

#[given(r#"a registered user "{name}""#)]
fn registered_user(world: &mut MessagingWorld, name: String) -> Result<(), eyre::Report> {
    register(world, name)
}

#[given(r#"registered users "{first}" and "{second}""#)]
fn registered_users(
    world: &mut MessagingWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    register(world, first)?;
    register(world, second)
}

#[given(r#"a conversation between "{creator}" and "{other}""#)]
fn conversation_between(
    world: &mut MessagingWorld,
    creator: String,
    other: String,
) -> Result<(), eyre::Report> {
    let creator_ctx = world.user(&creator)?;
    let other_ctx = world.user(&other)?;
    let conversation = run_async(
        world
            .core
            .gate
            .create_conversation(&creator_ctx, vec![other_ctx.actor()]),
    )
    .wrap_err("create conversation for scenario")?;
    world.conversation_id = Some(conversation.id());
    Ok(())
}
