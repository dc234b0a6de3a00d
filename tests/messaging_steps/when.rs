//! When steps for conversation messaging BDD scenarios.

use super::world::{MessagingWorld, run_async};
use eyre::WrapErr;
use parlour::message::domain::{MessageFilter, PageRequest};
use rstest_bdd_macros::when;

#[when(r#""{sender}" sends "{body}""#)]
fn sends(world: &mut MessagingWorld, sender: String, body: String) -> Result<(), eyre::Report> {
    let ctx = world.user(&sender)?;
    let conversation_id = world.conversation()?;
    let message = run_async(world.core.gate.send_message(&ctx, conversation_id, body.as_str()))
        .wrap_err("send message")?;
    world.sent.insert(body, message);
    Ok(())
}

#[when(r#""{reader}" marks all messages read"#)]
fn marks_all_read(world: &mut MessagingWorld, reader: String) -> Result<(), eyre::Report> {
    let ctx = world.user(&reader)?;
    let conversation_id = world.conversation()?;
    let marked = run_async(world.core.gate.mark_all_read(&ctx, conversation_id))
        .wrap_err("mark all read")?;
    world.last_marked = Some(marked);
    Ok(())
}

#[when(r#""{actor}" removes "{member}" from the conversation"#)]
fn removes_member(
    world: &mut MessagingWorld,
    actor: String,
    member: String,
) -> Result<(), eyre::Report> {
    let ctx = world.user(&actor)?;
    let member_id = world.user(&member)?.actor();
    let conversation_id = world.conversation()?;
    if let Err(err) = run_async(
        world
            .core
            .gate
            .remove_participant(&ctx, conversation_id, member_id),
    ) {
        world.last_error = Some(err);
    }
    Ok(())
}

#[when(r#""{requester}" lists the conversation's messages"#)]
fn lists_messages(world: &mut MessagingWorld, requester: String) -> Result<(), eyre::Report> {
    let ctx = world.user(&requester)?;
    let conversation_id = world.conversation()?;
    match run_async(world.core.gate.list_messages(
        &ctx,
        conversation_id,
        PageRequest::first(),
        &MessageFilter::new(),
    )) {
        Ok(page) => world.last_listing = Some(page.into_items()),
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when(r#""{author}" deletes the message "{body}""#)]
fn deletes_message(
    world: &mut MessagingWorld,
    author: String,
    body: String,
) -> Result<(), eyre::Report> {
    let ctx = world.user(&author)?;
    let message_id = world.message(&body)?.id();
    run_async(world.core.gate.delete_message(&ctx, message_id)).wrap_err("delete message")?;
    Ok(())
}
