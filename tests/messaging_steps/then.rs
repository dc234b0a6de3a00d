//! Then steps for conversation messaging BDD scenarios.

use super::world::{MessagingWorld, run_async};
use rstest_bdd_macros::then;

#[then(r#"the conversation's last activity is the time of "{body}""#)]
fn last_activity_matches(world: &mut MessagingWorld, body: String) -> Result<(), eyre::Report> {
    let expected = world.message(&body)?.sent_at();
    let conversation_id = world.conversation()?;
    let conversation = run_async(world.core.gate.conversations().get(conversation_id))
        .map_err(|err| eyre::eyre!("get conversation failed: {err}"))?;
    if conversation.last_message_at() != Some(expected) {
        return Err(eyre::eyre!(
            "expected last activity {expected}, found {:?}",
            conversation.last_message_at()
        ));
    }
    Ok(())
}

#[then("{count:usize} message was marked read")]
fn marked_count(world: &MessagingWorld, count: usize) -> Result<(), eyre::Report> {
    let marked = world
        .last_marked
        .ok_or_else(|| eyre::eyre!("mark-all-read was not called"))?;
    if marked != count {
        return Err(eyre::eyre!("expected {count} marked, found {marked}"));
    }
    Ok(())
}

fn read_state(world: &MessagingWorld, body: &str) -> Result<bool, eyre::Report> {
    let message_id = world.message(body)?.id();
    let stored = run_async(world.core.gate.messages().get(message_id))
        .map_err(|err| eyre::eyre!("message lookup failed: {err}"))?;
    Ok(stored.is_read())
}

#[then(r#"the message "{body}" is read"#)]
fn message_is_read(world: &MessagingWorld, body: String) -> Result<(), eyre::Report> {
    if !read_state(world, &body)? {
        return Err(eyre::eyre!("expected '{body}' to be read"));
    }
    Ok(())
}

#[then(r#"the message "{body}" is unread"#)]
fn message_is_unread(world: &MessagingWorld, body: String) -> Result<(), eyre::Report> {
    if read_state(world, &body)? {
        return Err(eyre::eyre!("expected '{body}' to stay unread"));
    }
    Ok(())
}

#[then(r#"the call fails with category "{category}""#)]
fn call_fails_with(world: &MessagingWorld, category: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the last call to fail"))?;
    if err.category().as_str() != category {
        return Err(eyre::eyre!(
            "expected category {category}, got {} ({err})",
            err.category()
        ));
    }
    Ok(())
}

#[then("the conversation has {count:usize} participants")]
fn participant_count(world: &MessagingWorld, count: usize) -> Result<(), eyre::Report> {
    let conversation_id = world.conversation()?;
    let conversation = run_async(world.core.gate.conversations().get(conversation_id))
        .map_err(|err| eyre::eyre!("get conversation failed: {err}"))?;
    if conversation.participants().len() != count {
        return Err(eyre::eyre!(
            "expected {count} participants, found {}",
            conversation.participants().len()
        ));
    }
    Ok(())
}

#[then("no messages were returned")]
fn nothing_returned(world: &MessagingWorld) -> Result<(), eyre::Report> {
    if world.last_listing.is_some() {
        return Err(eyre::eyre!("expected no listing, got {:?}", world.last_listing));
    }
    Ok(())
}

#[then("{count:usize} message is listed")]
fn listed_count(world: &MessagingWorld, count: usize) -> Result<(), eyre::Report> {
    let listed = world
        .last_listing
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no listing in scenario world"))?;
    if listed.len() != count {
        return Err(eyre::eyre!("expected {count} listed, found {}", listed.len()));
    }
    Ok(())
}
