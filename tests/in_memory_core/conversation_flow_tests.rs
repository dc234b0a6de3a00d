//! Conversation flow tests across the access gate.

use crate::in_memory_core::helpers::{TestResult, core, open_pair, runtime};
use crate::test_helpers::Core;
use parlour::access::{AccessError, ForbiddenReason};
use parlour::error::ErrorCategory;
use parlour::message::domain::{MessageFilter, PageRequest};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

/// A reply advances the activity marker and only the other side's message
/// is marked read.
#[rstest]
fn reply_advances_activity_and_mark_all_read_skips_own(
    runtime: io::Result<Runtime>,
    core: Core,
) -> TestResult {
    let rt = runtime?;
    let pair = open_pair(&rt, &core)?;

    let hi = rt.block_on(core.gate.send_message(&pair.alice, pair.conversation_id, "hi"))?;
    let hey = rt.block_on(core.gate.send_message(&pair.bob, pair.conversation_id, "hey"))?;
    let marked = rt.block_on(core.gate.mark_all_read(&pair.bob, pair.conversation_id))?;
    let conversation = rt.block_on(core.gate.get_conversation(&pair.bob, pair.conversation_id))?;

    assert!(hey.sent_at() > hi.sent_at());
    assert_eq!(conversation.last_message_at(), Some(hey.sent_at()));
    assert_eq!(marked, 1);
    assert!(rt.block_on(core.gate.get_message(&pair.bob, hi.id()))?.is_read());
    assert!(!rt.block_on(core.gate.get_message(&pair.bob, hey.id()))?.is_read());
    Ok(())
}

/// The last two participants cannot be separated.
#[rstest]
fn two_participant_floor_holds(runtime: io::Result<Runtime>, core: Core) -> TestResult {
    let rt = runtime?;
    let pair = open_pair(&rt, &core)?;

    let removal = rt.block_on(core.gate.remove_participant(
        &pair.alice,
        pair.conversation_id,
        pair.bob.actor(),
    ));
    let conversation = rt.block_on(core.gate.get_conversation(&pair.alice, pair.conversation_id))?;

    let err = removal.err().ok_or("removal should fail")?;
    assert_eq!(err.category(), ErrorCategory::InvariantViolation);
    assert_eq!(
        conversation.participants().as_slice(),
        &[pair.alice.actor(), pair.bob.actor()]
    );
    Ok(())
}

/// Outsiders receive no data from a conversation listing.
#[rstest]
fn outsider_listing_is_forbidden(runtime: io::Result<Runtime>, core: Core) -> TestResult {
    let rt = runtime?;
    let pair = open_pair(&rt, &core)?;
    let carol = core.register("Carol")?;
    rt.block_on(core.gate.send_message(&pair.alice, pair.conversation_id, "private"))?;

    let listing = rt.block_on(core.gate.list_messages(
        &carol,
        pair.conversation_id,
        PageRequest::first(),
        &MessageFilter::new(),
    ));

    assert!(matches!(
        listing,
        Err(AccessError::Forbidden(ForbiddenReason::NotParticipant))
    ));
    Ok(())
}

/// Joining, leaving and deactivation flow through to listings.
#[rstest]
fn membership_changes_drive_listings(runtime: io::Result<Runtime>, core: Core) -> TestResult {
    let rt = runtime?;
    let pair = open_pair(&rt, &core)?;
    let carol = core.register("Carol")?;

    rt.block_on(core.gate.add_participant(&pair.alice, pair.conversation_id, carol.actor()))?;
    let joined = rt.block_on(core.gate.list_conversations(&carol, false))?;
    rt.block_on(core.gate.remove_participant(&pair.bob, pair.conversation_id, carol.actor()))?;
    let left = rt.block_on(core.gate.list_conversations(&carol, false))?;
    rt.block_on(core.gate.deactivate_conversation(&pair.alice, pair.conversation_id))?;
    let active = rt.block_on(core.gate.list_conversations(&pair.alice, true))?;
    let all = rt.block_on(core.gate.list_conversations(&pair.alice, false))?;
    let send_after_close =
        rt.block_on(core.gate.send_message(&pair.alice, pair.conversation_id, "anyone?"));

    assert_eq!(joined.len(), 1);
    assert!(left.is_empty());
    assert!(active.is_empty());
    assert_eq!(all.len(), 1);
    let err = send_after_close.err().ok_or("inactive conversation accepted a message")?;
    assert_eq!(err.category(), ErrorCategory::InvariantViolation);
    Ok(())
}

/// Summaries combine ordering, the last visible message and unread counts.
#[rstest]
fn summaries_reflect_activity(runtime: io::Result<Runtime>, core: Core) -> TestResult {
    let rt = runtime?;
    let pair = open_pair(&rt, &core)?;
    let carol = core.register("Carol")?;
    let side = rt.block_on(core.gate.create_conversation(&pair.bob, vec![carol.actor()]))?;
    rt.block_on(core.gate.send_message(&pair.alice, pair.conversation_id, "first"))?;
    let newest = rt.block_on(core.gate.send_message(&carol, side.id(), "newest"))?;

    let summaries = rt.block_on(core.gate.conversation_summaries(&pair.bob, true))?;

    let ids: Vec<_> = summaries.iter().map(|summary| summary.conversation.id()).collect();
    assert_eq!(ids, vec![side.id(), pair.conversation_id]);
    let top = summaries.first().ok_or("missing summary")?;
    assert_eq!(top.last_message.as_ref(), Some(&newest));
    assert_eq!(top.unread_count, 1);
    let total_unread: usize = summaries.iter().map(|summary| summary.unread_count).sum();
    assert_eq!(total_unread, 2);
    Ok(())
}
