//! Message lifecycle tests across the access gate.

use crate::in_memory_core::helpers::{TestResult, core, open_pair, runtime};
use crate::test_helpers::Core;
use parlour::access::AccessError;
use parlour::config::MessagingConfig;
use parlour::error::ErrorCategory;
use parlour::message::domain::{Message, MessageFilter, PageRequest};
use parlour::message::services::MessageStoreError;
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

/// Edits keep the send time; deletion hides the message from every listing
/// while the audit lookup still returns it.
#[rstest]
fn edit_then_delete(runtime: io::Result<Runtime>, core: Core) -> TestResult {
    let rt = runtime?;
    let pair = open_pair(&rt, &core)?;
    let sent = rt.block_on(core.gate.send_message(&pair.alice, pair.conversation_id, "draft"))?;

    let edited = rt.block_on(core.gate.edit_message(&pair.alice, sent.id(), "final"))?;
    let deleted = rt.block_on(core.gate.delete_message(&pair.alice, sent.id()))?;
    let listing = rt.block_on(core.gate.list_messages(
        &pair.bob,
        pair.conversation_id,
        PageRequest::first(),
        &MessageFilter::new(),
    ))?;
    let unread = rt.block_on(core.gate.unread_messages(&pair.bob))?;
    let last = rt.block_on(core.gate.last_message(&pair.bob, pair.conversation_id))?;
    let audit = rt.block_on(core.gate.get_message(&pair.bob, sent.id()))?;
    let read_deleted = rt.block_on(core.gate.mark_read(&pair.bob, sent.id()));

    assert_eq!(edited.sent_at(), sent.sent_at());
    assert_eq!(edited.body().as_str(), "final");
    assert!(deleted.is_deleted());
    assert!(listing.items().is_empty());
    assert_eq!(listing.total_items(), 0);
    assert!(unread.is_empty());
    assert!(last.is_none());
    assert_eq!(audit.body().as_str(), "final");
    let err = read_deleted.err().ok_or("deleted message was marked read")?;
    assert_eq!(err.category(), ErrorCategory::InvariantViolation);
    Ok(())
}

/// Self-reads are refused even for messages nobody else has read.
#[rstest]
fn sender_cannot_mark_own_message_read(runtime: io::Result<Runtime>, core: Core) -> TestResult {
    let rt = runtime?;
    let pair = open_pair(&rt, &core)?;
    let sent = rt.block_on(core.gate.send_message(&pair.alice, pair.conversation_id, "hello"))?;

    let result = rt.block_on(core.gate.mark_read(&pair.alice, sent.id()));

    let err = result.err().ok_or("self read accepted")?;
    assert_eq!(err.category(), ErrorCategory::Forbidden);
    assert!(!rt.block_on(core.gate.get_message(&pair.bob, sent.id()))?.is_read());
    Ok(())
}

/// Pages walk the history newest first with a configurable size.
#[rstest]
fn pages_walk_history_newest_first(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let core = Core::with_config(MessagingConfig::default().with_page_sizes(2, 3));
    let pair = open_pair(&rt, &core)?;
    let mut sent: Vec<Message> = Vec::new();
    for index in 0..5 {
        sent.push(rt.block_on(core.gate.send_message(
            &pair.alice,
            pair.conversation_id,
            format!("update {index}"),
        ))?);
    }

    let mut walked = Vec::new();
    let mut page_number = 1;
    loop {
        let page = rt.block_on(core.gate.list_messages(
            &pair.bob,
            pair.conversation_id,
            PageRequest::new(page_number, 50),
            &MessageFilter::new(),
        ))?;
        assert_eq!(page.page_size(), 3);
        walked.extend(page.items().iter().map(Message::id));
        if !page.has_next() {
            break;
        }
        page_number += 1;
    }
    let default_page = rt.block_on(core.gate.list_messages(
        &pair.bob,
        pair.conversation_id,
        PageRequest::first(),
        &MessageFilter::new(),
    ))?;

    let expected: Vec<_> = sent.iter().rev().map(Message::id).collect();
    assert_eq!(walked, expected);
    assert_eq!(page_number, 2);
    assert_eq!(default_page.items().len(), 2);
    Ok(())
}

/// Body search ignores case and composes with the sender filter.
#[rstest]
fn filters_narrow_the_listing(runtime: io::Result<Runtime>, core: Core) -> TestResult {
    let rt = runtime?;
    let pair = open_pair(&rt, &core)?;
    rt.block_on(core.gate.send_message(&pair.alice, pair.conversation_id, "Is the flat free?"))?;
    rt.block_on(core.gate.send_message(&pair.bob, pair.conversation_id, "The FLAT is free"))?;
    rt.block_on(core.gate.send_message(&pair.bob, pair.conversation_id, "See you"))?;

    let matching = rt.block_on(core.gate.list_messages(
        &pair.alice,
        pair.conversation_id,
        PageRequest::first(),
        &MessageFilter::new().body_contains("flat"),
    ))?;
    let from_bob = rt.block_on(core.gate.list_messages(
        &pair.alice,
        pair.conversation_id,
        PageRequest::first(),
        &MessageFilter::new()
            .from_sender(pair.bob.actor())
            .body_contains("flat"),
    ))?;

    assert_eq!(matching.total_items(), 2);
    assert_eq!(from_bob.total_items(), 1);
    Ok(())
}

/// Overlong bodies are rejected as invalid input and nothing is stored.
#[rstest]
fn overlong_body_is_rejected(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let core = Core::with_config(MessagingConfig::default().with_max_body_chars(8));
    let pair = open_pair(&rt, &core)?;

    let result = rt.block_on(core.gate.send_message(
        &pair.alice,
        pair.conversation_id,
        "far too long for the limit",
    ));

    assert!(matches!(
        result,
        Err(AccessError::Message(MessageStoreError::Domain(_)))
    ));
    assert!(core.messages.is_empty());
    Ok(())
}
