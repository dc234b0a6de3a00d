//! Concurrency tests: appends to one conversation serialise, appends to
//! different conversations proceed independently.

use crate::in_memory_core::helpers::{TestResult, core, open_pair, runtime};
use crate::test_helpers::Core;
use rstest::rstest;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::task::JoinSet;

const ROUNDS: usize = 20;

/// Both sides posting at once still leaves the marker on the newest message.
#[rstest]
fn parallel_senders_share_one_conversation(
    runtime: io::Result<Runtime>,
    core: Core,
) -> TestResult {
    let rt = runtime?;
    let pair = open_pair(&rt, &core)?;
    let core = Arc::new(core);

    let sent = rt.block_on(async {
        let mut tasks = JoinSet::new();
        for ctx in [pair.alice, pair.bob] {
            let shared = Arc::clone(&core);
            let conversation_id = pair.conversation_id;
            tasks.spawn(async move {
                let mut times = Vec::with_capacity(ROUNDS);
                for round in 0..ROUNDS {
                    let message = shared
                        .gate
                        .send_message(&ctx, conversation_id, format!("round {round}"))
                        .await?;
                    times.push(message.sent_at());
                }
                Ok::<_, parlour::access::AccessError>(times)
            });
        }
        let mut all = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            all.extend(joined??);
        }
        Ok::<_, Box<dyn std::error::Error + Send + Sync>>(all)
    })?;

    let conversation = rt.block_on(core.gate.get_conversation(&pair.alice, pair.conversation_id))?;
    assert_eq!(sent.len(), 2 * ROUNDS);
    assert_eq!(core.messages.len(), 2 * ROUNDS);
    assert_eq!(conversation.last_message_at(), sent.iter().max().copied());
    Ok(())
}

/// Separate conversations each track their own newest message.
#[rstest]
fn independent_conversations_do_not_interfere(
    runtime: io::Result<Runtime>,
    core: Core,
) -> TestResult {
    let rt = runtime?;
    let first = open_pair(&rt, &core)?;
    let second = open_pair(&rt, &core)?;
    let core = Arc::new(core);

    rt.block_on(async {
        let mut tasks = JoinSet::new();
        for (ctx, conversation_id) in [
            (first.alice, first.conversation_id),
            (second.bob, second.conversation_id),
        ] {
            let shared = Arc::clone(&core);
            tasks.spawn(async move {
                for round in 0..ROUNDS {
                    shared
                        .gate
                        .send_message(&ctx, conversation_id, format!("round {round}"))
                        .await?;
                }
                Ok::<_, parlour::access::AccessError>(())
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined??;
        }
        Ok::<_, Box<dyn std::error::Error + Send + Sync>>(())
    })?;

    for (ctx, conversation_id) in [
        (first.bob, first.conversation_id),
        (second.alice, second.conversation_id),
    ] {
        let last = rt
            .block_on(core.gate.last_message(&ctx, conversation_id))?
            .ok_or("conversation has messages")?;
        let conversation = rt.block_on(core.gate.get_conversation(&ctx, conversation_id))?;
        assert_eq!(conversation.last_message_at(), Some(last.sent_at()));
        assert_eq!(rt.block_on(core.gate.unread_messages(&ctx))?.len(), ROUNDS);
    }
    Ok(())
}
