//! The access gate and its conversation summary read model.

use super::{AccessError, AccessResult, AccessTarget, ForbiddenReason, RequestContext};
use crate::config::MessagingConfig;
use crate::conversation::{
    domain::{Conversation, ConversationId},
    ports::ConversationRepository,
    services::{ConversationLocks, ConversationStore},
};
use crate::identity::{
    domain::{User, UserId},
    ports::IdentityRegistry,
};
use crate::message::{
    domain::{Message, MessageFilter, MessageId, Page, PageRequest},
    ports::MessageRepository,
    services::MessageStore,
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Per-conversation overview for the acting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    /// The conversation itself.
    pub conversation: Conversation,
    /// Number of current participants.
    pub participants_count: usize,
    /// Newest non-deleted message, if any.
    pub last_message: Option<Message>,
    /// Messages waiting to be read by the acting user.
    pub unread_count: usize,
}

/// Authorising facade over the conversation and message stores.
pub struct AccessGate<M, R, I, C>
where
    M: MessageRepository,
    R: ConversationRepository,
    I: IdentityRegistry,
    C: Clock + Send + Sync,
{
    identities: Arc<I>,
    conversations: ConversationStore<R, I, C>,
    messages: MessageStore<M, R, I, C>,
}

impl<M, R, I, C> Clone for AccessGate<M, R, I, C>
where
    M: MessageRepository,
    R: ConversationRepository,
    I: IdentityRegistry,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            identities: Arc::clone(&self.identities),
            conversations: self.conversations.clone(),
            messages: self.messages.clone(),
        }
    }
}

impl<M, R, I, C> AccessGate<M, R, I, C>
where
    M: MessageRepository,
    R: ConversationRepository,
    I: IdentityRegistry,
    C: Clock + Send + Sync,
{
    /// Creates a gate over already assembled stores.
    #[must_use]
    pub const fn new(
        identities: Arc<I>,
        conversations: ConversationStore<R, I, C>,
        messages: MessageStore<M, R, I, C>,
    ) -> Self {
        Self {
            identities,
            conversations,
            messages,
        }
    }

    /// Wires both stores and a shared lock table from repositories.
    #[must_use]
    pub fn assemble(
        message_repository: Arc<M>,
        conversation_repository: Arc<R>,
        identities: Arc<I>,
        clock: Arc<C>,
        config: MessagingConfig,
    ) -> Self {
        let locks = Arc::new(ConversationLocks::new(config.lock_timeout()));
        let conversations = ConversationStore::new(
            conversation_repository,
            Arc::clone(&identities),
            Arc::clone(&clock),
            locks,
        );
        let messages = MessageStore::new(message_repository, conversations.clone(), clock, config);
        Self::new(identities, conversations, messages)
    }

    /// Returns the conversation store behind the gate.
    #[must_use]
    pub const fn conversations(&self) -> &ConversationStore<R, I, C> {
        &self.conversations
    }

    /// Returns the message store behind the gate.
    #[must_use]
    pub const fn messages(&self) -> &MessageStore<M, R, I, C> {
        &self.messages
    }

    /// Resolves the actor and checks participancy for `target`.
    ///
    /// Returns the conversation the target belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::DeadlineExceeded`], [`AccessError::UnknownUser`],
    /// [`AccessError::Forbidden`], or a not-found error for the target.
    pub async fn authorize(
        &self,
        ctx: &RequestContext,
        target: AccessTarget,
    ) -> AccessResult<Conversation> {
        self.resolve_actor(ctx).await?;
        let conversation = match target {
            AccessTarget::Conversation(id) => self.conversations.get(id).await?,
            AccessTarget::Message(id) => {
                let message = self.messages.get(id).await?;
                self.conversations.get(message.conversation_id()).await?
            }
        };
        if !conversation.is_participant(ctx.actor()) {
            debug!(actor = %ctx.actor(), access_target = %target, "access denied: not a participant");
            return Err(AccessError::Forbidden(ForbiddenReason::NotParticipant));
        }
        Ok(conversation)
    }

    /// Creates a conversation with the actor as creator.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownUser`] or [`AccessError::Forbidden`] for
    /// the actor, or the conversation store's creation errors.
    pub async fn create_conversation(
        &self,
        ctx: &RequestContext,
        participant_ids: Vec<UserId>,
    ) -> AccessResult<Conversation> {
        self.resolve_actor(ctx).await?;
        Ok(self.conversations.create(participant_ids, ctx.actor()).await?)
    }

    /// Returns a conversation the actor participates in.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`].
    pub async fn get_conversation(
        &self,
        ctx: &RequestContext,
        conversation_id: ConversationId,
    ) -> AccessResult<Conversation> {
        self.authorize(ctx, conversation_id.into()).await
    }

    /// Lists the actor's conversations, most recently active first.
    ///
    /// # Errors
    ///
    /// Returns actor resolution errors or a store error.
    pub async fn list_conversations(
        &self,
        ctx: &RequestContext,
        active_only: bool,
    ) -> AccessResult<Vec<Conversation>> {
        self.resolve_actor(ctx).await?;
        Ok(self
            .conversations
            .list_for_user(ctx.actor(), active_only)
            .await?)
    }

    /// Lists the actor's conversations with last message and unread count.
    ///
    /// # Errors
    ///
    /// Returns actor resolution errors or a store error.
    pub async fn conversation_summaries(
        &self,
        ctx: &RequestContext,
        active_only: bool,
    ) -> AccessResult<Vec<ConversationSummary>> {
        let conversations = self.list_conversations(ctx, active_only).await?;
        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let last_message = self.messages.last_message(conversation.id()).await?;
            let unread_count = self
                .messages
                .unread_count(conversation.id(), ctx.actor())
                .await?;
            summaries.push(ConversationSummary {
                participants_count: conversation.participants().len(),
                conversation,
                last_message,
                unread_count,
            });
        }
        Ok(summaries)
    }

    /// Adds a participant to a conversation the actor belongs to.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`] or the
    /// conversation store's membership errors.
    pub async fn add_participant(
        &self,
        ctx: &RequestContext,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> AccessResult<Conversation> {
        self.authorize(ctx, conversation_id.into()).await?;
        Ok(self
            .conversations
            .add_participant(conversation_id, user_id, ctx.deadline())
            .await?)
    }

    /// Removes a participant from a conversation the actor belongs to.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`] or the
    /// conversation store's membership errors.
    pub async fn remove_participant(
        &self,
        ctx: &RequestContext,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> AccessResult<Conversation> {
        self.authorize(ctx, conversation_id.into()).await?;
        Ok(self
            .conversations
            .remove_participant(conversation_id, user_id, ctx.deadline())
            .await?)
    }

    /// Deactivates a conversation the actor belongs to.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`] or a store
    /// error.
    pub async fn deactivate_conversation(
        &self,
        ctx: &RequestContext,
        conversation_id: ConversationId,
    ) -> AccessResult<Conversation> {
        self.authorize(ctx, conversation_id.into()).await?;
        Ok(self
            .conversations
            .deactivate(conversation_id, ctx.deadline())
            .await?)
    }

    /// Sends a message as the actor.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`] or the message
    /// store's append errors.
    pub async fn send_message(
        &self,
        ctx: &RequestContext,
        conversation_id: ConversationId,
        body: impl Into<String> + Send,
    ) -> AccessResult<Message> {
        self.authorize(ctx, conversation_id.into()).await?;
        Ok(self
            .messages
            .append(conversation_id, ctx.actor(), body, ctx.deadline())
            .await?)
    }

    /// Returns a message by identifier, including deleted messages.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`].
    pub async fn get_message(
        &self,
        ctx: &RequestContext,
        message_id: MessageId,
    ) -> AccessResult<Message> {
        self.authorize(ctx, message_id.into()).await?;
        Ok(self.messages.get(message_id).await?)
    }

    /// Marks a message read as the actor.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`] or the message
    /// store's read-state errors.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        message_id: MessageId,
    ) -> AccessResult<Message> {
        self.authorize(ctx, message_id.into()).await?;
        Ok(self
            .messages
            .mark_read(message_id, ctx.actor(), ctx.deadline())
            .await?)
    }

    /// Marks every message waiting for the actor in a conversation as read.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`] or a store
    /// error.
    pub async fn mark_all_read(
        &self,
        ctx: &RequestContext,
        conversation_id: ConversationId,
    ) -> AccessResult<usize> {
        self.authorize(ctx, conversation_id.into()).await?;
        Ok(self
            .messages
            .mark_all_read(conversation_id, ctx.actor(), ctx.deadline())
            .await?)
    }

    /// Edits one of the actor's messages.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`] or the message
    /// store's edit errors.
    pub async fn edit_message(
        &self,
        ctx: &RequestContext,
        message_id: MessageId,
        new_body: impl Into<String> + Send,
    ) -> AccessResult<Message> {
        self.authorize(ctx, message_id.into()).await?;
        Ok(self
            .messages
            .edit(message_id, ctx.actor(), new_body, ctx.deadline())
            .await?)
    }

    /// Soft-deletes one of the actor's messages.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`] or the message
    /// store's deletion errors.
    pub async fn delete_message(
        &self,
        ctx: &RequestContext,
        message_id: MessageId,
    ) -> AccessResult<Message> {
        self.authorize(ctx, message_id.into()).await?;
        Ok(self
            .messages
            .soft_delete(message_id, ctx.actor(), ctx.deadline())
            .await?)
    }

    /// Lists non-deleted messages of a conversation, newest first.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`] or a store
    /// error.
    pub async fn list_messages(
        &self,
        ctx: &RequestContext,
        conversation_id: ConversationId,
        page: PageRequest,
        filter: &MessageFilter,
    ) -> AccessResult<Page<Message>> {
        self.authorize(ctx, conversation_id.into()).await?;
        Ok(self
            .messages
            .list_for_conversation(conversation_id, ctx.actor(), page, filter)
            .await?)
    }

    /// Returns every message waiting for the actor, newest first.
    ///
    /// # Errors
    ///
    /// Returns actor resolution errors or a store error.
    pub async fn unread_messages(&self, ctx: &RequestContext) -> AccessResult<Vec<Message>> {
        self.resolve_actor(ctx).await?;
        Ok(self.messages.unread_for(ctx.actor()).await?)
    }

    /// Returns the newest non-deleted message of a conversation.
    ///
    /// # Errors
    ///
    /// Returns the authorisation errors of [`Self::authorize`] or a store
    /// error.
    pub async fn last_message(
        &self,
        ctx: &RequestContext,
        conversation_id: ConversationId,
    ) -> AccessResult<Option<Message>> {
        self.authorize(ctx, conversation_id.into()).await?;
        Ok(self.messages.last_message(conversation_id).await?)
    }

    async fn resolve_actor(&self, ctx: &RequestContext) -> AccessResult<User> {
        ctx.deadline().check()?;
        let user = self.identities.lookup(ctx.actor()).await?;
        if !user.is_active() {
            debug!(actor = %ctx.actor(), "access denied: inactive account");
            return Err(AccessError::Forbidden(ForbiddenReason::InactiveAccount));
        }
        Ok(user)
    }
}
