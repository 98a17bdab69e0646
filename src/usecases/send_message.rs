//! Use case for sending a message to the open group.
//!
//! A send has two independent side effects: appending to the durable group
//! history and broadcasting on the live transport. History is written first
//! and is the source of truth, so a partial failure can leave a message
//! persisted but never broadcast, never the reverse.

use chrono::{DateTime, Utc};

use crate::domain::{
    group::GroupId,
    message::{ConnectionId, Message},
    user::User,
};

use super::contracts::{AvatarThumbnailer, GroupStore, GroupStoreError, MessageTransport};

/// Event name used for chat payloads on the transport.
pub const CHAT_MESSAGE_EVENT: &str = "chat-message";

const SEND_BROADCAST_FAILED: &str = "CHAT_SEND_BROADCAST_FAILED";

/// Command to send a message to a specific group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub group_id: GroupId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Who is sending, as seen by the live stream.
#[derive(Debug, Clone, Copy)]
pub struct OutgoingSender<'a> {
    pub user: &'a User,
    pub connection_id: &'a ConnectionId,
    pub default_avatar: &'a str,
    pub avatar_px: u32,
}

/// Collaborators touched by a send.
#[derive(Clone, Copy)]
pub struct SendPorts<'a> {
    pub store: &'a dyn GroupStore,
    pub transport: &'a dyn MessageTransport,
    pub thumbnailer: &'a dyn AvatarThumbnailer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Persisted and broadcast.
    Delivered,
    /// Persisted, but the live broadcast failed. Other clients see the
    /// message the next time they open the group.
    PersistedWithoutBroadcast,
}

/// Domain-level errors for the send operation. None of them leave a
/// persisted message behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Message text is empty after trimming whitespace.
    EmptyMessage,
    NoOpenGroup,
    IdentityUnavailable,
    /// The sender avatar could not be shrunk for embedding.
    AvatarUnavailable,
    GroupNotFound,
    TemporarilyUnavailable,
}

impl SendMessageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "Message is empty.",
            Self::NoOpenGroup => "Open a group first.",
            Self::IdentityUnavailable => "Your account could not be resolved.",
            Self::AvatarUnavailable => "Your avatar could not be prepared.",
            Self::GroupNotFound => "That group no longer exists.",
            Self::TemporarilyUnavailable => "Message could not be saved, try again.",
        }
    }
}

/// Builds the live payload for a send.
pub fn build_outgoing_message(
    sender: &OutgoingSender<'_>,
    avatar: String,
    group_id: GroupId,
    text: &str,
    timestamp: DateTime<Utc>,
) -> Message {
    Message {
        group_id,
        sender_id: sender.user.id.clone(),
        sender_name: sender.user.display_name(),
        sender_avatar: avatar,
        text: text.to_owned(),
        timestamp,
        connection_id: Some(sender.connection_id.clone()),
    }
}

/// Sends a message to the specified group.
///
/// The sender's own message is not returned for display: it reaches the
/// message list through the live echo like every other message.
pub async fn send_message(
    ports: SendPorts<'_>,
    channel: &str,
    sender: OutgoingSender<'_>,
    command: SendMessageCommand,
) -> Result<SendOutcome, SendMessageError> {
    // Whitespace only decides emptiness; the text is sent as typed.
    if command.text.trim().is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }
    let text = command.text.as_str();

    let avatar = ports
        .thumbnailer
        .thumbnail(sender.user.avatar_or(sender.default_avatar), sender.avatar_px)
        .map_err(|_| SendMessageError::AvatarUnavailable)?;

    let message = build_outgoing_message(
        &sender,
        avatar,
        command.group_id.clone(),
        text,
        command.timestamp,
    );

    ports
        .store
        .append_message(&command.group_id, &sender.user.id, text)
        .await
        .map_err(map_store_error)?;

    match ports
        .transport
        .publish(channel, CHAT_MESSAGE_EVENT, &message)
        .await
    {
        Ok(()) => Ok(SendOutcome::Delivered),
        Err(error) => {
            tracing::warn!(
                code = SEND_BROADCAST_FAILED,
                error = ?error,
                group_id = %command.group_id,
                channel,
                "message persisted but live broadcast failed"
            );
            Ok(SendOutcome::PersistedWithoutBroadcast)
        }
    }
}

fn map_store_error(error: GroupStoreError) -> SendMessageError {
    match error {
        GroupStoreError::NotFound => SendMessageError::GroupNotFound,
        GroupStoreError::Unavailable | GroupStoreError::Conflict | GroupStoreError::InvalidData => {
            SendMessageError::TemporarilyUnavailable
        }
    }
}
