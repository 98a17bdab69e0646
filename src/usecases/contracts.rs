//! Collaborator seams of the chat session: the group store, the live
//! message transport, the user directory and the avatar thumbnailer.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{
    group::{Group, GroupId},
    message::{ConnectionId, Message, PersistedMessage},
    user::{User, UserId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupStoreError {
    /// Backend could not be reached or failed internally.
    Unavailable,
    NotFound,
    /// Backend rejected the write, e.g. a duplicate group name.
    Conflict,
    InvalidData,
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn list_groups(&self) -> Result<Vec<Group>, GroupStoreError>;

    async fn create_group(&self, name: &str, creator: &UserId) -> Result<Group, GroupStoreError>;

    async fn group_messages(
        &self,
        group_id: &GroupId,
    ) -> Result<Vec<PersistedMessage>, GroupStoreError>;

    async fn append_message(
        &self,
        group_id: &GroupId,
        sender: &UserId,
        text: &str,
    ) -> Result<(), GroupStoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Disconnected,
    Encode,
}

/// Inbound messages for one channel. Dropping it ends the subscription.
#[derive(Debug)]
pub struct TransportSubscription {
    channel: String,
    inbound: mpsc::Receiver<Message>,
}

impl TransportSubscription {
    pub fn new(channel: impl Into<String>, inbound: mpsc::Receiver<Message>) -> Self {
        Self {
            channel: channel.into(),
            inbound,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub async fn next(&mut self) -> Option<Message> {
        self.inbound.recv().await
    }
}

#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Stable for the lifetime of the live connection.
    fn connection_id(&self) -> ConnectionId;

    async fn publish(
        &self,
        channel: &str,
        event: &str,
        payload: &Message,
    ) -> Result<(), TransportError>;

    async fn subscribe(&self, channel: &str) -> Result<TransportSubscription, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookupError {
    NotFound,
    Unavailable,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_by_email(&self, email: &str) -> Result<User, UserLookupError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailError {
    Decode,
    Encode,
}

pub trait AvatarThumbnailer: Send + Sync {
    /// Shrinks `avatar` to fit within `max_px` x `max_px`.
    fn thumbnail(&self, avatar: &str, max_px: u32) -> Result<String, ThumbnailError>;
}
