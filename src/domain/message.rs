use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    group::GroupId,
    user::{User, UserId},
};

/// Identifier of one live transport connection (not of a user account).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message as kept in a group's durable history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedMessage {
    pub sender: User,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// The common message shape shown in the open group, whether it came from
/// history or from the live stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub group_id: GroupId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_avatar: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Set only on live messages; history carries no connection identity.
    #[serde(default)]
    pub connection_id: Option<ConnectionId>,
}

impl Message {
    pub fn from_persisted(
        group_id: &GroupId,
        persisted: PersistedMessage,
        default_avatar: &str,
    ) -> Self {
        Self {
            group_id: group_id.clone(),
            sender_avatar: persisted.sender.avatar_or(default_avatar).to_owned(),
            sender_name: persisted.sender.display_name(),
            sender_id: persisted.sender.id,
            text: persisted.text,
            timestamp: persisted.timestamp,
            connection_id: None,
        }
    }

    pub fn is_sent_by(&self, connection: &ConnectionId) -> bool {
        self.connection_id.as_ref() == Some(connection)
    }
}
