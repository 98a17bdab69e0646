//! Serializable group store contents shared by the in-memory and JSON file
//! stores.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{
        group::{Group, GroupId},
        message::PersistedMessage,
        user::{User, UserId},
    },
    usecases::contracts::GroupStoreError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredMessage {
    sender: UserId,
    text: String,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDocument {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    groups: Vec<Group>,
    #[serde(default)]
    messages: BTreeMap<GroupId, Vec<StoredMessage>>,
}

impl GroupDocument {
    /// Registers `user` by email, keeping the id of an existing account.
    pub fn upsert_user(&mut self, user: User) -> User {
        if let Some(existing) = self.users.iter_mut().find(|u| u.email == user.email) {
            let id = existing.id.clone();
            *existing = User { id, ..user };
            return existing.clone();
        }

        self.users.push(user.clone());
        user
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users.iter().find(|user| user.email == email).cloned()
    }

    pub fn groups(&self) -> Vec<Group> {
        self.groups.clone()
    }

    pub fn create_group(&mut self, name: &str, creator: &UserId) -> Result<Group, GroupStoreError> {
        if self.groups.iter().any(|group| group.has_name(name)) {
            return Err(GroupStoreError::Conflict);
        }

        let group = Group {
            id: GroupId::new(Uuid::new_v4().to_string()),
            name: name.to_owned(),
            members: vec![creator.clone()],
        };
        self.groups.push(group.clone());
        self.messages.insert(group.id.clone(), Vec::new());
        Ok(group)
    }

    pub fn group_messages(&self, group_id: &GroupId) -> Result<Vec<PersistedMessage>, GroupStoreError> {
        if !self.has_group(group_id) {
            return Err(GroupStoreError::NotFound);
        }

        self.messages
            .get(group_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|stored| {
                let sender = self
                    .users
                    .iter()
                    .find(|user| user.id == stored.sender)
                    .cloned()
                    .ok_or(GroupStoreError::InvalidData)?;

                Ok(PersistedMessage {
                    sender,
                    text: stored.text.clone(),
                    timestamp: stored.timestamp,
                })
            })
            .collect()
    }

    /// Appends to the group history; the sender becomes a member.
    pub fn append_message(
        &mut self,
        group_id: &GroupId,
        sender: &UserId,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), GroupStoreError> {
        let group = self
            .groups
            .iter_mut()
            .find(|group| &group.id == group_id)
            .ok_or(GroupStoreError::NotFound)?;

        if !group.members.contains(sender) {
            group.members.push(sender.clone());
        }

        self.messages
            .entry(group_id.clone())
            .or_default()
            .push(StoredMessage {
                sender: sender.clone(),
                text: text.to_owned(),
                timestamp,
            });
        Ok(())
    }

    fn has_group(&self, group_id: &GroupId) -> bool {
        self.groups.iter().any(|group| &group.id == group_id)
    }
}
