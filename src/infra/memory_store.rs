use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        group::{Group, GroupId},
        message::PersistedMessage,
        user::{User, UserId},
    },
    infra::group_document::GroupDocument,
    usecases::contracts::{GroupStore, GroupStoreError, UserDirectory, UserLookupError},
};

/// Process-local group store. Contents vanish when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    document: RwLock<GroupDocument>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_user(&self, user: User) -> User {
        self.document.write().await.upsert_user(user)
    }
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn list_groups(&self) -> Result<Vec<Group>, GroupStoreError> {
        Ok(self.document.read().await.groups())
    }

    async fn create_group(&self, name: &str, creator: &UserId) -> Result<Group, GroupStoreError> {
        self.document.write().await.create_group(name, creator)
    }

    async fn group_messages(
        &self,
        group_id: &GroupId,
    ) -> Result<Vec<PersistedMessage>, GroupStoreError> {
        self.document.read().await.group_messages(group_id)
    }

    async fn append_message(
        &self,
        group_id: &GroupId,
        sender: &UserId,
        text: &str,
    ) -> Result<(), GroupStoreError> {
        self.document
            .write()
            .await
            .append_message(group_id, sender, text, Utc::now())
    }
}

#[async_trait]
impl UserDirectory for InMemoryGroupStore {
    async fn user_by_email(&self, email: &str) -> Result<User, UserLookupError> {
        self.document
            .read()
            .await
            .user_by_email(email)
            .ok_or(UserLookupError::NotFound)
    }
}
