use crate::domain::{
    group::Group,
    user::{SessionIdentity, User},
};

use super::contracts::{GroupStore, GroupStoreError, UserDirectory, UserLookupError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadGroupsError {
    TemporarilyUnavailable,
    DataContractViolation,
}

impl LoadGroupsError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::TemporarilyUnavailable => "Groups are temporarily unavailable.",
            Self::DataContractViolation => "The group list could not be read.",
        }
    }
}

pub async fn load_groups(store: &dyn GroupStore) -> Result<Vec<Group>, LoadGroupsError> {
    store.list_groups().await.map_err(map_source_error)
}

fn map_source_error(error: GroupStoreError) -> LoadGroupsError {
    match error {
        GroupStoreError::Unavailable | GroupStoreError::NotFound | GroupStoreError::Conflict => {
            LoadGroupsError::TemporarilyUnavailable
        }
        GroupStoreError::InvalidData => LoadGroupsError::DataContractViolation,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveUserError {
    MissingEmail,
    UnknownUser,
    TemporarilyUnavailable,
}

/// Looks up the platform account behind the session identity.
pub async fn resolve_user(
    directory: &dyn UserDirectory,
    identity: &SessionIdentity,
) -> Result<User, ResolveUserError> {
    let email = identity.email.trim();
    if email.is_empty() {
        return Err(ResolveUserError::MissingEmail);
    }

    directory
        .user_by_email(email)
        .await
        .map_err(|error| match error {
            UserLookupError::NotFound => ResolveUserError::UnknownUser,
            UserLookupError::Unavailable => ResolveUserError::TemporarilyUnavailable,
        })
}
