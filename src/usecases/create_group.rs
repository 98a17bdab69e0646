use crate::domain::{group::Group, user::UserId};

use super::contracts::{GroupStore, GroupStoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGroupCommand {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateGroupError {
    /// Name is empty after trimming whitespace.
    EmptyName,
    /// A group with the same (case-sensitive) name is already listed.
    DuplicateName,
    /// The session user has not been resolved yet.
    IdentityUnavailable,
    /// The store itself refused the name.
    Conflict,
    TemporarilyUnavailable,
    DataContractViolation,
}

impl CreateGroupError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyName => "Group name must not be empty.",
            Self::DuplicateName | Self::Conflict => "A group with this name already exists.",
            Self::IdentityUnavailable => "Your account could not be resolved.",
            Self::TemporarilyUnavailable => "Groups are temporarily unavailable.",
            Self::DataContractViolation => "The created group could not be read.",
        }
    }
}

/// Checks a requested name against the groups already known to this client.
///
/// Returns the trimmed name. Other clients may create the same name
/// concurrently; the store stays the source of truth for that race.
pub fn validate_group_name<'a>(
    existing: &[Group],
    name: &'a str,
) -> Result<&'a str, CreateGroupError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CreateGroupError::EmptyName);
    }

    if existing.iter().any(|group| group.has_name(name)) {
        return Err(CreateGroupError::DuplicateName);
    }

    Ok(name)
}

pub async fn create_group(
    store: &dyn GroupStore,
    existing: &[Group],
    creator: &UserId,
    command: CreateGroupCommand,
) -> Result<Group, CreateGroupError> {
    let name = validate_group_name(existing, &command.name)?;

    store
        .create_group(name, creator)
        .await
        .map_err(map_source_error)
}

fn map_source_error(error: GroupStoreError) -> CreateGroupError {
    match error {
        GroupStoreError::Conflict => CreateGroupError::Conflict,
        GroupStoreError::Unavailable | GroupStoreError::NotFound => {
            CreateGroupError::TemporarilyUnavailable
        }
        GroupStoreError::InvalidData => CreateGroupError::DataContractViolation,
    }
}
