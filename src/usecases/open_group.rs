use crate::domain::{
    group::GroupId,
    message::{Message, PersistedMessage},
};

use super::contracts::{GroupStore, GroupStoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenGroupOutcome {
    /// History was applied to the open group.
    Applied,
    /// Another open started meanwhile; the fetched history was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenGroupError {
    /// The id is not among the loaded groups.
    UnknownGroup,
    GroupNotFound,
    TemporarilyUnavailable,
    DataContractViolation,
}

impl OpenGroupError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnknownGroup | Self::GroupNotFound => "That group does not exist.",
            Self::TemporarilyUnavailable => "Message history is temporarily unavailable.",
            Self::DataContractViolation => "Message history could not be read.",
        }
    }
}

/// Fetches the whole history of a group and normalizes it to the display
/// shape, preserving store order.
pub async fn load_history(
    store: &dyn GroupStore,
    group_id: &GroupId,
    default_avatar: &str,
) -> Result<Vec<Message>, OpenGroupError> {
    let persisted = store
        .group_messages(group_id)
        .await
        .map_err(map_source_error)?;

    Ok(normalize_history(group_id, persisted, default_avatar))
}

pub fn normalize_history(
    group_id: &GroupId,
    persisted: Vec<PersistedMessage>,
    default_avatar: &str,
) -> Vec<Message> {
    persisted
        .into_iter()
        .map(|message| Message::from_persisted(group_id, message, default_avatar))
        .collect()
}

fn map_source_error(error: GroupStoreError) -> OpenGroupError {
    match error {
        GroupStoreError::NotFound => OpenGroupError::GroupNotFound,
        GroupStoreError::Unavailable | GroupStoreError::Conflict => {
            OpenGroupError::TemporarilyUnavailable
        }
        GroupStoreError::InvalidData => OpenGroupError::DataContractViolation,
    }
}
