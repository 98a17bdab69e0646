use std::{
    fs::{self, File, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::Utc;
use fs2::FileExt;

use crate::{
    domain::{
        group::{Group, GroupId},
        message::PersistedMessage,
        user::{User, UserId},
    },
    infra::{error::AppError, group_document::GroupDocument},
    usecases::contracts::{GroupStore, GroupStoreError, UserDirectory, UserLookupError},
};

const FILE_STORE_ACCESS_FAILED: &str = "FILE_STORE_ACCESS_FAILED";

/// Group store persisted as one JSON document.
///
/// Every operation takes an advisory lock on a sidecar `.lock` file, so
/// several local clients can share the same document.
#[derive(Debug, Clone)]
pub struct JsonFileGroupStore {
    path: PathBuf,
}

impl JsonFileGroupStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn register_user(&self, user: User) -> Result<User, GroupStoreError> {
        self.update(move |document| Ok(document.upsert_user(user)))
            .await
    }

    async fn read<T, F>(&self, op: F) -> Result<T, GroupStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&GroupDocument) -> Result<T, GroupStoreError> + Send + 'static,
    {
        let path = self.path.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let _lock = acquire_lock(&path, false)?;
            let document = read_document(&path)?;
            Ok::<_, AppError>(op(&document))
        })
        .await;

        flatten(outcome)
    }

    async fn update<T, F>(&self, op: F) -> Result<T, GroupStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut GroupDocument) -> Result<T, GroupStoreError> + Send + 'static,
    {
        let path = self.path.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let _lock = acquire_lock(&path, true)?;
            let mut document = read_document(&path)?;
            let result = op(&mut document);
            if result.is_ok() {
                write_document(&path, &document)?;
            }
            Ok::<_, AppError>(result)
        })
        .await;

        flatten(outcome)
    }
}

fn flatten<T>(
    outcome: Result<Result<Result<T, GroupStoreError>, AppError>, tokio::task::JoinError>,
) -> Result<T, GroupStoreError> {
    match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(error)) => {
            tracing::error!(code = FILE_STORE_ACCESS_FAILED, error = %error, "group store access failed");
            Err(match error {
                AppError::StoreDecode { .. } => GroupStoreError::InvalidData,
                _ => GroupStoreError::Unavailable,
            })
        }
        Err(error) => {
            tracing::error!(code = FILE_STORE_ACCESS_FAILED, error = %error, "group store worker failed");
            Err(GroupStoreError::Unavailable)
        }
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn acquire_lock(path: &Path, exclusive: bool) -> Result<File, AppError> {
    let lock_path = lock_path(path);
    let io_error = |source| AppError::StoreIo {
        path: lock_path.clone(),
        source,
    };

    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&lock_path)
        .map_err(io_error)?;

    let locked = if exclusive {
        FileExt::lock_exclusive(&file)
    } else {
        FileExt::lock_shared(&file)
    };
    locked.map_err(io_error)?;

    Ok(file)
}

fn read_document(path: &Path) -> Result<GroupDocument, AppError> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(GroupDocument::default()),
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| AppError::StoreDecode {
            path: path.to_path_buf(),
            source,
        }),
        Err(source) if source.kind() == ErrorKind::NotFound => Ok(GroupDocument::default()),
        Err(source) => Err(AppError::StoreIo {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_document(path: &Path, document: &GroupDocument) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(document).map_err(|source| AppError::StoreDecode {
        path: path.to_path_buf(),
        source,
    })?;

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, bytes).map_err(|source| AppError::StoreIo {
        path: staging.clone(),
        source,
    })?;
    fs::rename(&staging, path).map_err(|source| AppError::StoreIo {
        path: path.to_path_buf(),
        source,
    })
}

#[async_trait]
impl GroupStore for JsonFileGroupStore {
    async fn list_groups(&self) -> Result<Vec<Group>, GroupStoreError> {
        self.read(|document| Ok(document.groups())).await
    }

    async fn create_group(&self, name: &str, creator: &UserId) -> Result<Group, GroupStoreError> {
        let name = name.to_owned();
        let creator = creator.clone();
        self.update(move |document| document.create_group(&name, &creator))
            .await
    }

    async fn group_messages(
        &self,
        group_id: &GroupId,
    ) -> Result<Vec<PersistedMessage>, GroupStoreError> {
        let group_id = group_id.clone();
        self.read(move |document| document.group_messages(&group_id))
            .await
    }

    async fn append_message(
        &self,
        group_id: &GroupId,
        sender: &UserId,
        text: &str,
    ) -> Result<(), GroupStoreError> {
        let group_id = group_id.clone();
        let sender = sender.clone();
        let text = text.to_owned();
        let timestamp = Utc::now();
        self.update(move |document| document.append_message(&group_id, &sender, &text, timestamp))
            .await
    }
}

#[async_trait]
impl UserDirectory for JsonFileGroupStore {
    async fn user_by_email(&self, email: &str) -> Result<User, UserLookupError> {
        let email = email.to_owned();
        match self.read(move |document| Ok(document.user_by_email(&email))).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(UserLookupError::NotFound),
            Err(_) => Err(UserLookupError::Unavailable),
        }
    }
}
