use std::{env, fs, path::PathBuf};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "discovery-chat";
const DATA_DIR_ENV: &str = "DISCOVERY_CHAT_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl StorageLayout {
    pub fn resolve() -> Result<Self, AppError> {
        let data_dir = env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|base| base.join(APP_DIR_NAME)))
            .ok_or_else(|| AppError::StoragePathResolution {
                details: format!("unable to resolve data directory ({DATA_DIR_ENV}/XDG_DATA_HOME)"),
            })?;

        let log_dir = data_dir.join("logs");

        Ok(Self { data_dir, log_dir })
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.data_dir, &self.log_dir] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }

    pub fn groups_file(&self) -> PathBuf {
        self.data_dir.join("groups.json")
    }

    pub fn log_file_name(&self) -> &'static str {
        "discovery-chat.log"
    }
}
