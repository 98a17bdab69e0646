use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::infra::{
    config::{load, AppConfig},
    contracts::ConfigAdapter,
};

/// Loads `config.toml` and applies command-line overrides on top.
#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
    email_override: Option<String>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            email_override: None,
        }
    }

    pub fn with_email_override(mut self, email: Option<&str>) -> Self {
        self.email_override = email.map(str::to_owned);
        self
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        let mut config = load(self.path.as_deref())?;

        if let Some(email) = &self.email_override {
            config.identity.email = email.clone();
        }

        Ok(config)
    }
}
