use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub identity: IdentityConfig,
    pub chat: ChatConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Write logs to a file in the data directory instead of stderr.
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: true,
        }
    }
}

/// The signed-in account. Authentication itself happens elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityConfig {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            first_name: "Guest".to_owned(),
            last_name: "Researcher".to_owned(),
            photo: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    #[default]
    Shared,
    PerGroup,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    pub routing: RoutingMode,
    pub channel: String,
    pub channel_prefix: String,
    pub default_avatar: String,
    pub avatar_thumbnail_px: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            routing: RoutingMode::Shared,
            channel: "chat-demo1".to_owned(),
            channel_prefix: "discovery-chat".to_owned(),
            default_avatar: "/default-avatar.png".to_owned(),
            avatar_thumbnail_px: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Overrides the default `groups.json` location in the data directory.
    pub path: Option<PathBuf>,
}
