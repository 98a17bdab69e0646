use std::path::PathBuf;

use serde::Deserialize;

use crate::infra::config::{
    AppConfig, ChatConfig, IdentityConfig, LogConfig, RoutingMode, StoreBackend, StoreConfig,
};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub identity: Option<FileIdentityConfig>,
    pub chat: Option<FileChatConfig>,
    pub store: Option<FileStoreConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(identity) = self.identity {
            identity.merge_into(&mut config.identity);
        }

        if let Some(chat) = self.chat {
            chat.merge_into(&mut config.chat);
        }

        if let Some(store) = self.store {
            store.merge_into(&mut config.store);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file: Option<bool>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file) = self.file {
            config.file = file;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileIdentityConfig {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo: Option<String>,
}

impl FileIdentityConfig {
    fn merge_into(self, config: &mut IdentityConfig) {
        if let Some(email) = self.email {
            config.email = email;
        }

        if let Some(first_name) = self.first_name {
            config.first_name = first_name;
        }

        if let Some(last_name) = self.last_name {
            config.last_name = last_name;
        }

        if self.photo.is_some() {
            config.photo = self.photo;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileChatConfig {
    pub routing: Option<RoutingMode>,
    pub channel: Option<String>,
    pub channel_prefix: Option<String>,
    pub default_avatar: Option<String>,
    pub avatar_thumbnail_px: Option<u32>,
}

impl FileChatConfig {
    fn merge_into(self, config: &mut ChatConfig) {
        if let Some(routing) = self.routing {
            config.routing = routing;
        }

        if let Some(channel) = self.channel {
            config.channel = channel;
        }

        if let Some(prefix) = self.channel_prefix {
            config.channel_prefix = prefix;
        }

        if let Some(avatar) = self.default_avatar {
            config.default_avatar = avatar;
        }

        if let Some(px) = self.avatar_thumbnail_px {
            config.avatar_thumbnail_px = px;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileStoreConfig {
    pub backend: Option<StoreBackend>,
    pub path: Option<PathBuf>,
}

impl FileStoreConfig {
    fn merge_into(self, config: &mut StoreConfig) {
        if let Some(backend) = self.backend {
            config.backend = backend;
        }

        if self.path.is_some() {
            config.path = self.path;
        }
    }
}
