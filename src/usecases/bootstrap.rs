use std::{path::Path, sync::Arc};

use anyhow::anyhow;
use uuid::Uuid;

use crate::{
    domain::user::{SessionIdentity, User, UserId},
    infra::{
        self,
        avatar::ImageThumbnailer,
        config::{AppConfig, ChatConfig, FileConfigAdapter, IdentityConfig, RoutingMode, StoreBackend},
        contracts::ConfigAdapter,
        error::AppError,
        file_store::JsonFileGroupStore,
        local_hub::LocalHub,
        memory_store::InMemoryGroupStore,
        storage_layout::StorageLayout,
    },
    usecases::{
        chat_session::{ChannelRouting, ChatCollaborators, ChatSessionManager, ChatSettings},
        context::AppContext,
        contracts::{GroupStore, UserDirectory},
    },
};

pub async fn bootstrap(
    config_path: Option<&Path>,
    email_override: Option<&str>,
) -> Result<AppContext, AppError> {
    let config = FileConfigAdapter::new(config_path)
        .with_email_override(email_override)
        .load()
        .map_err(AppError::Other)?;

    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;
    let guard = infra::logging::init(&config.logging, &layout)?;

    let context = build_context(config, layout, &LocalHub::new()).await?;
    tracing::info!(
        store = ?context.config.store.backend,
        routing = ?context.config.chat.routing,
        connection_id = %context.session.connection_id(),
        "chat session ready"
    );

    Ok(context.with_log_guard(guard))
}

pub async fn build_context(
    config: AppConfig,
    layout: StorageLayout,
    hub: &LocalHub,
) -> Result<AppContext, AppError> {
    let (store, directory) = build_store(&config, &layout).await?;

    let collaborators = ChatCollaborators {
        store,
        transport: Arc::new(hub.connect()),
        directory,
        thumbnailer: Arc::new(ImageThumbnailer::new()),
    };
    let session = ChatSessionManager::new(
        SessionIdentity::new(config.identity.email.trim()),
        collaborators,
        chat_settings(&config.chat),
    );

    Ok(AppContext::new(config, layout, Arc::new(session)))
}

pub fn chat_settings(config: &ChatConfig) -> ChatSettings {
    let routing = match config.routing {
        RoutingMode::Shared => ChannelRouting::Shared {
            name: config.channel.clone(),
        },
        RoutingMode::PerGroup => ChannelRouting::PerGroup {
            prefix: config.channel_prefix.clone(),
        },
    };

    ChatSettings {
        routing,
        default_avatar: config.default_avatar.clone(),
        avatar_thumbnail_px: config.avatar_thumbnail_px,
    }
}

/// The configured account, or `None` when no email is set.
fn identity_user(identity: &IdentityConfig) -> Option<User> {
    let email = identity.email.trim();
    if email.is_empty() {
        return None;
    }

    Some(User {
        id: UserId::new(Uuid::new_v4().to_string()),
        email: email.to_owned(),
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        photo: identity.photo.clone(),
    })
}

async fn build_store(
    config: &AppConfig,
    layout: &StorageLayout,
) -> Result<(Arc<dyn GroupStore>, Arc<dyn UserDirectory>), AppError> {
    let user = identity_user(&config.identity);
    if user.is_none() {
        tracing::warn!("no identity email configured; group creation and sending are disabled");
    }

    match config.store.backend {
        StoreBackend::Memory => {
            let store = Arc::new(InMemoryGroupStore::new());
            if let Some(user) = user {
                store.register_user(user).await;
            }
            let groups: Arc<dyn GroupStore> = store.clone();
            let directory: Arc<dyn UserDirectory> = store;
            Ok((groups, directory))
        }
        StoreBackend::File => {
            let path = config
                .store
                .path
                .clone()
                .unwrap_or_else(|| layout.groups_file());
            let store = Arc::new(JsonFileGroupStore::new(path));
            if let Some(user) = user {
                store.register_user(user).await.map_err(|error| {
                    AppError::Other(anyhow!(
                        "failed to register identity in group store at {}: {error:?}",
                        store.path().display()
                    ))
                })?;
            }
            let groups: Arc<dyn GroupStore> = store.clone();
            let directory: Arc<dyn UserDirectory> = store;
            Ok((groups, directory))
        }
    }
}
