use std::sync::Arc;

use tracing_appender::non_blocking::WorkerGuard;

use crate::infra::{config::AppConfig, storage_layout::StorageLayout};

use super::chat_session::ChatSessionManager;

pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub session: Arc<ChatSessionManager>,
    /// Flushes the log file when the context is dropped.
    log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(config: AppConfig, layout: StorageLayout, session: Arc<ChatSessionManager>) -> Self {
        Self {
            config,
            layout,
            session,
            log_guard: None,
        }
    }

    pub fn with_log_guard(mut self, guard: Option<WorkerGuard>) -> Self {
        self.log_guard = guard;
        self
    }

    pub fn has_log_file(&self) -> bool {
        self.log_guard.is_some()
    }
}
