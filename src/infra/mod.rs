//! Infrastructure layer: adapters for config, logging, storage and the
//! reference chat collaborators.

pub mod avatar;
pub mod config;
pub mod contracts;
pub mod error;
pub mod file_store;
pub mod group_document;
pub mod local_hub;
pub mod logging;
pub mod memory_store;
pub mod storage_layout;

/// Returns the infra module name for smoke checks.
pub fn module_name() -> &'static str {
    "infra"
}
