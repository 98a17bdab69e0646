//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod chat_session;
pub mod context;
pub mod contracts;
pub mod create_group;
pub mod load_groups;
pub mod open_group;
pub mod send_message;
pub mod shell;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
