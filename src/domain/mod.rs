//! Domain layer: core entities and business rules.

pub mod chat_session_state;
pub mod events;
pub mod group;
pub mod message;
pub mod user;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
