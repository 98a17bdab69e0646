//! UI layer: line-oriented chat console.

mod event_source;
mod message_rendering;
pub mod shell;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
