//! Domain layer: core entities and per-screen state containers.

pub mod chat;
pub mod events;
pub mod list_state;
pub mod message;
pub mod open_chat_state;
pub mod project;
pub mod session;
pub mod status;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
