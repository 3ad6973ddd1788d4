//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod list_chats;
pub mod load_messages;
pub mod login;
pub mod logout;
pub mod mark_read;
pub mod open_chat;
pub mod projects;
pub mod realtime;
pub mod send_message;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
