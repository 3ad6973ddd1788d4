//! UI layer: table views for one-shot commands and the interactive chat.

pub mod chat_screen;
mod message_rendering;
mod styles;
mod tables;
mod terminal;
pub mod views;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
