//! Style definitions for terminal output.

use crossterm::style::{Attribute, Color, ContentStyle};

use crate::domain::status::ConnectionStatus;

fn fg(color: Color) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        ..ContentStyle::default()
    }
}

fn bold(color: Color) -> ContentStyle {
    let mut style = fg(color);
    style.attributes.set(Attribute::Bold);
    style
}

// =============================================================================
// Tables
// =============================================================================

pub fn header_style() -> ContentStyle {
    bold(Color::White)
}

pub fn muted_style() -> ContentStyle {
    fg(Color::DarkGrey)
}

pub fn unread_count_style() -> ContentStyle {
    fg(Color::Green)
}

pub fn error_style() -> ContentStyle {
    fg(Color::Red)
}

// =============================================================================
// Chat view
// =============================================================================

pub fn chat_title_style() -> ContentStyle {
    bold(Color::White)
}

/// Own messages and the counterpart's are told apart by color.
pub fn sender_style(from_specialist: bool) -> ContentStyle {
    if from_specialist {
        bold(Color::Cyan)
    } else {
        bold(Color::Yellow)
    }
}

pub fn message_time_style() -> ContentStyle {
    fg(Color::DarkGrey)
}

pub fn date_separator_style() -> ContentStyle {
    fg(Color::DarkGrey)
}

pub fn connection_style(status: ConnectionStatus) -> ContentStyle {
    match status {
        ConnectionStatus::Connected => fg(Color::Green),
        ConnectionStatus::Connecting => fg(Color::Yellow),
        ConnectionStatus::Disconnected => fg(Color::DarkGrey),
    }
}
