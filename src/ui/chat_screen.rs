//! Interactive chat view: redraws the open chat on every state change and
//! turns typed lines into intents.

use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::{
    domain::open_chat_state::{OpenChatState, OpenChatUiState},
    usecases::{
        open_chat::{run_chat_screen, ChatBackend, ChatIntent, ChatScreen},
        realtime::RealtimeChannel,
    },
};

use super::{
    message_rendering::{build_message_list_elements, render_element},
    styles,
    tables::truncate,
    terminal::TerminalSession,
};

const HELP_LINE: &str = "Type a message and press Enter · /read <message-id> · /quit";

/// Opens `chat_id` and runs the view until the user quits or stdin closes.
pub async fn run<B, R>(screen: &mut ChatScreen<B, R>, chat_id: &str) -> Result<()>
where
    B: ChatBackend,
    R: RealtimeChannel,
{
    let Some(feed) = screen.enter(chat_id).await else {
        let reason = screen
            .state()
            .error()
            .unwrap_or("Could not open the chat.")
            .to_owned();
        anyhow::bail!(reason);
    };

    let mut terminal = TerminalSession::new()?;
    terminal.draw(&chat_frame(screen.state(), TerminalSession::width()))?;

    let (intents_tx, intents_rx) = mpsc::unbounded_channel();
    tokio::spawn(read_intents(intents_tx));

    run_chat_screen(screen, feed, intents_rx, |state| {
        if let Err(error) = terminal.draw(&chat_frame(state, TerminalSession::width())) {
            tracing::warn!(error = %error, "chat redraw failed");
        }
    })
    .await;

    Ok(())
}

async fn read_intents(intents: mpsc::UnboundedSender<ChatIntent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let intent = match lines.next_line().await {
            Ok(Some(line)) => match parse_intent(&line) {
                Some(intent) => intent,
                None => continue,
            },
            Ok(None) => ChatIntent::Leave,
            Err(error) => {
                tracing::warn!(error = %error, "stdin read failed");
                ChatIntent::Leave
            }
        };

        let leaving = intent == ChatIntent::Leave;
        if intents.send(intent).is_err() || leaving {
            return;
        }
    }
}

/// Maps one typed line to an intent. Blank lines are ignored.
pub fn parse_intent(line: &str) -> Option<ChatIntent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line == "/quit" || line == "/q" {
        return Some(ChatIntent::Leave);
    }

    if let Some(rest) = line.strip_prefix("/read ") {
        let id = rest.trim();
        if !id.is_empty() {
            return Some(ChatIntent::MarkRead(id.to_owned()));
        }
    }

    Some(ChatIntent::Send(line.to_owned()))
}

/// Full-screen text for the open chat.
pub fn chat_frame(state: &OpenChatState, width: usize) -> Vec<String> {
    let status = state.connection_status();
    let unread = state.unread_count();

    let mut header = format!(
        "{}  {}",
        styles::chat_title_style().apply(truncate(state.chat_title(), width.saturating_sub(20))),
        styles::connection_style(status).apply(format!("[{}]", status.as_label())),
    );
    if unread > 0 {
        header.push_str(&format!(
            "  {}",
            styles::unread_count_style().apply(format!("{unread} unread"))
        ));
    }

    let mut lines = vec![header, "─".repeat(width.min(80))];

    match state.ui_state() {
        OpenChatUiState::Loading => {
            lines.push(styles::muted_style().apply("Loading messages…").to_string());
        }
        OpenChatUiState::Empty => {}
        OpenChatUiState::Error | OpenChatUiState::Ready if state.messages().is_empty() => {
            lines.push(styles::muted_style().apply("No messages yet.").to_string());
        }
        OpenChatUiState::Error | OpenChatUiState::Ready => {
            for element in build_message_list_elements(state.messages()) {
                lines.extend(render_element(&element));
            }
        }
    }

    lines.push("─".repeat(width.min(80)));
    if let Some(error) = state.error() {
        lines.push(styles::error_style().apply(error).to_string());
    }
    if state.is_sending() {
        lines.push(styles::muted_style().apply("Sending…").to_string());
    }
    lines.push(styles::muted_style().apply(HELP_LINE).to_string());

    lines
}
