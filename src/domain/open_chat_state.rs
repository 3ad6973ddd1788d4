use super::{chat::Chat, message::Message, status::ConnectionStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenChatUiState {
    Empty,
    Loading,
    Ready,
    Error,
}

/// Result of folding one message into the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Appended,
    Replaced { index: usize },
}

/// How the pending send is expected to complete.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingSend {
    /// Waiting for the realtime echo of a CREATE with this sender flag.
    Realtime { from_specialist: bool, text: String },
    /// Waiting for a REST response.
    Rest,
}

/// Presentation state of one open chat.
///
/// All mutation goes through this type, and it keeps one invariant: no two
/// entries in `messages` share an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenChatState {
    chat_id: Option<String>,
    chat: Option<Chat>,
    messages: Vec<Message>,
    ui_state: OpenChatUiState,
    connection: ConnectionStatus,
    pending_send: Option<PendingSend>,
    error: Option<String>,
}

impl Default for OpenChatState {
    fn default() -> Self {
        Self {
            chat_id: None,
            chat: None,
            messages: Vec::new(),
            ui_state: OpenChatUiState::Empty,
            connection: ConnectionStatus::Disconnected,
            pending_send: None,
            error: None,
        }
    }
}

impl OpenChatState {
    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    pub fn chat(&self) -> Option<&Chat> {
        self.chat.as_ref()
    }

    pub fn chat_title(&self) -> &str {
        match (&self.chat, &self.chat_id) {
            (Some(chat), _) => chat.display_title(),
            (None, Some(chat_id)) => chat_id,
            (None, None) => "",
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn ui_state(&self) -> OpenChatUiState {
        self.ui_state.clone()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn is_sending(&self) -> bool {
        self.pending_send.is_some()
    }

    /// User-facing text of the last failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Counterpart messages the specialist has not read yet.
    pub fn unread_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|message| !message.is_from_specialist && !message.is_read)
            .count()
    }

    pub fn is_open(&self) -> bool {
        self.chat_id.is_some()
    }

    pub fn set_loading(&mut self, chat_id: impl Into<String>) {
        self.chat_id = Some(chat_id.into());
        self.chat = None;
        self.messages.clear();
        self.ui_state = OpenChatUiState::Loading;
        self.pending_send = None;
        self.error = None;
    }

    /// Replaces the whole list with the REST history.
    ///
    /// Duplicates inside the history itself are folded through the same merge
    /// rule as realtime arrivals, so the list invariant holds from the start.
    pub fn set_ready(&mut self, chat: Chat, history: Vec<Message>) {
        self.chat = Some(chat);
        self.messages.clear();
        for message in history {
            self.merge(message);
        }
        self.ui_state = OpenChatUiState::Ready;
        self.error = None;
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.ui_state = OpenChatUiState::Error;
        self.error = Some(text.into());
    }

    /// Records a non-fatal failure (e.g. a failed send) without leaving `Ready`.
    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.error = Some(text.into());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_connection_status(&mut self, status: ConnectionStatus) {
        self.connection = status;

        // The echo can no longer arrive.
        if status == ConnectionStatus::Disconnected
            && matches!(self.pending_send, Some(PendingSend::Realtime { .. }))
        {
            self.pending_send = None;
        }
    }

    pub fn begin_realtime_send(&mut self, from_specialist: bool, text: impl Into<String>) {
        self.pending_send = Some(PendingSend::Realtime {
            from_specialist,
            text: text.into(),
        });
        self.error = None;
    }

    /// Ends a realtime send that was never echoed and returns its text.
    pub fn take_unconfirmed_send(&mut self) -> Option<String> {
        match self.pending_send.take() {
            Some(PendingSend::Realtime { text, .. }) => Some(text),
            other => {
                self.pending_send = other;
                None
            }
        }
    }

    pub fn begin_rest_send(&mut self) {
        self.pending_send = Some(PendingSend::Rest);
        self.error = None;
    }

    pub fn finish_send(&mut self) {
        self.pending_send = None;
    }

    /// Folds a realtime arrival into the list.
    ///
    /// Unknown ids are appended (arrivals are the newest messages); known ids are
    /// replaced in place, which is how read-flag updates are delivered. A newly
    /// appended message matching a pending realtime send is its echo and ends
    /// the send.
    pub fn merge_incoming(&mut self, message: Message) -> MergeOutcome {
        let from_specialist = message.is_from_specialist;
        let outcome = self.merge(message);

        if outcome == MergeOutcome::Appended
            && matches!(
                self.pending_send,
                Some(PendingSend::Realtime { from_specialist: pending, .. }) if pending == from_specialist
            )
        {
            self.pending_send = None;
        }

        outcome
    }

    fn merge(&mut self, message: Message) -> MergeOutcome {
        match self
            .messages
            .iter()
            .position(|existing| existing.id == message.id)
        {
            Some(index) => {
                self.messages[index] = message;
                MergeOutcome::Replaced { index }
            }
            None => {
                self.messages.push(message);
                MergeOutcome::Appended
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn message(id: &str, text: &str, from_specialist: bool, is_read: bool) -> Message {
        Message {
            id: id.to_owned(),
            chat_id: Some("c1".to_owned()),
            text: text.to_owned(),
            sent_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()),
            is_from_specialist: from_specialist,
            is_read,
            created_at: None,
        }
    }

    fn ready_state(history: Vec<Message>) -> OpenChatState {
        let mut state = OpenChatState::default();
        state.set_loading("c1");
        state.set_ready(Chat::placeholder("c1"), history);
        state
    }

    fn ids(state: &OpenChatState) -> Vec<&str> {
        state.messages().iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn default_state_is_empty() {
        let state = OpenChatState::default();

        assert_eq!(state.ui_state(), OpenChatUiState::Empty);
        assert!(!state.is_open());
        assert!(state.messages().is_empty());
        assert_eq!(state.connection_status(), ConnectionStatus::Disconnected);
        assert!(!state.is_sending());
    }

    #[test]
    fn set_loading_clears_previous_chat() {
        let mut state = ready_state(vec![message("m1", "hi", false, false)]);

        state.set_loading("c2");

        assert_eq!(state.chat_id(), Some("c2"));
        assert_eq!(state.chat_title(), "c2");
        assert_eq!(state.ui_state(), OpenChatUiState::Loading);
        assert!(state.messages().is_empty());
    }

    #[test]
    fn set_ready_replaces_whole_list() {
        let mut state = ready_state(vec![message("old", "x", false, true)]);

        state.set_ready(
            Chat::placeholder("c1"),
            vec![message("m1", "a", false, true), message("m2", "b", true, true)],
        );

        assert_eq!(ids(&state), vec!["m1", "m2"]);
        assert_eq!(state.ui_state(), OpenChatUiState::Ready);
    }

    #[test]
    fn set_ready_folds_duplicate_history_entries() {
        let state = ready_state(vec![
            message("m1", "first", false, false),
            message("m1", "second", false, true),
        ]);

        assert_eq!(ids(&state), vec!["m1"]);
        assert_eq!(state.messages()[0].text, "second");
    }

    #[test]
    fn new_identifier_is_appended_at_end() {
        let mut state = ready_state(vec![message("m1", "hi", false, false)]);

        let outcome = state.merge_incoming(message("m2", "hello back", true, false));

        assert_eq!(outcome, MergeOutcome::Appended);
        assert_eq!(ids(&state), vec!["m1", "m2"]);
    }

    #[test]
    fn known_identifier_is_replaced_in_place() {
        let mut state = ready_state(vec![
            message("A", "a", false, false),
            message("B", "b", false, false),
            message("C", "c", false, false),
        ]);

        let outcome = state.merge_incoming(message("B", "b", false, true));

        assert_eq!(outcome, MergeOutcome::Replaced { index: 1 });
        assert_eq!(ids(&state), vec!["A", "B", "C"]);
        assert!(state.messages()[1].is_read);
        assert_eq!(state.messages().len(), 3);
    }

    #[test]
    fn arbitrary_arrival_sequences_never_duplicate_ids() {
        let mut state = ready_state(vec![message("m1", "a", false, false)]);
        let arrivals = ["m2", "m1", "m3", "m2", "m2", "m4", "m1", "m3"];

        for (step, id) in arrivals.iter().enumerate() {
            state.merge_incoming(message(id, &format!("v{step}"), step % 2 == 0, false));

            let unique: HashSet<&str> = ids(&state).into_iter().collect();
            assert_eq!(unique.len(), state.messages().len());
        }

        assert_eq!(ids(&state), vec!["m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn realtime_echo_clears_sending_flag() {
        let mut state = ready_state(vec![message("m1", "hi", false, false)]);
        state.begin_realtime_send(true, "mine");

        state.merge_incoming(message("m1", "hi", false, true));
        assert!(state.is_sending(), "replacement is not the echo");

        state.merge_incoming(message("m2", "counterpart", false, false));
        assert!(state.is_sending(), "counterpart message is not the echo");

        state.merge_incoming(message("m3", "mine", true, false));
        assert!(!state.is_sending());
    }

    #[test]
    fn disconnect_abandons_pending_realtime_send() {
        let mut state = ready_state(vec![]);
        state.set_connection_status(ConnectionStatus::Connected);
        state.begin_realtime_send(true, "on my way");

        state.set_connection_status(ConnectionStatus::Disconnected);

        assert!(!state.is_sending());
    }

    #[test]
    fn unconfirmed_realtime_send_hands_back_its_text() {
        let mut state = ready_state(vec![]);
        state.begin_realtime_send(true, "on my way");

        assert_eq!(state.take_unconfirmed_send().as_deref(), Some("on my way"));
        assert!(!state.is_sending());
        assert_eq!(state.take_unconfirmed_send(), None);
    }

    #[test]
    fn rest_send_is_not_unconfirmed() {
        let mut state = ready_state(vec![]);
        state.begin_rest_send();

        assert_eq!(state.take_unconfirmed_send(), None);
        assert!(state.is_sending());
    }

    #[test]
    fn disconnect_keeps_pending_rest_send() {
        let mut state = ready_state(vec![]);
        state.begin_rest_send();

        state.set_connection_status(ConnectionStatus::Disconnected);

        assert!(state.is_sending());
        state.finish_send();
        assert!(!state.is_sending());
    }

    #[test]
    fn unread_count_only_counts_counterpart_messages() {
        let state = ready_state(vec![
            message("m1", "a", false, false),
            message("m2", "b", true, false),
            message("m3", "c", false, true),
        ]);

        assert_eq!(state.unread_count(), 1);
    }

    #[test]
    fn set_error_keeps_text_for_display() {
        let mut state = OpenChatState::default();
        state.set_loading("c1");

        state.set_error("Chat not found");

        assert_eq!(state.ui_state(), OpenChatUiState::Error);
        assert_eq!(state.error(), Some("Chat not found"));
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut state = ready_state(vec![message("m1", "a", false, false)]);
        state.set_connection_status(ConnectionStatus::Connected);

        state.clear();

        assert_eq!(state, OpenChatState::default());
    }
}
