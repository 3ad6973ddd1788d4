//! Message list rendering for the chat view.
//!
//! - time and sender on the first line of a group, text indented below
//! - consecutive messages from the same side share one header
//! - date separators between messages from different days
//! - unread counterpart messages are flagged

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::domain::message::Message;

use super::styles;

const INDENT: &str = "      ";

/// A visual element of the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageListElement {
    /// Date separator line (e.g., "——— 14 Feb 2026 ———").
    DateSeparator(String),
    Message {
        time: String,
        /// Present on the first message of a sender group.
        sender: Option<String>,
        from_specialist: bool,
        content: String,
        unread: bool,
    },
}

/// Builds the list of visual elements for `messages`, in order.
///
/// Messages without any timestamp stay in the current date group.
pub fn build_message_list_elements(messages: &[Message]) -> Vec<MessageListElement> {
    let mut elements = Vec::new();
    let mut prev_date: Option<NaiveDate> = None;
    let mut prev_sender: Option<bool> = None;

    for message in messages {
        let local = display_time(message);

        if let Some(date) = local.map(|dt| dt.date_naive()) {
            if prev_date != Some(date) {
                elements.push(MessageListElement::DateSeparator(format_date(date)));
                prev_date = Some(date);
                prev_sender = None;
            }
        }

        let show_sender = prev_sender != Some(message.is_from_specialist);

        elements.push(MessageListElement::Message {
            time: local
                .map(|dt| dt.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_owned()),
            sender: show_sender.then(|| message.sender_label().to_owned()),
            from_specialist: message.is_from_specialist,
            content: message.text.clone(),
            unread: !message.is_from_specialist && !message.is_read,
        });

        prev_sender = Some(message.is_from_specialist);
    }

    elements
}

/// Styled terminal lines for one element.
pub fn render_element(element: &MessageListElement) -> Vec<String> {
    match element {
        MessageListElement::DateSeparator(date) => vec![
            String::new(),
            styles::date_separator_style()
                .apply(format!("——— {date} ———"))
                .to_string(),
        ],
        MessageListElement::Message {
            time,
            sender,
            from_specialist,
            content,
            unread,
        } => {
            let time = styles::message_time_style()
                .apply(format!("{time:>5} "))
                .to_string();
            let marker = if *unread {
                styles::unread_count_style().apply(" •").to_string()
            } else {
                String::new()
            };

            let mut lines = Vec::new();
            let mut body = content.lines();

            match sender {
                Some(name) => {
                    let name = styles::sender_style(*from_specialist).apply(format!("{name}:"));
                    lines.push(format!("{time}{name}{marker}"));
                }
                None => {
                    let first = body.next().unwrap_or("[Empty message]");
                    lines.push(format!("{time}{first}{marker}"));
                }
            }

            lines.extend(body.map(|line| format!("{INDENT}{line}")));
            if sender.is_some() && content.is_empty() {
                lines.push(format!(
                    "{INDENT}{}",
                    styles::muted_style().apply("[Empty message]")
                ));
            }

            lines
        }
    }
}

fn display_time(message: &Message) -> Option<DateTime<Local>> {
    message
        .sent_at
        .or(message.created_at)
        .map(|at: DateTime<Utc>| at.with_timezone(&Local))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn msg(id: &str, text: &str, at: Option<DateTime<Utc>>, from_specialist: bool) -> Message {
        Message {
            id: id.to_owned(),
            chat_id: Some("c1".to_owned()),
            text: text.to_owned(),
            sent_at: at,
            is_from_specialist: from_specialist,
            is_read: true,
            created_at: None,
        }
    }

    // Noon UTC keeps the local date stable for every real timezone offset.
    fn feb_14() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0).unwrap()
    }

    fn feb_16() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 16, 12, 0, 0).unwrap()
    }

    fn senders(elements: &[MessageListElement]) -> Vec<Option<String>> {
        elements
            .iter()
            .filter_map(|element| match element {
                MessageListElement::Message { sender, .. } => Some(sender.clone()),
                MessageListElement::DateSeparator(_) => None,
            })
            .collect()
    }

    #[test]
    fn builds_date_separator_for_first_message() {
        let elements = build_message_list_elements(&[msg("1", "Hello", Some(feb_14()), false)]);

        assert_eq!(elements.len(), 2);
        assert!(matches!(&elements[0], MessageListElement::DateSeparator(_)));
    }

    #[test]
    fn groups_consecutive_messages_from_same_side() {
        let elements = build_message_list_elements(&[
            msg("1", "First", Some(feb_14()), false),
            msg("2", "Second", Some(feb_14()), false),
            msg("3", "Reply", Some(feb_14()), true),
        ]);

        assert_eq!(
            senders(&elements),
            vec![Some("Client".to_owned()), None, Some("You".to_owned())]
        );
    }

    #[test]
    fn date_change_inserts_separator_and_resets_grouping() {
        let elements = build_message_list_elements(&[
            msg("1", "Day one", Some(feb_14()), false),
            msg("2", "Day three", Some(feb_16()), false),
        ]);

        let separators = elements
            .iter()
            .filter(|element| matches!(element, MessageListElement::DateSeparator(_)))
            .count();
        assert_eq!(separators, 2);
        assert_eq!(
            senders(&elements),
            vec![Some("Client".to_owned()), Some("Client".to_owned())]
        );
    }

    #[test]
    fn falls_back_to_created_at_and_tolerates_missing_time() {
        let mut realtime = msg("1", "from socket", None, false);
        realtime.created_at = Some(feb_14());
        let untimed = msg("2", "no time", None, true);

        let elements = build_message_list_elements(&[realtime, untimed]);

        assert!(matches!(&elements[0], MessageListElement::DateSeparator(_)));
        assert!(matches!(
            &elements[2],
            MessageListElement::Message { time, .. } if time == "--:--"
        ));
    }

    #[test]
    fn unread_flag_only_marks_counterpart_messages() {
        let mut incoming = msg("1", "hi", Some(feb_14()), false);
        incoming.is_read = false;
        let mut own = msg("2", "hey", Some(feb_14()), true);
        own.is_read = false;

        let elements = build_message_list_elements(&[incoming, own]);
        let unread: Vec<bool> = elements
            .iter()
            .filter_map(|element| match element {
                MessageListElement::Message { unread, .. } => Some(*unread),
                MessageListElement::DateSeparator(_) => None,
            })
            .collect();

        assert_eq!(unread, vec![true, false]);
    }

    #[test]
    fn renders_multiline_content_with_indent() {
        let element = MessageListElement::Message {
            time: "10:00".to_owned(),
            sender: Some("Client".to_owned()),
            from_specialist: false,
            content: "line one\nline two".to_owned(),
            unread: false,
        };

        let lines = render_element(&element);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Client:"));
        assert_eq!(lines[1], format!("{INDENT}line one"));
        assert_eq!(lines[2], format!("{INDENT}line two"));
    }

    #[test]
    fn grouped_message_shares_line_with_time() {
        let element = MessageListElement::Message {
            time: "10:01".to_owned(),
            sender: None,
            from_specialist: true,
            content: "ok".to_owned(),
            unread: false,
        };

        let lines = render_element(&element);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("10:01"));
        assert!(lines[0].ends_with("ok"));
    }
}
