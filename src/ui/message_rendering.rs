//! Message list rendering logic.
//!
//! Handles visual formatting of messages including:
//! - Sender grouping (consecutive messages from same sender show name only once)
//! - Date separators between messages from different days
//! - Own messages marked and right-aligned

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::domain::{group::Group, message::Message};

pub const CONSOLE_WIDTH: usize = 72;
const OWN_SENDER_LABEL: &str = "You";

/// Represents a visual element in the messages list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageListElement {
    /// Date separator line (e.g., "——— 14 Feb 2026 ———").
    DateSeparator(String),
    /// A message with optional sender display.
    Message {
        time: String,
        sender: Option<String>,
        content: String,
        mine: bool,
    },
}

/// Incremental list builder, so live messages group with what is already
/// on screen.
#[derive(Debug, Default)]
pub struct MessageListBuilder {
    prev_date: Option<NaiveDate>,
    prev_sender: Option<String>,
}

impl MessageListBuilder {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn push(&mut self, message: &Message, mine: bool) -> Vec<MessageListElement> {
        let mut elements = Vec::new();
        let local = to_local(message.timestamp);
        let msg_date = local.date_naive();

        if self.prev_date != Some(msg_date) {
            elements.push(MessageListElement::DateSeparator(format_date(msg_date)));
            self.prev_sender = None;
        }

        // Sender ids distinguish two people with the same display name.
        let sender_key = if mine {
            OWN_SENDER_LABEL.to_owned()
        } else {
            message.sender_id.to_string()
        };
        let sender = (self.prev_sender.as_deref() != Some(sender_key.as_str())).then(|| {
            if mine {
                OWN_SENDER_LABEL.to_owned()
            } else {
                message.sender_name.clone()
            }
        });

        elements.push(MessageListElement::Message {
            time: local.format("%H:%M").to_string(),
            sender,
            content: message.text.clone(),
            mine,
        });

        self.prev_date = Some(msg_date);
        self.prev_sender = Some(sender_key);
        elements
    }
}

/// Renders one element as console lines.
pub fn element_lines(element: &MessageListElement, width: usize) -> Vec<String> {
    match element {
        MessageListElement::DateSeparator(date) => {
            vec![String::new(), center(&format!("——— {date} ———"), width)]
        }
        MessageListElement::Message {
            time,
            sender,
            content,
            mine,
        } => message_lines(time, sender.as_deref(), content, *mine, width),
    }
}

fn message_lines(
    time: &str,
    sender: Option<&str>,
    content: &str,
    mine: bool,
    width: usize,
) -> Vec<String> {
    let indent = "      "; // 6 spaces to align with time column
    let mut lines = Vec::new();

    if let Some(name) = sender {
        lines.push(format!("{time:>5} {name}:"));
        lines.extend(content.lines().map(|line| format!("{indent}{line}")));
    } else {
        let mut content_lines = content.lines();
        let first = content_lines.next().unwrap_or_default();
        lines.push(format!("{time:>5} {first}"));
        lines.extend(content_lines.map(|line| format!("{indent}{line}")));
    }

    if mine {
        lines.iter().map(|line| right_align(line, width)).collect()
    } else {
        lines
    }
}

/// One line per group, e.g. `Kinase screen (3 members)`.
pub fn group_list_lines(groups: &[Group], current: Option<&Group>) -> Vec<String> {
    if groups.is_empty() {
        return vec!["No groups yet. Create one with /create <name>.".to_owned()];
    }

    groups
        .iter()
        .map(|group| {
            let marker = if current.is_some_and(|open| open.id == group.id) {
                '*'
            } else {
                ' '
            };
            format!("{marker} {}", group_label(group))
        })
        .collect()
}

pub fn group_label(group: &Group) -> String {
    format!("{} ({} members)", group.name, group.member_count())
}

fn to_local(timestamp: DateTime<Utc>) -> DateTime<Local> {
    timestamp.with_timezone(&Local)
}

fn format_date(date: NaiveDate) -> String {
    // Format: "14 Feb 2026"
    date.format("%-d %b %Y").to_string()
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_owned();
    }
    format!("{}{text}", " ".repeat((width - len) / 2))
}

fn right_align(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_owned();
    }
    format!("{}{text}", " ".repeat(width - len))
}
