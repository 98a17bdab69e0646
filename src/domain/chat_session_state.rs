use chrono::{DateTime, Utc};

use super::{
    group::{Group, GroupId},
    message::Message,
    user::UserId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenGroupUiState {
    Empty,
    Loading,
    Ready,
    Error,
}

/// Handle for one history fetch. Only the most recently issued ticket may
/// replace the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    group_id: GroupId,
    generation: u64,
}

impl HistoryTicket {
    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSessionState {
    groups: Vec<Group>,
    current_group: Option<Group>,
    messages: Vec<Message>,
    draft_text: String,
    ui_state: OpenGroupUiState,
    generation: u64,
    /// Live messages accepted while history is still loading.
    pending_live: Vec<Message>,
    /// When the live feed for the open group started listening.
    live_since: Option<DateTime<Utc>>,
    /// History entries written after `live_since`, by sender, text and
    /// storage time. Their live copies are already on screen.
    history_echoes: Vec<(UserId, String, DateTime<Utc>)>,
}

impl Default for ChatSessionState {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            current_group: None,
            messages: Vec::new(),
            draft_text: String::new(),
            ui_state: OpenGroupUiState::Empty,
            generation: 0,
            pending_live: Vec::new(),
            live_since: None,
            history_echoes: Vec::new(),
        }
    }
}

impl ChatSessionState {
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn current_group(&self) -> Option<&Group> {
        self.current_group.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    pub fn ui_state(&self) -> OpenGroupUiState {
        self.ui_state
    }

    pub fn find_group(&self, group_id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| &group.id == group_id)
    }

    pub fn find_group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.has_name(name))
    }

    pub fn set_groups(&mut self, groups: Vec<Group>) {
        self.groups = groups;
    }

    /// Appends a freshly created group and makes it the open one.
    ///
    /// Any history fetch still in flight becomes stale.
    pub fn add_created_group(&mut self, group: Group) {
        self.generation += 1;
        self.groups.push(group.clone());
        self.current_group = Some(group);
        self.messages.clear();
        self.reset_live_tracking(None);
        self.ui_state = OpenGroupUiState::Ready;
    }

    /// Starts opening `group`. `live_since` is the moment the live feed for
    /// the group began listening; history written after it also arrives live.
    pub fn begin_open(&mut self, group: Group, live_since: DateTime<Utc>) -> HistoryTicket {
        self.generation += 1;
        let ticket = HistoryTicket {
            group_id: group.id.clone(),
            generation: self.generation,
        };

        self.current_group = Some(group);
        self.messages.clear();
        self.reset_live_tracking(Some(live_since));
        self.ui_state = OpenGroupUiState::Loading;
        ticket
    }

    /// Replaces the message list with fetched history followed by the live
    /// messages that arrived during the fetch. Returns `false` and leaves
    /// state untouched when a newer open has superseded the ticket.
    pub fn apply_history(&mut self, ticket: &HistoryTicket, messages: Vec<Message>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.history_echoes = match self.live_since {
            Some(since) => messages
                .iter()
                .filter(|message| message.connection_id.is_none() && message.timestamp >= since)
                .map(|message| {
                    (
                        message.sender_id.clone(),
                        message.text.clone(),
                        message.timestamp,
                    )
                })
                .collect(),
            None => Vec::new(),
        };
        self.messages = messages;

        for message in std::mem::take(&mut self.pending_live) {
            if !self.take_history_echo(&message) {
                self.messages.push(message);
            }
        }
        self.ui_state = OpenGroupUiState::Ready;
        true
    }

    /// Marks the history fetch as failed. Live messages that arrived during
    /// the fetch stay listed.
    pub fn fail_history(&mut self, ticket: &HistoryTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.messages = std::mem::take(&mut self.pending_live);
        self.history_echoes.clear();
        self.ui_state = OpenGroupUiState::Error;
        true
    }

    /// Takes a live message for the open group.
    ///
    /// While history is loading the message is held and listed after the
    /// history once it arrives. Returns `false` for other groups and for
    /// messages the fetched history already contains.
    pub fn accept_live(&mut self, message: Message) -> bool {
        let belongs = self
            .current_group
            .as_ref()
            .is_some_and(|group| group.id == message.group_id);
        if !belongs {
            return false;
        }

        if self.ui_state == OpenGroupUiState::Loading {
            self.pending_live.push(message);
            return true;
        }
        if self.take_history_echo(&message) {
            return false;
        }

        self.messages.push(message);
        true
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
    }

    pub fn clear_draft(&mut self) {
        self.draft_text.clear();
    }

    fn reset_live_tracking(&mut self, live_since: Option<DateTime<Utc>>) {
        self.pending_live.clear();
        self.history_echoes.clear();
        self.live_since = live_since;
    }

    /// A live copy is stamped by its sender before it is stored, so it is
    /// never newer than the history entry it duplicates.
    fn take_history_echo(&mut self, message: &Message) -> bool {
        let position = self.history_echoes.iter().position(|(sender, text, stored_at)| {
            *sender == message.sender_id && *text == message.text && message.timestamp <= *stored_at
        });

        match position {
            Some(index) => {
                self.history_echoes.swap_remove(index);
                true
            }
            None => false,
        }
    }

    fn is_current(&self, ticket: &HistoryTicket) -> bool {
        ticket.generation == self.generation
            && self
                .current_group
                .as_ref()
                .is_some_and(|group| group.id == ticket.group_id)
    }
}
