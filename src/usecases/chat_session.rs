//! Group chat session: group discovery, creation, history loading, live
//! message ingestion and sending for a single chat view.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::domain::{
    chat_session_state::{ChatSessionState, OpenGroupUiState},
    group::{Group, GroupId},
    message::{ConnectionId, Message},
    user::{SessionIdentity, User},
};

use super::{
    contracts::{AvatarThumbnailer, GroupStore, MessageTransport, UserDirectory},
    create_group::{create_group, validate_group_name, CreateGroupCommand, CreateGroupError},
    load_groups::{load_groups, resolve_user, LoadGroupsError},
    open_group::{load_history, OpenGroupError, OpenGroupOutcome},
    send_message::{
        send_message, OutgoingSender, SendMessageCommand, SendMessageError, SendOutcome, SendPorts,
    },
};

const LOAD_GROUPS_FAILED: &str = "CHAT_LOAD_GROUPS_FAILED";
const RESOLVE_USER_FAILED: &str = "CHAT_RESOLVE_USER_FAILED";
const CREATE_GROUP_FAILED: &str = "CHAT_CREATE_GROUP_FAILED";
const OPEN_GROUP_FAILED: &str = "CHAT_OPEN_GROUP_FAILED";
const SEND_MESSAGE_FAILED: &str = "CHAT_SEND_MESSAGE_FAILED";

/// How groups map onto transport channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRouting {
    /// Every group shares one channel; receivers filter by group id.
    Shared { name: String },
    /// One channel per group, named `{prefix}:{group_id}`.
    PerGroup { prefix: String },
}

impl ChannelRouting {
    pub fn channel_for(&self, group_id: &GroupId) -> String {
        match self {
            Self::Shared { name } => name.clone(),
            Self::PerGroup { prefix } => format!("{prefix}:{group_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub routing: ChannelRouting,
    pub default_avatar: String,
    pub avatar_thumbnail_px: u32,
}

#[derive(Clone)]
pub struct ChatCollaborators {
    pub store: Arc<dyn GroupStore>,
    pub transport: Arc<dyn MessageTransport>,
    pub directory: Arc<dyn UserDirectory>,
    pub thumbnailer: Arc<dyn AvatarThumbnailer>,
}

pub struct ChatSessionManager {
    identity: SessionIdentity,
    collaborators: ChatCollaborators,
    settings: ChatSettings,
    user: Mutex<Option<User>>,
    state: Mutex<ChatSessionState>,
}

impl ChatSessionManager {
    pub fn new(
        identity: SessionIdentity,
        collaborators: ChatCollaborators,
        settings: ChatSettings,
    ) -> Self {
        Self {
            identity,
            collaborators,
            settings,
            user: Mutex::new(None),
            state: Mutex::new(ChatSessionState::default()),
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.collaborators.transport.connection_id()
    }

    pub fn transport(&self) -> Arc<dyn MessageTransport> {
        Arc::clone(&self.collaborators.transport)
    }

    pub fn resolved_user(&self) -> Option<User> {
        self.user.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn groups(&self) -> Vec<Group> {
        self.state().groups().to_vec()
    }

    pub fn current_group(&self) -> Option<Group> {
        self.state().current_group().cloned()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state().messages().to_vec()
    }

    pub fn ui_state(&self) -> OpenGroupUiState {
        self.state().ui_state()
    }

    pub fn draft_text(&self) -> String {
        self.state().draft_text().to_owned()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.state().set_draft(text);
    }

    pub fn find_group_by_name(&self, name: &str) -> Option<Group> {
        self.state().find_group_by_name(name).cloned()
    }

    pub fn channel_for(&self, group_id: &GroupId) -> String {
        self.settings.routing.channel_for(group_id)
    }

    /// Whether `message` came from this client's live connection.
    pub fn is_mine(&self, message: &Message) -> bool {
        message.is_sent_by(&self.connection_id())
    }

    /// Replaces the group list and resolves the session user once.
    ///
    /// On a store failure the list is emptied and the error returned.
    pub async fn load_groups(&self) -> Result<usize, LoadGroupsError> {
        self.ensure_user().await;

        match load_groups(self.collaborators.store.as_ref()).await {
            Ok(groups) => {
                let count = groups.len();
                self.state().set_groups(groups);
                tracing::info!(count, "group list loaded");
                Ok(count)
            }
            Err(error) => {
                self.state().set_groups(Vec::new());
                tracing::error!(
                    code = LOAD_GROUPS_FAILED,
                    error = ?error,
                    "group list unavailable; showing empty list"
                );
                Err(error)
            }
        }
    }

    pub async fn create_group(&self, name: &str) -> Result<Group, CreateGroupError> {
        let existing = self.groups();
        let creator = self.resolved_user();

        let result = match creator {
            Some(creator) => {
                create_group(
                    self.collaborators.store.as_ref(),
                    &existing,
                    &creator.id,
                    CreateGroupCommand {
                        name: name.to_owned(),
                    },
                )
                .await
            }
            None => validate_group_name(&existing, name)
                .and(Err(CreateGroupError::IdentityUnavailable)),
        };

        match result {
            Ok(group) => {
                tracing::info!(group_id = %group.id, name = %group.name, "group created");
                self.state().add_created_group(group.clone());
                Ok(group)
            }
            Err(error) => {
                tracing::error!(code = CREATE_GROUP_FAILED, error = ?error, "group creation failed");
                Err(error)
            }
        }
    }

    /// Opens a listed group and loads its entire history.
    ///
    /// If another open or create happens before the fetch returns, the
    /// fetched history is discarded and `Superseded` is returned.
    pub async fn open_group(&self, group_id: &GroupId) -> Result<OpenGroupOutcome, OpenGroupError> {
        self.open_group_live_since(group_id, Utc::now()).await
    }

    /// Like [`Self::open_group`], for a caller already listening on the
    /// group's channel since `live_since`.
    ///
    /// Live messages received during the fetch are listed after the history,
    /// and history written after `live_since` is not listed twice when its
    /// live copy arrives.
    pub async fn open_group_live_since(
        &self,
        group_id: &GroupId,
        live_since: DateTime<Utc>,
    ) -> Result<OpenGroupOutcome, OpenGroupError> {
        let ticket = {
            let mut state = self.state();
            let group = state
                .find_group(group_id)
                .cloned()
                .ok_or(OpenGroupError::UnknownGroup)?;
            state.begin_open(group, live_since)
        };

        let history = load_history(
            self.collaborators.store.as_ref(),
            ticket.group_id(),
            &self.settings.default_avatar,
        )
        .await;

        match history {
            Ok(messages) => {
                let count = messages.len();
                if self.state().apply_history(&ticket, messages) {
                    tracing::debug!(group_id = %group_id, count, "group history applied");
                    Ok(OpenGroupOutcome::Applied)
                } else {
                    tracing::debug!(group_id = %group_id, "stale group history dropped");
                    Ok(OpenGroupOutcome::Superseded)
                }
            }
            Err(error) => {
                let current = self.state().fail_history(&ticket);
                tracing::error!(
                    code = OPEN_GROUP_FAILED,
                    error = ?error,
                    group_id = %group_id,
                    current,
                    "group history unavailable"
                );

                if current {
                    Err(error)
                } else {
                    Ok(OpenGroupOutcome::Superseded)
                }
            }
        }
    }

    /// Ingests one inbound live message. Returns whether it joins the open
    /// group's list, immediately or once the loading history arrives.
    pub fn receive_live_message(&self, message: Message) -> bool {
        let group_id = message.group_id.clone();
        let accepted = self.state().accept_live(message);

        if !accepted {
            tracing::trace!(group_id = %group_id, "live message for another group ignored");
        }

        accepted
    }

    /// Sends `text` to the open group. The draft is cleared once the message
    /// is persisted and kept on every failure.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome, SendMessageError> {
        let result = self.try_send(text).await;

        match result {
            Ok(outcome) => {
                self.state().clear_draft();
                Ok(outcome)
            }
            Err(error) => {
                tracing::error!(code = SEND_MESSAGE_FAILED, error = ?error, "message send failed");
                Err(error)
            }
        }
    }

    async fn try_send(&self, text: &str) -> Result<SendOutcome, SendMessageError> {
        let group = self.current_group().ok_or(SendMessageError::NoOpenGroup)?;
        if text.trim().is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }
        let user = self
            .resolved_user()
            .ok_or(SendMessageError::IdentityUnavailable)?;

        let connection_id = self.connection_id();
        let channel = self.settings.routing.channel_for(&group.id);
        let ports = SendPorts {
            store: self.collaborators.store.as_ref(),
            transport: self.collaborators.transport.as_ref(),
            thumbnailer: self.collaborators.thumbnailer.as_ref(),
        };
        let sender = OutgoingSender {
            user: &user,
            connection_id: &connection_id,
            default_avatar: &self.settings.default_avatar,
            avatar_px: self.settings.avatar_thumbnail_px,
        };

        send_message(
            ports,
            &channel,
            sender,
            SendMessageCommand {
                group_id: group.id,
                text: text.to_owned(),
                timestamp: Utc::now(),
            },
        )
        .await
    }

    async fn ensure_user(&self) {
        if self.resolved_user().is_some() {
            return;
        }

        match resolve_user(self.collaborators.directory.as_ref(), &self.identity).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "session user resolved");
                *self.user.lock().unwrap_or_else(PoisonError::into_inner) = Some(user);
            }
            Err(error) => {
                tracing::warn!(
                    code = RESOLVE_USER_FAILED,
                    error = ?error,
                    "session user could not be resolved"
                );
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, ChatSessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{
        domain::{message::PersistedMessage, user::UserId},
        test_support::{
            sample_group, sample_user, RecordingTransport, ScriptedStore, SizeTaggingThumbnailer,
            StaticDirectory,
        },
        usecases::contracts::{GroupStoreError, TransportError, UserLookupError},
    };

    struct Harness {
        store: Arc<ScriptedStore>,
        transport: Arc<RecordingTransport>,
        directory: Arc<StaticDirectory>,
        manager: Arc<ChatSessionManager>,
    }

    fn shared_settings() -> ChatSettings {
        ChatSettings {
            routing: ChannelRouting::Shared {
                name: "chat-demo1".to_owned(),
            },
            default_avatar: "/default-avatar.png".to_owned(),
            avatar_thumbnail_px: 100,
        }
    }

    fn harness_with(store: ScriptedStore, directory: StaticDirectory) -> Harness {
        let store = Arc::new(store);
        let transport = Arc::new(RecordingTransport::new("conn-me"));
        let directory = Arc::new(directory);
        let manager = Arc::new(ChatSessionManager::new(
            SessionIdentity::new("ada@lab.example"),
            ChatCollaborators {
                store: store.clone(),
                transport: transport.clone(),
                directory: directory.clone(),
                thumbnailer: Arc::new(SizeTaggingThumbnailer::default()),
            },
            shared_settings(),
        ));

        Harness {
            store,
            transport,
            directory,
            manager,
        }
    }

    fn harness(groups: Vec<Group>) -> Harness {
        harness_with(
            ScriptedStore::with_groups(groups),
            StaticDirectory::new(Ok(sample_user("u-1", "Ada", "Lovelace"))),
        )
    }

    fn persisted(first: &str, last: &str, text: &str) -> PersistedMessage {
        PersistedMessage {
            sender: sample_user("u-2", first, last),
            text: text.to_owned(),
            timestamp: Utc.with_ymd_and_hms(2025, 2, 2, 10, 0, 0).unwrap(),
        }
    }

    fn live(group_id: &str, text: &str, connection: &str) -> Message {
        Message {
            group_id: GroupId::new(group_id),
            sender_id: UserId::new("u-3"),
            sender_name: "Grace Hopper".to_owned(),
            sender_avatar: "/default-avatar.png".to_owned(),
            text: text.to_owned(),
            timestamp: Utc.with_ymd_and_hms(2025, 2, 2, 11, 0, 0).unwrap(),
            connection_id: Some(ConnectionId::new(connection)),
        }
    }

    #[tokio::test]
    async fn load_groups_replaces_list_and_resolves_user_once() {
        let h = harness(vec![sample_group("g-1", "Alpha"), sample_group("g-2", "Beta")]);

        let count = h.manager.load_groups().await.expect("groups should load");
        h.manager.load_groups().await.expect("groups should reload");

        assert_eq!(count, 2);
        assert_eq!(h.manager.groups().len(), 2);
        assert_eq!(h.directory.lookups(), 1);
        assert_eq!(
            h.manager.resolved_user().map(|user| user.id),
            Some(UserId::new("u-1"))
        );
    }

    #[tokio::test]
    async fn load_groups_failure_falls_back_to_empty_list() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.manager.load_groups().await.expect("groups should load");
        h.store.fail_list(GroupStoreError::Unavailable);

        let err = h.manager.load_groups().await.expect_err("must fail");

        assert_eq!(err, LoadGroupsError::TemporarilyUnavailable);
        assert!(h.manager.groups().is_empty());
    }

    #[tokio::test]
    async fn create_group_on_empty_list_opens_new_group() {
        let h = harness(vec![]);
        h.manager.load_groups().await.expect("groups should load");

        let created = h.manager.create_group("Alpha").await.expect("create should succeed");

        let groups = h.manager.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Alpha");
        assert_eq!(groups[0].members, vec![UserId::new("u-1")]);
        assert_eq!(h.manager.current_group(), Some(created));
        assert!(h.manager.messages().is_empty());
    }

    #[tokio::test]
    async fn create_group_with_existing_name_never_calls_store() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.manager.load_groups().await.expect("groups should load");

        let err = h.manager.create_group("Alpha").await.expect_err("must fail");

        assert_eq!(err, CreateGroupError::DuplicateName);
        assert!(!h.store.calls().iter().any(|call| call.starts_with("create:")));
        assert_eq!(h.manager.groups().len(), 1);
    }

    #[tokio::test]
    async fn create_group_store_failure_adds_nothing() {
        let h = harness(vec![]);
        h.manager.load_groups().await.expect("groups should load");
        h.store.fail_creates(GroupStoreError::Unavailable);

        let err = h.manager.create_group("Alpha").await.expect_err("must fail");

        assert_eq!(err, CreateGroupError::TemporarilyUnavailable);
        assert!(h.manager.groups().is_empty());
        assert!(h.manager.current_group().is_none());
    }

    #[tokio::test]
    async fn create_group_requires_resolved_user() {
        let h = harness_with(
            ScriptedStore::default(),
            StaticDirectory::new(Err(UserLookupError::NotFound)),
        );
        h.manager.load_groups().await.expect("groups should load");

        let err = h.manager.create_group("Alpha").await.expect_err("must fail");

        assert_eq!(err, CreateGroupError::IdentityUnavailable);
        assert!(!h.store.calls().iter().any(|call| call.starts_with("create:")));
    }

    #[tokio::test]
    async fn open_group_normalizes_history() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.store.set_history("g-1", vec![persisted("A", "B", "hi")]);
        h.manager.load_groups().await.expect("groups should load");

        let outcome = h
            .manager
            .open_group(&GroupId::new("g-1"))
            .await
            .expect("open should succeed");

        assert_eq!(outcome, OpenGroupOutcome::Applied);
        let messages = h.manager.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "hi");
        assert_eq!(messages[0].sender_name, "A B");
        assert_eq!(messages[0].sender_avatar, "/default-avatar.png");
        assert_eq!(h.manager.ui_state(), OpenGroupUiState::Ready);
    }

    #[tokio::test]
    async fn open_group_rejects_unlisted_group_without_fetch() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.manager.load_groups().await.expect("groups should load");

        let err = h
            .manager
            .open_group(&GroupId::new("g-404"))
            .await
            .expect_err("must fail");

        assert_eq!(err, OpenGroupError::UnknownGroup);
        assert!(!h.store.calls().iter().any(|call| call.starts_with("history:")));
        assert!(h.manager.current_group().is_none());
    }

    #[tokio::test]
    async fn open_group_failure_leaves_empty_history() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.manager.load_groups().await.expect("groups should load");
        h.store.fail_history(GroupStoreError::Unavailable);

        let err = h
            .manager
            .open_group(&GroupId::new("g-1"))
            .await
            .expect_err("must fail");

        assert_eq!(err, OpenGroupError::TemporarilyUnavailable);
        assert!(h.manager.messages().is_empty());
        assert_eq!(h.manager.ui_state(), OpenGroupUiState::Error);
        assert_eq!(
            h.manager.current_group().map(|group| group.name),
            Some("Alpha".to_owned())
        );
    }

    #[tokio::test]
    async fn slow_history_for_previous_group_does_not_overwrite_newer_group() {
        let h = harness(vec![sample_group("g-x", "X"), sample_group("g-y", "Y")]);
        h.store.set_history("g-x", vec![persisted("X", "Sender", "stale")]);
        h.store.set_history("g-y", vec![persisted("Y", "Sender", "fresh")]);
        h.manager.load_groups().await.expect("groups should load");
        let release_x = h.store.gate_history("g-x");

        let manager = h.manager.clone();
        let open_x = tokio::spawn(async move { manager.open_group(&GroupId::new("g-x")).await });
        while !h.store.calls().contains(&"history:g-x".to_owned()) {
            tokio::task::yield_now().await;
        }

        let open_y = h
            .manager
            .open_group(&GroupId::new("g-y"))
            .await
            .expect("open y should succeed");
        release_x.send(()).expect("x fetch should be waiting");
        let open_x = open_x
            .await
            .expect("open x task should join")
            .expect("open x should not error");

        assert_eq!(open_y, OpenGroupOutcome::Applied);
        assert_eq!(open_x, OpenGroupOutcome::Superseded);
        assert_eq!(
            h.manager.current_group().map(|group| group.name),
            Some("Y".to_owned())
        );
        let texts: Vec<_> = h.manager.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["fresh".to_owned()]);
    }

    #[tokio::test]
    async fn live_message_received_while_history_loads_is_kept() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.store.set_history("g-1", vec![persisted("A", "B", "old")]);
        h.manager.load_groups().await.expect("groups should load");
        let release = h.store.gate_history("g-1");

        let manager = h.manager.clone();
        let open = tokio::spawn(async move { manager.open_group(&GroupId::new("g-1")).await });
        while !h.store.calls().contains(&"history:g-1".to_owned()) {
            tokio::task::yield_now().await;
        }

        let accepted = h
            .manager
            .receive_live_message(live("g-1", "during load", "conn-x"));
        release.send(()).expect("fetch should be waiting");
        let outcome = open
            .await
            .expect("open task should join")
            .expect("open should succeed");

        assert!(accepted);
        assert_eq!(outcome, OpenGroupOutcome::Applied);
        let texts: Vec<_> = h.manager.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["old".to_owned(), "during load".to_owned()]);
    }

    #[tokio::test]
    async fn live_message_for_other_group_is_dropped() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.store.set_history("g-1", vec![persisted("A", "B", "hi")]);
        h.manager.load_groups().await.expect("groups should load");
        h.manager
            .open_group(&GroupId::new("g-1"))
            .await
            .expect("open should succeed");

        let accepted = h.manager.receive_live_message(live("g-2", "elsewhere", "conn-x"));

        assert!(!accepted);
        assert_eq!(h.manager.messages().len(), 1);
    }

    #[tokio::test]
    async fn live_messages_append_after_history_in_arrival_order() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.store.set_history("g-1", vec![persisted("A", "B", "hi")]);
        h.manager.load_groups().await.expect("groups should load");
        h.manager
            .open_group(&GroupId::new("g-1"))
            .await
            .expect("open should succeed");

        h.manager.receive_live_message(live("g-1", "one", "conn-x"));
        h.manager.receive_live_message(live("g-1", "two", "conn-y"));

        let texts: Vec<_> = h.manager.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["hi", "one", "two"]);
    }

    #[tokio::test]
    async fn sent_message_appears_once_through_live_echo() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.manager.load_groups().await.expect("groups should load");
        h.manager
            .open_group(&GroupId::new("g-1"))
            .await
            .expect("open should succeed");
        h.manager.set_draft("hello");

        let outcome = h.manager.send_message("hello").await.expect("send should succeed");

        assert_eq!(outcome, SendOutcome::Delivered);
        assert!(h.manager.messages().is_empty());
        assert_eq!(h.manager.draft_text(), "");

        let (channel, _, echo) = h.transport.published().remove(0);
        assert_eq!(channel, "chat-demo1");
        assert!(h.manager.receive_live_message(echo));

        let messages = h.manager.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "hello");
        assert!(h.manager.is_mine(&messages[0]));
        assert_eq!(h.store.appended().len(), 1);
    }

    #[tokio::test]
    async fn failed_persist_keeps_draft_and_skips_broadcast() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.manager.load_groups().await.expect("groups should load");
        h.manager
            .open_group(&GroupId::new("g-1"))
            .await
            .expect("open should succeed");
        h.store.fail_appends(GroupStoreError::Unavailable);
        h.manager.set_draft("keep me");

        let err = h.manager.send_message("keep me").await.expect_err("must fail");

        assert_eq!(err, SendMessageError::TemporarilyUnavailable);
        assert_eq!(h.manager.draft_text(), "keep me");
        assert!(h.transport.published().is_empty());
    }

    #[tokio::test]
    async fn failed_broadcast_after_persist_clears_draft() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.manager.load_groups().await.expect("groups should load");
        h.manager
            .open_group(&GroupId::new("g-1"))
            .await
            .expect("open should succeed");
        h.transport.fail_publishes(TransportError::Disconnected);
        h.manager.set_draft("durable");

        let outcome = h.manager.send_message("durable").await.expect("persisted");

        assert_eq!(outcome, SendOutcome::PersistedWithoutBroadcast);
        assert_eq!(h.manager.draft_text(), "");
        assert_eq!(h.store.appended().len(), 1);
    }

    #[tokio::test]
    async fn send_without_open_group_is_rejected() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.manager.load_groups().await.expect("groups should load");

        let err = h.manager.send_message("hello").await.expect_err("must fail");

        assert_eq!(err, SendMessageError::NoOpenGroup);
        assert!(h.store.appended().is_empty());
    }

    #[tokio::test]
    async fn messages_from_other_connection_of_same_user_are_not_mine() {
        let h = harness(vec![sample_group("g-1", "Alpha")]);
        h.manager.load_groups().await.expect("groups should load");
        h.manager
            .open_group(&GroupId::new("g-1"))
            .await
            .expect("open should succeed");

        let mut other_tab = live("g-1", "from my other tab", "conn-other-tab");
        other_tab.sender_id = UserId::new("u-1");

        assert!(!h.manager.is_mine(&other_tab));
        assert!(h.manager.is_mine(&live("g-1", "mine", "conn-me")));
    }

    #[test]
    fn per_group_routing_names_channel_after_group() {
        let routing = ChannelRouting::PerGroup {
            prefix: "discovery-chat".to_owned(),
        };

        assert_eq!(
            routing.channel_for(&GroupId::new("g-7")),
            "discovery-chat:g-7"
        );
    }
}
