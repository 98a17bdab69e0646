//! Shared test doubles for the chat collaborators.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{
        group::{Group, GroupId},
        message::{ConnectionId, Message, PersistedMessage},
        user::{User, UserId},
    },
    usecases::contracts::{
        AvatarThumbnailer, GroupStore, GroupStoreError, MessageTransport, ThumbnailError,
        TransportError, TransportSubscription, UserDirectory, UserLookupError,
    },
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().expect("env lock should not be poisoned")
}

pub fn sample_user(id: &str, first_name: &str, last_name: &str) -> User {
    User {
        id: UserId::new(id),
        email: format!("{}@lab.example", first_name.to_ascii_lowercase()),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        photo: None,
    }
}

pub fn sample_group(id: &str, name: &str) -> Group {
    Group {
        id: GroupId::new(id),
        name: name.to_owned(),
        members: vec![UserId::new("u-1")],
    }
}

#[derive(Default)]
struct ScriptedStoreInner {
    groups: Vec<Group>,
    histories: HashMap<GroupId, Vec<PersistedMessage>>,
    gates: HashMap<GroupId, oneshot::Receiver<()>>,
    list_error: Option<GroupStoreError>,
    create_error: Option<GroupStoreError>,
    history_error: Option<GroupStoreError>,
    append_error: Option<GroupStoreError>,
    calls: Vec<String>,
    appended: Vec<(GroupId, UserId, String)>,
}

/// Group store double with canned data, injectable failures and gated
/// history fetches for ordering tests.
#[derive(Default)]
pub struct ScriptedStore {
    inner: Mutex<ScriptedStoreInner>,
}

impl ScriptedStore {
    pub fn with_groups(groups: Vec<Group>) -> Self {
        let store = Self::default();
        store.lock().groups = groups;
        store
    }

    pub fn set_history(&self, group_id: &str, messages: Vec<PersistedMessage>) {
        self.lock()
            .histories
            .insert(GroupId::new(group_id), messages);
    }

    /// Holds the next history fetch for `group_id` until the returned
    /// sender fires.
    pub fn gate_history(&self, group_id: &str) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.lock().gates.insert(GroupId::new(group_id), gate);
        release
    }

    pub fn fail_list(&self, error: GroupStoreError) {
        self.lock().list_error = Some(error);
    }

    pub fn fail_creates(&self, error: GroupStoreError) {
        self.lock().create_error = Some(error);
    }

    pub fn fail_history(&self, error: GroupStoreError) {
        self.lock().history_error = Some(error);
    }

    pub fn fail_appends(&self, error: GroupStoreError) {
        self.lock().append_error = Some(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn appended(&self) -> Vec<(GroupId, UserId, String)> {
        self.lock().appended.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptedStoreInner> {
        self.inner.lock().expect("store lock")
    }
}

#[async_trait]
impl GroupStore for ScriptedStore {
    async fn list_groups(&self) -> Result<Vec<Group>, GroupStoreError> {
        let mut inner = self.lock();
        inner.calls.push("list".to_owned());
        match inner.list_error.clone() {
            Some(error) => Err(error),
            None => Ok(inner.groups.clone()),
        }
    }

    async fn create_group(&self, name: &str, creator: &UserId) -> Result<Group, GroupStoreError> {
        let mut inner = self.lock();
        inner.calls.push(format!("create:{name}"));
        if let Some(error) = inner.create_error.clone() {
            return Err(error);
        }

        let group = Group {
            id: GroupId::new(format!("g-{}", inner.groups.len() + 1)),
            name: name.to_owned(),
            members: vec![creator.clone()],
        };
        inner.groups.push(group.clone());
        Ok(group)
    }

    async fn group_messages(
        &self,
        group_id: &GroupId,
    ) -> Result<Vec<PersistedMessage>, GroupStoreError> {
        let gate = {
            let mut inner = self.lock();
            inner.calls.push(format!("history:{group_id}"));
            inner.gates.remove(group_id)
        };

        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let inner = self.lock();
        if let Some(error) = inner.history_error.clone() {
            return Err(error);
        }

        Ok(inner.histories.get(group_id).cloned().unwrap_or_default())
    }

    async fn append_message(
        &self,
        group_id: &GroupId,
        sender: &UserId,
        text: &str,
    ) -> Result<(), GroupStoreError> {
        let mut inner = self.lock();
        inner.calls.push(format!("append:{group_id}"));
        if let Some(error) = inner.append_error.clone() {
            return Err(error);
        }

        inner
            .appended
            .push((group_id.clone(), sender.clone(), text.to_owned()));
        Ok(())
    }
}

/// Transport double that records publishes and lets tests inject inbound
/// messages.
pub struct RecordingTransport {
    connection_id: ConnectionId,
    published: Mutex<Vec<(String, String, Message)>>,
    publish_error: Mutex<Option<TransportError>>,
    subscribers: Mutex<Vec<(String, mpsc::Sender<Message>)>>,
}

impl RecordingTransport {
    pub fn new(connection_id: &str) -> Self {
        Self {
            connection_id: ConnectionId::new(connection_id),
            published: Mutex::new(Vec::new()),
            publish_error: Mutex::new(None),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_publishes(&self, error: TransportError) {
        *self.publish_error.lock().expect("publish error lock") = Some(error);
    }

    pub fn published(&self) -> Vec<(String, String, Message)> {
        self.published.lock().expect("published lock").clone()
    }

    pub fn subscribed_channels(&self) -> Vec<String> {
        self.subscribers
            .lock()
            .expect("subscribers lock")
            .iter()
            .filter(|(_, tx)| !tx.is_closed())
            .map(|(channel, _)| channel.clone())
            .collect()
    }

    /// Delivers `message` to every live subscriber of `channel`.
    pub fn inject(&self, channel: &str, message: Message) {
        for (subscribed, tx) in self.subscribers.lock().expect("subscribers lock").iter() {
            if subscribed == channel {
                let _ = tx.try_send(message.clone());
            }
        }
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    fn connection_id(&self) -> ConnectionId {
        self.connection_id.clone()
    }

    async fn publish(
        &self,
        channel: &str,
        event: &str,
        payload: &Message,
    ) -> Result<(), TransportError> {
        if let Some(error) = self.publish_error.lock().expect("publish error lock").clone() {
            return Err(error);
        }

        self.published.lock().expect("published lock").push((
            channel.to_owned(),
            event.to_owned(),
            payload.clone(),
        ));
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<TransportSubscription, TransportError> {
        let (tx, rx) = mpsc::channel(16);
        self.subscribers
            .lock()
            .expect("subscribers lock")
            .push((channel.to_owned(), tx));
        Ok(TransportSubscription::new(channel, rx))
    }
}

pub struct StaticDirectory {
    result: Result<User, UserLookupError>,
    lookups: Mutex<usize>,
}

impl StaticDirectory {
    pub fn new(result: Result<User, UserLookupError>) -> Self {
        Self {
            result,
            lookups: Mutex::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().expect("lookups lock")
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn user_by_email(&self, _email: &str) -> Result<User, UserLookupError> {
        *self.lookups.lock().expect("lookups lock") += 1;
        self.result.clone()
    }
}

/// Thumbnailer double that tags the avatar with the requested size.
#[derive(Default)]
pub struct SizeTaggingThumbnailer {
    fail: bool,
}

impl SizeTaggingThumbnailer {
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl AvatarThumbnailer for SizeTaggingThumbnailer {
    fn thumbnail(&self, avatar: &str, max_px: u32) -> Result<String, ThumbnailError> {
        if self.fail {
            return Err(ThumbnailError::Decode);
        }

        Ok(format!("{avatar}@{max_px}"))
    }
}
