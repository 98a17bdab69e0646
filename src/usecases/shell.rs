//! Console shell orchestration: maps input events onto chat session
//! operations and keeps the live subscription pointed at the open group.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::domain::{
    events::{AppEvent, ShellCommand},
    group::Group,
    message::Message,
};

use super::{chat_session::ChatSessionManager, open_group::OpenGroupOutcome, send_message::SendOutcome};

const LIVE_SUBSCRIBE_FAILED: &str = "SHELL_LIVE_SUBSCRIBE_FAILED";

/// What the console should show after an event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellNotice {
    Groups(Vec<Group>),
    GroupCreated(Group),
    GroupOpened { group: Group, messages: Vec<Message> },
    LiveMessage(Message),
    Info(String),
    Error(String),
    Help,
}

struct LiveFeed {
    channel: String,
    since: DateTime<Utc>,
    task: JoinHandle<()>,
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct ChatShell {
    session: Arc<ChatSessionManager>,
    events: mpsc::Sender<AppEvent>,
    live: Option<LiveFeed>,
    running: bool,
}

impl ChatShell {
    /// Live messages are forwarded into `events` as [`AppEvent::LiveMessage`].
    pub fn new(session: Arc<ChatSessionManager>, events: mpsc::Sender<AppEvent>) -> Self {
        Self {
            session,
            events,
            live: None,
            running: true,
        }
    }

    pub fn session(&self) -> &ChatSessionManager {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn live_channel(&self) -> Option<&str> {
        self.live.as_ref().map(|feed| feed.channel.as_str())
    }

    /// Loads the group list shown when the console opens.
    pub async fn start(&mut self) -> Vec<ShellNotice> {
        self.list_groups().await
    }

    pub async fn handle_event(&mut self, event: AppEvent) -> Vec<ShellNotice> {
        match event {
            AppEvent::QuitRequested => {
                self.running = false;
                self.live = None;
                Vec::new()
            }
            AppEvent::LiveMessage(message) => {
                if self.session.receive_live_message(message.clone()) {
                    vec![ShellNotice::LiveMessage(message)]
                } else {
                    Vec::new()
                }
            }
            AppEvent::Command(command) => self.handle_command(command).await,
        }
    }

    async fn handle_command(&mut self, command: ShellCommand) -> Vec<ShellNotice> {
        match command {
            ShellCommand::ListGroups => self.list_groups().await,
            ShellCommand::CreateGroup(name) => self.create_group(&name).await,
            ShellCommand::OpenGroup(name) => self.open_group(&name).await,
            ShellCommand::Send(text) => self.send(text).await,
            ShellCommand::Help => vec![ShellNotice::Help],
        }
    }

    async fn list_groups(&mut self) -> Vec<ShellNotice> {
        match self.session.load_groups().await {
            Ok(_) => vec![ShellNotice::Groups(self.session.groups())],
            Err(error) => vec![
                ShellNotice::Error(error.user_message().to_owned()),
                ShellNotice::Groups(Vec::new()),
            ],
        }
    }

    async fn create_group(&mut self, name: &str) -> Vec<ShellNotice> {
        match self.session.create_group(name).await {
            Ok(group) => {
                let channel = self.session.channel_for(&group.id);
                let mut notices = vec![ShellNotice::GroupCreated(group)];
                notices.extend(self.follow_channel(channel).await);
                notices
            }
            Err(error) => vec![ShellNotice::Error(error.user_message().to_owned())],
        }
    }

    /// Listens on the group's channel before fetching its history, so a
    /// message sent during the fetch is either in the history or on the feed.
    async fn open_group(&mut self, name: &str) -> Vec<ShellNotice> {
        let name = name.trim();
        let Some(group) = self.session.find_group_by_name(name) else {
            return vec![ShellNotice::Error(format!(
                "No group named \"{name}\". Use /groups to see the list."
            ))];
        };

        let channel = self.session.channel_for(&group.id);
        let feed_notices = self.follow_channel(channel).await;
        let opened = match self.live.as_ref().map(|feed| feed.since) {
            Some(since) => self.session.open_group_live_since(&group.id, since).await,
            None => self.session.open_group(&group.id).await,
        };

        let mut notices = match opened {
            Ok(OpenGroupOutcome::Applied) => vec![ShellNotice::GroupOpened {
                group,
                messages: self.session.messages(),
            }],
            Ok(OpenGroupOutcome::Superseded) => Vec::new(),
            Err(error) => vec![ShellNotice::Error(error.user_message().to_owned())],
        };
        notices.extend(feed_notices);
        notices
    }

    async fn send(&mut self, text: String) -> Vec<ShellNotice> {
        self.session.set_draft(text.clone());

        match self.session.send_message(&text).await {
            // The message shows up through the live echo.
            Ok(SendOutcome::Delivered) => Vec::new(),
            Ok(SendOutcome::PersistedWithoutBroadcast) => vec![ShellNotice::Info(
                "Message saved, but live delivery failed. Others will see it when they reopen the group."
                    .to_owned(),
            )],
            Err(error) => vec![ShellNotice::Error(error.user_message().to_owned())],
        }
    }

    /// Subscribes to `channel` unless already listening there.
    async fn follow_channel(&mut self, channel: String) -> Vec<ShellNotice> {
        if self.live_channel() == Some(channel.as_str()) {
            return Vec::new();
        }

        self.live = None;
        let since = Utc::now();
        let mut subscription = match self.session.transport().subscribe(&channel).await {
            Ok(subscription) => subscription,
            Err(error) => {
                tracing::error!(
                    code = LIVE_SUBSCRIBE_FAILED,
                    channel = %channel,
                    error = ?error,
                    "live subscription failed"
                );
                return vec![ShellNotice::Error(
                    "Live updates are unavailable right now.".to_owned(),
                )];
            }
        };

        let events = self.events.clone();
        let task = tokio::spawn(async move {
            while let Some(message) = subscription.next().await {
                if events.send(AppEvent::LiveMessage(message)).await.is_err() {
                    break;
                }
            }
        });

        tracing::debug!(channel = %channel, "listening for live messages");
        self.live = Some(LiveFeed {
            channel,
            since,
            task,
        });
        Vec::new()
    }
}
