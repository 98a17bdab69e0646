use std::io::{self, Write};

use anyhow::Result;
use tokio::sync::mpsc;

use crate::{
    domain::{events::AppEvent, group::Group, message::Message},
    usecases::{
        context::AppContext,
        shell::{ChatShell, ShellNotice},
    },
};

use super::{
    event_source,
    message_rendering::{
        element_lines, group_label, group_list_lines, MessageListBuilder, CONSOLE_WIDTH,
    },
};

const EVENT_BUFFER: usize = 128;

const HELP_LINES: [&str; 6] = [
    "/groups          list groups",
    "/create <name>   create a group and open it",
    "/open <name>     open a group (alias /join)",
    "/help            show this help",
    "/quit            leave",
    "anything else is sent to the open group",
];

/// Writes shell notices as console text.
pub struct Console<W: Write> {
    out: W,
    width: usize,
    list: MessageListBuilder,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width,
            list: MessageListBuilder::default(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn show(
        &mut self,
        notice: &ShellNotice,
        is_mine: impl Fn(&Message) -> bool,
    ) -> io::Result<()> {
        match notice {
            ShellNotice::Groups(groups) => {
                writeln!(self.out, "Groups:")?;
                for line in group_list_lines(groups, None) {
                    writeln!(self.out, "{line}")?;
                }
            }
            ShellNotice::GroupCreated(group) => {
                self.list.reset();
                writeln!(self.out, "Created and opened {}", group_label(group))?;
            }
            ShellNotice::GroupOpened { group, messages } => {
                self.list.reset();
                writeln!(self.out, "== {} ==", group_label(group))?;
                if messages.is_empty() {
                    writeln!(self.out, "No messages yet. Say hello!")?;
                }
                for message in messages {
                    let mine = is_mine(message);
                    for element in self.list.push(message, mine) {
                        self.write_lines(element_lines(&element, self.width))?;
                    }
                }
            }
            ShellNotice::LiveMessage(message) => {
                let elements = self.list.push(message, is_mine(message));
                for element in elements {
                    self.write_lines(element_lines(&element, self.width))?;
                }
            }
            ShellNotice::Info(text) => writeln!(self.out, "{text}")?,
            ShellNotice::Error(text) => writeln!(self.out, "! {text}")?,
            ShellNotice::Help => {
                for line in HELP_LINES {
                    writeln!(self.out, "{line}")?;
                }
            }
        }

        self.out.flush()
    }

    fn write_lines(&mut self, lines: Vec<String>) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

pub async fn start(context: &AppContext) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        data_dir = %context.layout.data_dir.display(),
        log_file = context.has_log_file(),
        "starting chat console"
    );

    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
    event_source::spawn_stdin_reader(tx.clone())?;

    let mut shell = ChatShell::new(context.session.clone(), tx);
    let mut console = Console::new(io::stdout(), CONSOLE_WIDTH);

    drive(&mut shell, &mut rx, &mut console).await?;

    tracing::info!("chat console closed");
    Ok(())
}

/// Runs the event loop until quit or until every event sender is gone.
pub async fn drive<W: Write>(
    shell: &mut ChatShell,
    events: &mut mpsc::Receiver<AppEvent>,
    console: &mut Console<W>,
) -> Result<()> {
    for notice in shell.start().await {
        console.show(&notice, |m| shell.session().is_mine(m))?;
    }
    console.show(&ShellNotice::Help, |_| false)?;

    while shell.is_running() {
        let Some(event) = events.recv().await else {
            break;
        };

        for notice in shell.handle_event(event).await {
            console.show(&notice, |m| shell.session().is_mine(m))?;
        }
    }

    Ok(())
}

/// Prints the group list once, for the `groups` command.
pub fn print_groups<W: Write>(out: &mut W, groups: &[Group]) -> io::Result<()> {
    for line in group_list_lines(groups, None) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
