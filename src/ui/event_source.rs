use std::{
    io::{self, BufRead},
    thread,
};

use tokio::sync::mpsc;

use crate::domain::events::{AppEvent, ShellCommand};

const STDIN_READ_FAILED: &str = "UI_STDIN_READ_FAILED";

/// Maps one line of console input to an event. Blank lines are ignored.
pub fn parse_input_line(line: &str) -> Option<AppEvent> {
    let trimmed = line.trim();
    if trimmed == "/quit" || trimmed == "/exit" {
        return Some(AppEvent::QuitRequested);
    }

    ShellCommand::parse(line).map(AppEvent::Command)
}

/// Reads stdin on a dedicated thread and forwards parsed events.
///
/// End of input counts as a quit request.
pub fn spawn_stdin_reader(events: mpsc::Sender<AppEvent>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-reader".to_owned())
        .spawn(move || forward_lines(io::stdin().lock(), &events))
}

fn forward_lines(input: impl BufRead, events: &mpsc::Sender<AppEvent>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                tracing::error!(code = STDIN_READ_FAILED, error = %error, "console input failed");
                break;
            }
        };

        let Some(event) = parse_input_line(&line) else {
            continue;
        };
        let quit = event == AppEvent::QuitRequested;
        if events.blocking_send(event).is_err() || quit {
            return;
        }
    }

    let _ = events.blocking_send(AppEvent::QuitRequested);
}
