use std::{io::BufRead, str::FromStr};

use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("unknown command {0:?}, expected start, pause, reset or quit")]
pub struct UnknownCommand(String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "s" | "start" => Ok(Command::Start),
            "p" | "pause" => Ok(Command::Pause),
            "r" | "reset" => Ok(Command::Reset),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

/// Forwards one command per input line until the input closes or the
/// receiver goes away. Blocks, so it runs on its own thread.
pub fn forward_lines<R: BufRead>(input: R, commands: mpsc::UnboundedSender<Command>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                warn!(%error, "failed to read controls");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if commands.send(command).is_err() {
                    break;
                }
            }
            Err(error) => warn!(%error, "ignoring input"),
        }
    }
    debug!("controls closed");
}
