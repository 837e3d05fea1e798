//! Commands and errors shared between the CLI and the game loop thread.

use std::str::FromStr;

use glam::DVec3;

use prospector_core::error::BindingError;
use prospector_engine::error::{ConfigError, EngineError};

/// Player input applied at the start of a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Move by an offset.
    Move(DVec3),
    /// Jump to an absolute position.
    Teleport(DVec3),
    /// Hold the item in a hotbar slot.
    Select(usize),
}

/// Messages sent to the game loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum GameLoopCommand {
    Player(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{command} expects {expected}")]
    BadArguments {
        command: &'static str,
        expected: &'static str,
    },
}

impl FromStr for GameLoopCommand {
    type Err = ParseCommandError;

    /// Parses `move x y z`, `tp x y z`, `select n` and `quit`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(ParseCommandError::Empty);
        };
        let args: Vec<&str> = words.collect();
        match verb {
            "move" | "m" => parse_vec(&args, "move")
                .map(|v| GameLoopCommand::Player(PlayerCommand::Move(v))),
            "tp" | "teleport" => parse_vec(&args, "tp")
                .map(|v| GameLoopCommand::Player(PlayerCommand::Teleport(v))),
            "select" | "s" => match args.as_slice() {
                [n] => n
                    .parse()
                    .map(|slot| GameLoopCommand::Player(PlayerCommand::Select(slot)))
                    .map_err(|_| ParseCommandError::BadArguments {
                        command: "select",
                        expected: "a slot index",
                    }),
                _ => Err(ParseCommandError::BadArguments {
                    command: "select",
                    expected: "a slot index",
                }),
            },
            "quit" | "exit" => Ok(GameLoopCommand::Shutdown),
            other => Err(ParseCommandError::Unknown(other.to_owned())),
        }
    }
}

fn parse_vec(args: &[&str], command: &'static str) -> Result<DVec3, ParseCommandError> {
    let bad = || ParseCommandError::BadArguments {
        command,
        expected: "three numbers",
    };
    match args {
        [x, y, z] => {
            let x = x.parse().map_err(|_| bad())?;
            let y = y.parse().map_err(|_| bad())?;
            let z = z.parse().map_err(|_| bad())?;
            Ok(DVec3::new(x, y, z))
        }
        _ => Err(bad()),
    }
}

/// Errors surfaced by the host application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("game loop thread panicked")]
    LoopPanicked,
}
