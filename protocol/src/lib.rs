use thiserror::Error;

pub mod command;
pub mod path;
pub mod play;
pub mod record;

pub use command::{MenuTarget, ScorerCommand, parse_command, parse_script};
pub use path::{PlayerId, StorePath, TeamId};
pub use play::{Base, OutcomeKey, RunnerChoice};
pub use record::{PlayerRecord, StatField, StatLine, TeamRecord, parse_bat_slot};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid command format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },

    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    #[error("Empty command")]
    EmptyCommand,
}
