
use crate::ParseError;
use crate::play::{OutcomeKey, RunnerChoice};
use anyhow::Result;

/// Menus a screen can ask the session to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuTarget {
    /// Game header menu (stats sheet, restart, end game)
    Game,
    /// Outcome picker
    Outcomes,
    /// Lineup stats sheet
    Stats,
}

impl MenuTarget {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "game" => Some(MenuTarget::Game),
            "outcomes" => Some(MenuTarget::Outcomes),
            "stats" => Some(MenuTarget::Stats),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuTarget::Game => "game",
            MenuTarget::Outcomes => "outcomes",
            MenuTarget::Stats => "stats",
        }
    }
}

/// One scorer action, as typed or scripted
#[derive(Debug, Clone, PartialEq)]
pub enum ScorerCommand {
    /// ball
    Ball,

    /// strike
    Strike,

    /// outcome KEY
    Outcome(OutcomeKey),

    /// runner CHOICE
    Runner(RunnerChoice),

    /// undo
    Undo,

    /// restart
    Restart,

    /// menu TARGET
    Menu(MenuTarget),

    /// status
    Status,
}

impl ScorerCommand {
    /// Serialize back to the command line format
    pub fn to_wire_format(&self) -> String {
        match self {
            Self::Ball => "ball".to_string(),
            Self::Strike => "strike".to_string(),
            Self::Outcome(key) => format!("outcome {}", key.as_str()),
            Self::Runner(choice) => format!("runner {}", choice.as_str()),
            Self::Undo => "undo".to_string(),
            Self::Restart => "restart".to_string(),
            Self::Menu(target) => format!("menu {}", target.as_str()),
            Self::Status => "status".to_string(),
        }
    }
}

/// Parse a whole script, one command per line
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_script(script: &str) -> Result<Vec<ScorerCommand>> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_command)
        .collect()
}

/// Parse a single command line
pub fn parse_command(line: &str) -> Result<ScorerCommand> {
    let line = line.trim();

    if line.is_empty() {
        return Err(ParseError::EmptyCommand.into());
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let verb = parts[0].to_ascii_lowercase();

    match verb.as_str() {
        "ball" | "b" => expect_bare(&parts, ScorerCommand::Ball),
        "strike" | "s" => expect_bare(&parts, ScorerCommand::Strike),
        "undo" => expect_bare(&parts, ScorerCommand::Undo),
        "restart" => expect_bare(&parts, ScorerCommand::Restart),
        "status" => expect_bare(&parts, ScorerCommand::Status),
        "outcome" | "o" => parse_outcome(&parts),
        "runner" | "r" => parse_runner(&parts),
        "menu" => parse_menu(&parts),
        _ => Err(ParseError::Unknown {
            kind: "command",
            value: parts[0].to_string(),
        }
        .into()),
    }
}

fn expect_bare(parts: &[&str], command: ScorerCommand) -> Result<ScorerCommand> {
    if parts.len() > 1 {
        return Err(ParseError::InvalidFormat(format!(
            "'{}' takes no arguments",
            parts[0]
        ))
        .into());
    }
    Ok(command)
}

fn argument<'a>(parts: &[&'a str], field: &str) -> Result<&'a str> {
    // outcome KEY / runner CHOICE / menu TARGET take exactly one argument
    match parts {
        [_, arg] => Ok(*arg),
        [_] => Err(ParseError::MissingField(field.to_string()).into()),
        _ => Err(ParseError::InvalidFormat(format!("'{}' takes one argument", parts[0])).into()),
    }
}

fn parse_outcome(parts: &[&str]) -> Result<ScorerCommand> {
    let raw = argument(parts, "outcome key")?.to_ascii_lowercase();
    let key = OutcomeKey::parse(&raw).ok_or_else(|| ParseError::Unknown {
        kind: "outcome",
        value: raw.clone(),
    })?;
    Ok(ScorerCommand::Outcome(key))
}

fn parse_runner(parts: &[&str]) -> Result<ScorerCommand> {
    let raw = argument(parts, "runner choice")?.to_ascii_lowercase();
    let choice = RunnerChoice::parse(&raw).ok_or_else(|| ParseError::Unknown {
        kind: "runner choice",
        value: raw.clone(),
    })?;
    Ok(ScorerCommand::Runner(choice))
}

fn parse_menu(parts: &[&str]) -> Result<ScorerCommand> {
    let raw = argument(parts, "menu target")?.to_ascii_lowercase();
    let target = MenuTarget::parse(&raw).ok_or_else(|| ParseError::Unknown {
        kind: "menu",
        value: raw.clone(),
    })?;
    Ok(ScorerCommand::Menu(target))
}
