// src/core/command.rs

use crate::constants::{EXIT_COMMAND, SYNC_COMMAND};

/// A single normalized line from the command channel.
///
/// The queue holds at most one live `Barrier` or `Terminate` marker at its
/// front at a time; `Ordinary` commands are popped exactly once, while the
/// markers follow the resolution rules in [`crate::core::queue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A verbatim command line, executed as an external process.
    Ordinary(String),
    /// `#sync`: every worker must arrive here before any proceeds.
    Barrier,
    /// `#exit`: the whole pool shuts down.
    Terminate,
}

/// Variant discriminant, used by workers to branch on the peeked front
/// without keeping the queue guard borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Ordinary,
    Barrier,
    Terminate,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Ordinary(_) => CommandKind::Ordinary,
            Self::Barrier => CommandKind::Barrier,
            Self::Terminate => CommandKind::Terminate,
        }
    }

    /// Classifies a raw line from the channel.
    ///
    /// Surrounding whitespace is trimmed first; a line that is empty after
    /// trimming carries no command. Only the exact reserved tokens are
    /// control commands, so a line like `#synchronize` is an ordinary
    /// command and will be executed (and most likely fail) verbatim.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(match line {
            SYNC_COMMAND => Self::Barrier,
            EXIT_COMMAND => Self::Terminate,
            _ => Self::Ordinary(line.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_carry_no_command() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \t  "), None);
    }

    #[test]
    fn reserved_tokens_become_control_commands() {
        assert_eq!(Command::parse("#sync"), Some(Command::Barrier));
        assert_eq!(Command::parse("#exit"), Some(Command::Terminate));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_before_classification() {
        assert_eq!(Command::parse("  #sync  "), Some(Command::Barrier));
        assert_eq!(
            Command::parse("\techo hello \n"),
            Some(Command::Ordinary("echo hello".to_string()))
        );
    }

    #[test]
    fn near_miss_tokens_stay_ordinary() {
        assert_eq!(
            Command::parse("#synchronize"),
            Some(Command::Ordinary("#synchronize".to_string()))
        );
        assert_eq!(
            Command::parse("#exit now"),
            Some(Command::Ordinary("#exit now".to_string()))
        );
    }
}
