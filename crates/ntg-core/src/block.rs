//! State blocks and moves

use crate::error::{ContestantError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lines describing the game state, received between two `STATE END` markers
///
/// Line order is significant and preserved exactly. The sentinel itself is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateBlock {
    lines: Vec<String>,
}

impl StateBlock {
    /// Create an empty block
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a block from already-split lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one line at the end of the block
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// An empty block is a valid query, not an error
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Block as a single text payload, each line terminated by `\n`
    ///
    /// Used when the engine receives the state as one command-line argument.
    pub fn to_payload(&self) -> String {
        let mut payload = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            payload.push_str(line);
            payload.push('\n');
        }
        payload
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// The engine's chosen action for one state block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Move(String);

impl Move {
    /// Validate a raw engine reply
    ///
    /// Trailing whitespace (including the line terminator) is trimmed. The result must be
    /// non-empty and fit on a single line.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim_end();
        if trimmed.is_empty() {
            return Err(ContestantError::EngineCommunication(
                "engine replied with an empty move".into(),
            ));
        }
        if trimmed.contains(['\n', '\r']) {
            return Err(ContestantError::EngineCommunication(format!(
                "engine reply spans multiple lines: {:?}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Move {
    type Error = ContestantError;

    fn try_from(value: String) -> Result<Self> {
        Move::parse(&value)
    }
}

impl From<Move> for String {
    fn from(mv: Move) -> Self {
        mv.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_terminates_every_line() {
        let block = StateBlock::from_lines(["ADDING", "1 -4 Red 3"]);
        assert_eq!(block.to_payload(), "ADDING\n1 -4 Red 3\n");
        assert_eq!(StateBlock::new().to_payload(), "");
    }

    #[test]
    fn test_push_preserves_order() {
        let mut block = StateBlock::new();
        block.push("B");
        block.push("A");
        block.push("");
        assert_eq!(block.lines(), &["B", "A", ""]);
        assert_eq!(block.len(), 3);
    }

    #[test]
    fn test_move_trims_trailing_whitespace() {
        let mv = Move::parse("-4 3 \r\n").unwrap();
        assert_eq!(mv.as_str(), "-4 3");
        // Leading whitespace is part of the move
        assert_eq!(Move::parse("  7 1\n").unwrap().as_str(), "  7 1");
    }

    #[test]
    fn test_move_rejects_empty_reply() {
        assert!(matches!(
            Move::parse(" \t\n"),
            Err(ContestantError::EngineCommunication(_))
        ));
    }

    #[test]
    fn test_move_rejects_multiline_reply() {
        assert!(Move::parse("1 2\n3 4\n").is_err());
    }

    #[test]
    fn test_move_serde() {
        let mv: Move = serde_json::from_str("\"-2 5\"").unwrap();
        assert_eq!(mv.to_string(), "-2 5");
        assert!(serde_json::from_str::<Move>("\"\"").is_err());
    }
}
