//! # Hex Command Payloads

use std::fmt;
use serde::{Deserialize, Deserializer, Serialize};
use crate::errors::GarageDoorError;

/// An opaque IR/RF payload handed to the command transport.
///
/// Stored as lowercase hex digits with whitespace removed; always non-empty and of even length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HexCommand(String);

impl HexCommand {
    pub fn new(raw: &str) -> Result<Self, GarageDoorError> {
        let hex: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

        if hex.is_empty() {
            return Err(GarageDoorError::InvalidCommand("empty hex payload".to_string()));
        }
        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(GarageDoorError::InvalidCommand(format!("non-hex character '{}' in payload", bad)));
        }
        if hex.len() % 2 != 0 {
            return Err(GarageDoorError::InvalidCommand(format!("odd payload length {}", hex.len())));
        }

        Ok(Self(hex.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of bytes the payload decodes to.
    pub fn byte_len(&self) -> usize {
        self.0.len() / 2
    }
}

impl fmt::Display for HexCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() > 16 {
            write!(f, "{}… ({} bytes)", &self.0[..16], self.byte_len())
        } else {
            f.write_str(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for HexCommand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        HexCommand::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace_and_case() {
        let cmd = HexCommand::new("26 00 AB\n0c").unwrap();
        assert_eq!(cmd.as_str(), "2600ab0c");
        assert_eq!(cmd.byte_len(), 4);
    }

    #[test]
    fn rejects_bad_payloads() {
        assert!(matches!(HexCommand::new(""), Err(GarageDoorError::InvalidCommand(_))));
        assert!(matches!(HexCommand::new("abc"), Err(GarageDoorError::InvalidCommand(_))));
        assert!(matches!(HexCommand::new("zz00"), Err(GarageDoorError::InvalidCommand(_))));
    }

    #[test]
    fn display_truncates_long_payloads() {
        let cmd = HexCommand::new(&"ab".repeat(20)).unwrap();
        assert_eq!(cmd.to_string(), format!("{}… (20 bytes)", "ab".repeat(8)));
    }
}
