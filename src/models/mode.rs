use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Error returned when a driver passes an unknown operator or mode name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {kind} mode '{value}', expected one of: {expected}")]
pub struct ParseModeError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl ParseModeError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

/// How a demand's traffic may be distributed over its candidate paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingMode {
    /// Every demand is carried entirely by one path.
    SinglePath,
    /// Traffic may be split across paths in any proportion.
    Splitting,
}

impl RoutingMode {
    pub fn is_single_path(&self) -> bool {
        matches!(self, RoutingMode::SinglePath)
    }
}

impl FromStr for RoutingMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-path" | "single" => Ok(Self::SinglePath),
            "splitting" | "multi" => Ok(Self::Splitting),
            _ => Err(ParseModeError::new("routing", s, "single-path, splitting")),
        }
    }
}
