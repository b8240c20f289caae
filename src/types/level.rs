//! Message severity levels.

use serde::{Deserialize, Serialize};

use crate::types::error::{LogError, LogResult};

/// Severity of a log message. Lower values are more severe.
///
/// Any integer is a valid level; the named constants cover the common
/// cases. A handle with threshold `t` writes every message whose level is
/// `<= t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageLevel(pub i32);

impl MessageLevel {
    pub const CRITICAL: Self = Self(0);
    pub const ERROR: Self = Self(1);
    pub const WARNING: Self = Self(2);
    pub const INFO: Self = Self(3);
    pub const DEBUG: Self = Self(4);

    /// The numeric value written to disk.
    pub fn value(self) -> i32 {
        self.0
    }

    /// Return the name of a well-known level, if this is one.
    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("critical"),
            1 => Some("error"),
            2 => Some("warning"),
            3 => Some("info"),
            4 => Some("debug"),
            _ => None,
        }
    }

    /// Parse a level from a name (case-insensitive) or a plain integer.
    pub fn from_name(name: &str) -> LogResult<Self> {
        let trimmed = name.trim();
        match trimmed.to_lowercase().as_str() {
            "critical" => Ok(Self::CRITICAL),
            "error" => Ok(Self::ERROR),
            "warning" | "warn" => Ok(Self::WARNING),
            "info" => Ok(Self::INFO),
            "debug" => Ok(Self::DEBUG),
            other => other
                .parse::<i32>()
                .map(Self)
                .map_err(|_| LogError::InvalidLevel(trimmed.to_string())),
        }
    }

    /// Whether a message at this level passes `threshold`.
    pub fn passes(self, threshold: Option<MessageLevel>) -> bool {
        threshold.map_or(true, |t| self <= t)
    }
}

impl From<i32> for MessageLevel {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<log::Level> for MessageLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::ERROR,
            log::Level::Warn => Self::WARNING,
            log::Level::Info => Self::INFO,
            log::Level::Debug => Self::DEBUG,
            log::Level::Trace => Self(5),
        }
    }
}

impl std::fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MessageLevel {
    type Err = LogError;

    fn from_str(s: &str) -> LogResult<Self> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_integers_parse() {
        assert_eq!(MessageLevel::from_name("ERROR").unwrap(), MessageLevel::ERROR);
        assert_eq!(MessageLevel::from_name(" warn ").unwrap(), MessageLevel::WARNING);
        assert_eq!(MessageLevel::from_name("17").unwrap(), MessageLevel(17));
        assert_eq!(MessageLevel::from_name("-1").unwrap(), MessageLevel(-1));
        assert!(matches!(
            MessageLevel::from_name("loud"),
            Err(LogError::InvalidLevel(s)) if s == "loud"
        ));
    }

    #[test]
    fn threshold_is_inclusive() {
        let t = Some(MessageLevel::WARNING);
        assert!(MessageLevel::CRITICAL.passes(t));
        assert!(MessageLevel::WARNING.passes(t));
        assert!(!MessageLevel::INFO.passes(t));
        assert!(MessageLevel(99).passes(None));
    }

    #[test]
    fn log_levels_map_in_order() {
        let mapped: Vec<MessageLevel> = [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace,
        ]
        .into_iter()
        .map(MessageLevel::from)
        .collect();
        assert!(mapped.windows(2).all(|w| w[0] < w[1]));
    }
}
