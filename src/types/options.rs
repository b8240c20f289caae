//! Handle configuration with TOML persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::LogResult;
use super::level::MessageLevel;
use super::DEFAULT_TIMESTAMP_FORMAT;

/// How a handle treats the file at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    /// Touch nothing until the first message is written.
    Deferred,
    /// Create the file now if it is missing; keep existing content.
    #[default]
    Create,
    /// Create the file now and discard any existing content.
    Truncate,
}

impl OpenMode {
    /// Map the classic integer open flag: `0` defers, anything else creates.
    pub fn from_flag(flag: i32) -> Self {
        if flag == 0 {
            Self::Deferred
        } else {
            Self::Create
        }
    }

    /// Parse a mode from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "deferred" => Some(Self::Deferred),
            "create" => Some(Self::Create),
            "truncate" => Some(Self::Truncate),
            _ => None,
        }
    }

    /// Return the lowercase name of this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deferred => "deferred",
            Self::Create => "create",
            Self::Truncate => "truncate",
        }
    }
}

impl From<bool> for OpenMode {
    fn from(create_now: bool) -> Self {
        if create_now {
            Self::Create
        } else {
            Self::Deferred
        }
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Options applied to a handle when it is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    /// Open-time file policy
    pub mode: OpenMode,

    /// Most verbose level written; `None` writes everything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<MessageLevel>,

    /// Prefix every record with the local time
    pub timestamps: bool,

    /// chrono format string for the timestamp prefix
    pub timestamp_format: String,

    /// Flush after every record
    pub sync_on_write: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            mode: OpenMode::Create,
            threshold: None,
            timestamps: false,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            sync_on_write: false,
        }
    }
}

impl LogOptions {
    /// Default options with the given open mode.
    pub fn with_mode(mode: OpenMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Builder-style threshold setter.
    pub fn threshold(mut self, level: MessageLevel) -> Self {
        self.threshold = Some(level);
        self
    }

    /// Builder-style timestamp toggle.
    pub fn timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Builder-style sync toggle.
    pub fn sync_on_write(mut self, enabled: bool) -> Self {
        self.sync_on_write = enabled;
        self
    }

    /// Load from TOML file
    pub fn load(path: &Path) -> LogResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save to TOML file
    pub fn save(&self, path: &Path) -> LogResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> LogResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
