// Operating mode of the request journal, fixed when the journal is built

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Enabled,
    Disabled,
}

impl JournalMode {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            JournalMode::Enabled
        } else {
            JournalMode::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, JournalMode::Enabled)
    }
}

impl Default for JournalMode {
    fn default() -> Self {
        JournalMode::Enabled
    }
}

impl fmt::Display for JournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalMode::Enabled => write!(f, "enabled"),
            JournalMode::Disabled => write!(f, "disabled"),
        }
    }
}
