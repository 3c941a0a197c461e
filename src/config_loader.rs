use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

use crate::errors::{JournalError, JournalResult};
use crate::journal_mode::JournalMode;
use crate::request_journal::RequestJournal;

/// Journal settings read once at server startup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JournalConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Absent means unbounded
    #[serde(default)]
    pub max_entries: Option<usize>,
}

fn default_enabled() -> bool {
    true
}

impl Default for JournalConfig {
    fn default() -> Self {
        JournalConfig {
            enabled: default_enabled(),
            max_entries: None,
        }
    }
}

impl JournalConfig {
    pub fn mode(&self) -> JournalMode {
        JournalMode::from_enabled(self.enabled)
    }

    pub fn validate(&self) -> JournalResult<()> {
        if self.max_entries == Some(0) {
            return Err(JournalError::config("max_entries must be a positive integer"));
        }
        Ok(())
    }

    /// Builds the journal. The entry limit only applies when enabled.
    pub fn build(&self) -> JournalResult<RequestJournal> {
        self.validate()?;
        let max_entries = if self.enabled {
            self.max_entries.and_then(NonZeroUsize::new)
        } else {
            None
        };
        Ok(RequestJournal::new(self.mode(), max_entries))
    }
}

fn base_figment() -> Figment {
    Figment::from(Serialized::defaults(JournalConfig::default()))
}

fn extract(figment: Figment) -> JournalResult<JournalConfig> {
    let config: JournalConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Defaults, then `journal.toml`, then `JOURNAL_*` environment variables
pub fn load_config() -> JournalResult<JournalConfig> {
    extract(
        base_figment()
            .merge(Toml::file("journal.toml"))
            .merge(Env::prefixed("JOURNAL_")),
    )
}

/// Defaults, then the given TOML file, then `JOURNAL_*` environment variables
pub fn load_config_from<P: AsRef<Path>>(path: P) -> JournalResult<JournalConfig> {
    extract(
        base_figment()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("JOURNAL_")),
    )
}
