// src/tests/config.rs
use figment::Jail;
use std::num::NonZeroUsize;

use crate::config_loader::{load_config, load_config_from, JournalConfig};
use crate::journal_mode::JournalMode;

#[test]
fn defaults_to_enabled_and_unbounded() {
    Jail::expect_with(|_jail| {
        let config = load_config().expect("defaults load");
        assert_eq!(config, JournalConfig::default());
        assert!(config.enabled);
        assert_eq!(config.max_entries, None);
        Ok(())
    });
}

#[test]
fn toml_file_is_read() {
    Jail::expect_with(|jail| {
        jail.create_file("journal.toml", "enabled = true\nmax_entries = 25\n")?;
        let config = load_config().expect("toml loads");
        assert_eq!(config.max_entries, Some(25));

        let journal = config.build().expect("journal builds");
        assert_eq!(journal.max_entries(), NonZeroUsize::new(25));
        Ok(())
    });
}

#[test]
fn environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("journal.toml", "enabled = true\n")?;
        jail.set_env("JOURNAL_ENABLED", "false");
        let config = load_config().expect("env loads");
        assert!(!config.enabled);
        assert_eq!(config.mode(), JournalMode::Disabled);
        Ok(())
    });
}

#[test]
fn zero_max_entries_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("JOURNAL_MAX_ENTRIES", "0");
        let err = load_config().unwrap_err();
        assert!(err.to_string().contains("max_entries"));
        Ok(())
    });
}

#[test]
fn explicit_path_is_used() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "enabled = false\nmax_entries = 3\n").expect("write config");

    Jail::expect_with(|_jail| {
        let config = load_config_from(&path).expect("custom file loads");
        assert!(!config.enabled);

        // The limit is meaningless without a journal to bound.
        let journal = config.build().expect("journal builds");
        assert_eq!(journal.mode(), JournalMode::Disabled);
        assert_eq!(journal.max_entries(), None);
        Ok(())
    });
}
