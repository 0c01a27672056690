//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Which repository backs the runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageKind {
    /// One JSON document per battle under the data directory.
    #[default]
    File,
    /// Process-local; battles are lost on exit.
    Memory,
}

impl FromStr for StorageKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" | "mem" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Configuration required to bootstrap the runtime and the driver.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Skill catalog file (RON or TOML). `None` uses the embedded catalog.
    pub skills_path: Option<PathBuf>,
    /// Battle rules file (TOML). `None` uses the built-in defaults.
    pub rules_path: Option<PathBuf>,
    /// Directory holding one file per battle.
    pub data_dir: PathBuf,
    pub storage: StorageKind,
    /// Enables the file log layer when set.
    pub log_dir: Option<PathBuf>,
    pub event_buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            skills_path: None,
            rules_path: None,
            data_dir: default_data_dir(),
            storage: StorageKind::default(),
            log_dir: None,
            event_buffer_size: 100,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DUEL_SKILLS_PATH` - Skill catalog file (default: embedded catalog)
    /// - `DUEL_RULES_PATH` - Battle rules TOML (default: built-in rules)
    /// - `DUEL_DATA_DIR` - Battle storage directory (default: platform data dir)
    /// - `DUEL_STORAGE` - `file` or `memory` (default: file)
    /// - `DUEL_LOG_DIR` - Also write logs to `duel.log` in this directory
    /// - `DUEL_EVENT_BUFFER` - Event channel capacity (default: 100)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let path = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };

        config.skills_path = path("DUEL_SKILLS_PATH");
        config.rules_path = path("DUEL_RULES_PATH");
        config.log_dir = path("DUEL_LOG_DIR");
        if let Some(dir) = path("DUEL_DATA_DIR") {
            config.data_dir = dir;
        }

        if let Some(storage) = lookup("DUEL_STORAGE").and_then(|v| v.parse().ok()) {
            config.storage = storage;
        }

        let event_buffer = lookup("DUEL_EVENT_BUFFER").and_then(|v| v.trim().parse::<usize>().ok());
        if let Some(capacity) = event_buffer {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }
}

/// Platform data directory for battles.
///
/// - Linux: `~/.local/share/duel/battles` (or `$XDG_DATA_HOME/duel/battles`)
/// - macOS: `~/Library/Application Support/duel/battles`
/// - Fallback: `./duel_data/battles`
fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "duel")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./duel_data"))
        .join("battles")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config_from(&[]);
        assert_eq!(config.storage, StorageKind::File);
        assert!(config.skills_path.is_none());
        assert!(config.log_dir.is_none());
        assert_eq!(config.event_buffer_size, 100);
        assert!(config.data_dir.ends_with("battles"));
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("DUEL_SKILLS_PATH", "/etc/duel/skills.ron"),
            ("DUEL_DATA_DIR", "/var/lib/duel"),
            ("DUEL_STORAGE", "Memory"),
            ("DUEL_EVENT_BUFFER", "0"),
        ]);
        assert_eq!(
            config.skills_path.as_deref(),
            Some(std::path::Path::new("/etc/duel/skills.ron"))
        );
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/duel"));
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.event_buffer_size, 1);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config_from(&[
            ("DUEL_STORAGE", "postgres"),
            ("DUEL_EVENT_BUFFER", "many"),
            ("DUEL_LOG_DIR", "  "),
        ]);
        assert_eq!(config.storage, StorageKind::File);
        assert_eq!(config.event_buffer_size, 100);
        assert!(config.log_dir.is_none());
    }
}
