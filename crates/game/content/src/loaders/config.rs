//! Battle rules loader.

use std::path::Path;

use duel_core::DuelConfig;

use crate::loaders::{ConfigError, LoadResult, read_file};

/// Loader for battle rules from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load rules from a TOML file.
    ///
    /// Missing keys fall back to [`DuelConfig::default`].
    pub fn load(path: &Path) -> LoadResult<DuelConfig> {
        let content = read_file(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            starting_hp = config.starting_hp,
            "loaded duel rules"
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> LoadResult<DuelConfig> {
        let config: DuelConfig =
            toml::from_str(content).map_err(|e| ConfigError::parse("duel rules TOML", e))?;
        if config.starting_hp < DuelConfig::MIN_STARTING_HP {
            return Err(ConfigError::InvalidRules {
                field: "starting_hp",
                reason: "must be at least 1",
            });
        }
        Ok(config)
    }
}
