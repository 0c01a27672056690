//! Content loaders for reading duel data from files.

pub mod config;
pub mod skills;

pub use config::ConfigLoader;
pub use skills::{SkillDocument, SkillLoader};

use std::path::{Path, PathBuf};

use duel_core::CatalogError;

/// Errors raised while loading content documents.
///
/// Any of these at startup means the process must not serve battles.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    #[error("invalid duel rules: {field} {reason}")]
    InvalidRules {
        field: &'static str,
        reason: &'static str,
    },

    #[error("invalid skill catalog: {0}")]
    Invalid(#[from] CatalogError),

    #[error("unsupported content format for {0} (expected .ron or .toml)")]
    UnsupportedFormat(PathBuf),
}

impl ConfigError {
    pub(crate) fn parse(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            what: what.into(),
            message: err.to_string(),
        }
    }
}

/// Common result type for loaders.
pub type LoadResult<T> = Result<T, ConfigError>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
