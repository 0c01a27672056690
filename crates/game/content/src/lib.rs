//! Data-driven duel content and its loaders.
//!
//! This crate turns documents into validated duel-core values:
//! - Skill catalogs (RON or TOML)
//! - Battle rules configuration (TOML)
//!
//! A built-in catalog is embedded so the runtime can start without any
//! files. Content is loaded once at startup and never appears in battle
//! state beyond skill ids.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigError, ConfigLoader, LoadResult, SkillDocument, SkillLoader};
