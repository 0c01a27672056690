//! Skill catalog loader.

use std::path::Path;

use duel_core::{SkillCatalog, SkillSpec};
use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};

use crate::loaders::{ConfigError, LoadResult, read_file};

/// Catalog shipped with the binary.
const BUILTIN_SKILLS: &str = include_str!("../../data/skills.ron");

/// Skill catalog document structure for RON and TOML files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillDocument {
    pub skills: Vec<SkillSpec>,
}

/// Loader for skill catalogs.
pub struct SkillLoader;

impl SkillLoader {
    /// Load and validate a catalog, choosing the format by file extension.
    ///
    /// # Arguments
    ///
    /// * `path` - `.ron` or `.toml` file holding a [`SkillDocument`]
    pub fn load(path: &Path) -> LoadResult<SkillCatalog> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let content = match extension.as_deref() {
            Some("ron") | Some("toml") => read_file(path)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        let catalog = if extension.as_deref() == Some("ron") {
            Self::from_ron_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        tracing::info!(path = %path.display(), skills = catalog.len(), "loaded skill catalog");
        Ok(catalog)
    }

    /// Parse a RON catalog. `Option` fields may be written without `Some(..)`.
    pub fn from_ron_str(content: &str) -> LoadResult<SkillCatalog> {
        let document: SkillDocument = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(content)
            .map_err(|e| ConfigError::parse("skill catalog RON", e))?;
        Self::build(document)
    }

    /// Parse a TOML catalog (`[[skills]]` tables).
    pub fn from_toml_str(content: &str) -> LoadResult<SkillCatalog> {
        let document: SkillDocument =
            toml::from_str(content).map_err(|e| ConfigError::parse("skill catalog TOML", e))?;
        Self::build(document)
    }

    /// The embedded default catalog.
    pub fn builtin() -> LoadResult<SkillCatalog> {
        Self::from_ron_str(BUILTIN_SKILLS)
    }

    fn build(document: SkillDocument) -> LoadResult<SkillCatalog> {
        Ok(SkillCatalog::from_specs(document.skills)?)
    }
}
