use std::path::{Component, Path, PathBuf};
use anyhow::{bail, Result, Context};
use log::{debug, info};
use serde::{Serialize, Deserialize};

use crate::store::grammar::LoadMode;
use crate::store::layout::StoreLayout;
use crate::utils::file_utils;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "school.toml";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "SCHOOL_DATA_DIR";

/// Environment variable overriding the classes directory
pub const CLASSES_DIR_ENV: &str = "SCHOOL_CLASSES_DIR";

/// Store configuration, read from TOML and the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the canonical store and the subject files
    pub data_dir: PathBuf,

    /// Directory holding one file per class
    pub classes_dir: PathBuf,

    /// Optional banner written as the first line of every generated file
    pub header: Option<String>,

    /// Fail on malformed store lines instead of skipping them
    pub strict_load: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("dados_escolares"),
            classes_dir: PathBuf::from("turmas"),
            header: None,
            strict_load: false,
        }
    }
}

impl StoreConfig {
    /// Load configuration from an explicit file, or from `school.toml` if present,
    /// then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        let config = config.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading config from {}", path.display());

        let content = file_utils::read_file_to_string(path)?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The classes directory is swept for stale files, so it must not be the data directory
    pub fn validate(&self) -> Result<()> {
        if same_dir(&self.data_dir, &self.classes_dir) {
            bail!(
                "data_dir and classes_dir must be different directories, both resolve to {}",
                self.data_dir.display()
            );
        }
        Ok(())
    }

    /// Apply directory overrides from a variable lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|dir| !dir.trim().is_empty()) {
            debug!("{} overrides data directory: {}", DATA_DIR_ENV, dir);
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(CLASSES_DIR_ENV).filter(|dir| !dir.trim().is_empty()) {
            debug!("{} overrides classes directory: {}", CLASSES_DIR_ENV, dir);
            self.classes_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn layout(&self) -> StoreLayout {
        StoreLayout::new(&self.data_dir, &self.classes_dir)
    }

    pub fn load_mode(&self) -> LoadMode {
        if self.strict_load {
            LoadMode::Strict
        } else {
            LoadMode::Lenient
        }
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (a.canonicalize(), b.canonicalize()) {
        return a == b;
    }
    lexical_components(a) == lexical_components(b)
}

fn lexical_components(path: &Path) -> Vec<Component<'_>> {
    path.components().filter(|c| !matches!(c, Component::CurDir)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_falls_back_to_defaults() -> Result<()> {
        let config = StoreConfig::from_toml_str("header = \"Escola Modelo\"\nstrict_load = true\n")?;

        assert_eq!(config.data_dir, PathBuf::from("dados_escolares"));
        assert_eq!(config.classes_dir, PathBuf::from("turmas"));
        assert_eq!(config.header.as_deref(), Some("Escola Modelo"));
        assert_eq!(config.load_mode(), LoadMode::Strict);
        Ok(())
    }

    #[test]
    fn test_env_overrides_directories() {
        let config = StoreConfig::default().with_overrides(|key| match key {
            DATA_DIR_ENV => Some("/srv/school/data".to_string()),
            CLASSES_DIR_ENV => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.data_dir, PathBuf::from("/srv/school/data"));
        assert_eq!(config.classes_dir, PathBuf::from("turmas"));
    }

    #[test]
    fn test_shared_directory_is_rejected() {
        assert!(StoreConfig::from_toml_str("data_dir = \"shared\"\nclasses_dir = \"./shared/\"\n").is_err());
        assert!(StoreConfig::from_toml_str("data_dir = \"shared\"\nclasses_dir = \"shared/turmas\"\n").is_ok());

        let config = StoreConfig::default().with_overrides(|key| match key {
            DATA_DIR_ENV | CLASSES_DIR_ENV => Some("/srv/school".to_string()),
            _ => None,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_field_types_are_rejected() {
        assert!(StoreConfig::from_toml_str("strict_load = \"yes\"").is_err());
    }
}
