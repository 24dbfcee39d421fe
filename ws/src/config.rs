//! Configuration for wishstore

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `slot-dir`
pub const SLOT_DIR_ENV: &str = "WISHSTORE_SLOT_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding slot files
    #[serde(rename = "slot-dir")]
    pub slot_dir: PathBuf,

    /// Slot key the wishlist is stored under
    #[serde(rename = "slot-key")]
    pub slot_key: String,

    /// Currency symbol used when printing prices
    pub currency: String,
}

fn default_slot_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wishstore")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slot_dir: default_slot_dir(),
            slot_key: crate::DEFAULT_SLOT_KEY.to_string(),
            currency: "₹".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file(config_path)?;
        if let Ok(dir) = std::env::var(SLOT_DIR_ENV)
            && !dir.is_empty()
        {
            config.slot_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    fn load_file(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config, then user config
        let default_paths = [
            Some(PathBuf::from("wishstore.yml")),
            dirs::config_dir().map(|p| p.join("wishstore").join("wishstore.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                match Self::load_from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::debug!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.slot_key, "handloom.wishlist");
        assert!(config.slot_dir.ends_with("wishstore"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wishstore.yml");
        fs::write(&path, "slot-key: storefront.saved\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.slot_key, "storefront.saved");
        assert_eq!(config.currency, "₹");
    }

    #[test]
    fn test_explicit_path_must_parse() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.yml");
        fs::write(&path, "slot-key: [unterminated\n").unwrap();

        assert!(Config::load_file(Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_path_reads_all_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wishstore.yml");
        let slot_dir = temp.path().join("slots");
        fs::write(
            &path,
            format!("slot-dir: {}\nslot-key: wishlist\ncurrency: \"$\"\n", slot_dir.display()),
        )
        .unwrap();

        let loaded = Config::load_file(Some(&path)).unwrap();
        assert_eq!(
            loaded,
            Config {
                slot_dir,
                slot_key: "wishlist".to_string(),
                currency: "$".to_string(),
            }
        );
    }
}
