//! # Settings
//!
//! Where the file server lives and where exports go.
//!
//! Resolution order, last wins:
//! 1. Built-in defaults
//! 2. `.env` file in the working directory (loaded into the environment by `main`)
//! 3. Environment variables
//! 4. CLI flags (`--root`, `--config`)

use assetflow_core::{LifecycleConfig, LifecycleError};
use std::path::{Path, PathBuf};

// =============================================================================
// ENVIRONMENT KEYS
// =============================================================================

pub const ENV_FILESERVER_ROOT: &str = "FILESERVER_ROOT";
pub const ENV_ASSETS_DIR: &str = "ASSETS_DIR";
pub const ENV_TEMPLATES_DIR: &str = "TEMPLATES_DIR";
pub const ENV_EXPORT_DIR: &str = "DEFAULT_EXPORT_DIR";
pub const ENV_CONFIG: &str = "ASSETFLOW_CONFIG";
pub const ENV_SCAFFOLD_SCRIPT: &str = "ASSETFLOW_SCAFFOLD_SCRIPT";

/// Name of the template tree copied into new assets.
pub const ASSET_TEMPLATE_NAME: &str = "ASSET_LIFECYCLE_TEMPLATE";

// =============================================================================
// SETTINGS
// =============================================================================

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of the asset-management share.
    pub fileserver_root: PathBuf,
    /// Assets folder, relative to the root.
    pub assets_dir: String,
    /// Templates folder, relative to the root.
    pub templates_dir: String,
    /// Export folder; relative paths resolve against the root.
    pub export_dir: PathBuf,
    /// Optional lifecycle configuration file (TOML).
    pub config_path: Option<PathBuf>,
    /// Optional external scaffold script for new assets.
    pub scaffold_script: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fileserver_root: PathBuf::from("."),
            assets_dir: "ASSETS".to_string(),
            templates_dir: "TEMPLATES".to_string(),
            export_dir: PathBuf::from("reports"),
            config_path: None,
            scaffold_script: None,
        }
    }
}

impl Settings {
    /// Settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            fileserver_root: get(ENV_FILESERVER_ROOT)
                .map(PathBuf::from)
                .unwrap_or(defaults.fileserver_root),
            assets_dir: get(ENV_ASSETS_DIR).unwrap_or(defaults.assets_dir),
            templates_dir: get(ENV_TEMPLATES_DIR).unwrap_or(defaults.templates_dir),
            export_dir: get(ENV_EXPORT_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            config_path: get(ENV_CONFIG).map(PathBuf::from),
            scaffold_script: get(ENV_SCAFFOLD_SCRIPT).map(PathBuf::from),
        }
    }

    /// Apply CLI flag overrides.
    #[must_use]
    pub fn with_overrides(mut self, root: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.fileserver_root = root;
        }
        if let Some(config) = config {
            self.config_path = Some(config);
        }
        self
    }

    #[must_use]
    pub fn assets_path(&self) -> PathBuf {
        self.fileserver_root.join(&self.assets_dir)
    }

    #[must_use]
    pub fn templates_path(&self) -> PathBuf {
        self.fileserver_root.join(&self.templates_dir)
    }

    /// The template tree for new assets.
    #[must_use]
    pub fn asset_template_path(&self) -> PathBuf {
        self.templates_path().join(ASSET_TEMPLATE_NAME)
    }

    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        resolve(&self.fileserver_root, &self.export_dir)
    }

    /// Load the lifecycle configuration, or the built-in one when no file is set.
    pub fn lifecycle_config(&self) -> Result<LifecycleConfig, LifecycleError> {
        match &self.config_path {
            Some(path) => {
                tracing::debug!("Loading lifecycle config from {}", path.display());
                LifecycleConfig::load(path)
            }
            None => Ok(LifecycleConfig::default()),
        }
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.assets_path(), PathBuf::from("./ASSETS"));
    }

    #[test]
    fn empty_values_are_unset() {
        let settings = Settings::from_lookup(lookup(&[(ENV_ASSETS_DIR, "  ")]));
        assert_eq!(settings.assets_dir, "ASSETS");
    }

    #[test]
    fn absolute_export_dir_kept() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_FILESERVER_ROOT, "/srv/share"),
            (ENV_EXPORT_DIR, "/tmp/out"),
        ]));
        assert_eq!(settings.export_path(), PathBuf::from("/tmp/out"));
    }
}
