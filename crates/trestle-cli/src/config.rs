//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `TRESTLE_` environment variables, `__` between sections
//!    (`TRESTLE_DEFAULTS__DATABASE=mysql`)
//! 3. Config file (`--config`, else `./.trestle.toml`, else the user config
//!    directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".trestle.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
}

/// Values used by `trestle new` when the matching flag is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub database: String,
    pub css_framework: Option<String>,
    pub skip_deploy: bool,
    pub deploy_flags: String,
    pub skip_git: bool,
    pub webpack: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            database: "postgresql".into(),
            css_framework: None,
            skip_deploy: false,
            deploy_flags: String::new(),
            skip_git: false,
            webpack: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory whose bodies override the built-in templates.
    pub local_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::active_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        let config = Config::builder()
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix("TRESTLE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        config
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Path to the user-level configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.trestle.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "trestle", "trestle")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file `load(None)` reads: a local `.trestle.toml` wins over the
    /// user-level file.
    pub fn active_path() -> PathBuf {
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.is_file() {
            local.to_path_buf()
        } else {
            Self::config_path()
        }
    }

    /// Look up a dotted key, e.g. `defaults.database`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = toml::Value::try_from(self).ok()?;
        let mut current = &value;
        for part in key.split('.') {
            current = current.as_table()?.get(part)?;
        }
        Some(match current {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Known dotted keys, in file order.
    pub fn keys() -> Vec<String> {
        let Ok(toml::Value::Table(root)) = toml::Value::try_from(Self::default()) else {
            return Vec::new();
        };
        let mut keys = Vec::new();
        for (section, value) in &root {
            if let toml::Value::Table(table) = value {
                keys.extend(table.keys().map(|k| format!("{section}.{k}")));
            }
        }
        // Optional fields are skipped when `None`.
        for optional in ["defaults.css_framework", "templates.local_path"] {
            if !keys.iter().any(|k| k == optional) {
                keys.push(optional.to_string());
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_database_is_postgresql() {
        assert_eq!(AppConfig::default().defaults.database, "postgresql");
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\ndatabase = \"mysql\"\nskip_git = true\n\n[templates]\nlocal_path = \"/tmp/t\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.database, "mysql");
        assert!(cfg.defaults.skip_git);
        assert!(!cfg.defaults.webpack);
        assert_eq!(cfg.templates.local_path, Some(PathBuf::from("/tmp/t")));
    }

    #[test]
    fn dotted_get() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("defaults.database").as_deref(), Some("postgresql"));
        assert_eq!(cfg.get("output.no_color").as_deref(), Some("false"));
        assert_eq!(cfg.get("does.not.exist"), None);
    }

    #[test]
    fn keys_include_optional_fields() {
        let keys = AppConfig::keys();
        assert!(keys.contains(&"defaults.database".to_string()));
        assert!(keys.contains(&"templates.local_path".to_string()));
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
