//! `trestle config`: read and write configuration values.

use std::path::{Path, PathBuf};

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::Set { key, value } => {
            let path = target_file(global.config);
            set_config_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
                return Ok(());
            }
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            // Printed even in quiet mode; scripts capture it.
            println!("{}", target_file(global.config).display());
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// `--config` if given, else whichever file `AppConfig::load` would read.
fn target_file(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(AppConfig::active_path)
}

fn ensure_known(key: &str) -> CliResult<()> {
    if AppConfig::keys().iter().any(|k| k == key) {
        Ok(())
    } else {
        Err(CliError::UnknownConfigKey { key: key.into() })
    }
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    ensure_known(key)?;
    Ok(config.get(key).unwrap_or_else(|| "(unset)".into()))
}

/// Update one dotted key in the TOML file at `path`, creating it if absent.
///
/// The edited document must still deserialize into [`AppConfig`], so a
/// mistyped value never reaches disk.
fn set_config_value(path: &Path, key: &str, value: &str) -> CliResult<()> {
    ensure_known(key)?;

    let mut document: toml::Table = if path.is_file() {
        let text = std::fs::read_to_string(path).map_err(|e| CliError::IoError {
            message: format!("Failed to read '{}'", path.display()),
            source: e,
        })?;
        text.parse::<toml::Table>().map_err(|e| CliError::ConfigError {
            message: format!("'{}' is not valid TOML: {e}", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    let Some((section, field)) = key.split_once('.') else {
        return Err(CliError::UnknownConfigKey { key: key.into() });
    };
    let table = document
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let Some(table) = table.as_table_mut() else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' in '{}' is not a table", path.display()),
            source: None,
        });
    };
    table.insert(field.to_string(), parse_value(value));

    let text = toml::to_string_pretty(&document).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    toml::from_str::<AppConfig>(&text).map_err(|e| CliError::ConfigError {
        message: format!("invalid value '{value}' for {key}"),
        source: Some(Box::new(e)),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CliError::IoError {
            message: format!("Failed to create config directory '{}'", parent.display()),
            source: e,
        })?;
    }
    std::fs::write(path, text).map_err(|e| CliError::IoError {
        message: format!("Failed to write config to '{}'", path.display()),
        source: e,
    })
}

fn parse_value(raw: &str) -> toml::Value {
    match raw {
        "true" => toml::Value::Boolean(true),
        "false" => toml::Value::Boolean(false),
        other => toml::Value::String(other.to_string()),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(
            get_config_value(&cfg, "defaults.database").unwrap(),
            "postgresql"
        );
    }

    #[test]
    fn get_unset_optional_key() {
        let cfg = AppConfig::default();
        assert_eq!(
            get_config_value(&cfg, "defaults.css_framework").unwrap(),
            "(unset)"
        );
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::UnknownConfigKey { .. })
        ));
    }

    #[test]
    fn set_creates_file_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        set_config_value(&path, "defaults.database", "mysql").unwrap();
        set_config_value(&path, "defaults.skip_git", "true").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.database, "mysql");
        assert!(cfg.defaults.skip_git);
    }

    #[test]
    fn set_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nno_color = true\n").unwrap();

        set_config_value(&path, "defaults.css_framework", "bootstrap").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert!(cfg.output.no_color);
        assert_eq!(cfg.defaults.css_framework.as_deref(), Some("bootstrap"));
    }

    #[test]
    fn set_rejects_mistyped_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let err = set_config_value(&path, "output.no_color", "sometimes").unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn set_rejects_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(matches!(
            set_config_value(&path, "defaults.lang", "rust"),
            Err(CliError::UnknownConfigKey { .. })
        ));
    }
}
