//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/loreseek/loreseek.toml`
//! 3. Environment variables: `LORESEEK_*` prefix
//! 4. Command-line overrides (applied by the CLI layer)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::error::ApplicationError;
use crate::application::services::{DEFAULT_PAGE_SIZE, DEFAULT_RESULT_LIMIT};

/// Idle seconds before a browse session is reaped.
const DEFAULT_SESSION_IDLE_SECS: u64 = 180;

/// Unified configuration for loreseek.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory for loreseek data (default: ~/.loreseek)
    pub base_dir: PathBuf,
    /// Dataset file; defaults to `<base_dir>/wiki.json` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
    /// Results shown per paginated screen
    pub page_size: usize,
    /// Maximum composites pulled from the store per query
    pub result_limit: usize,
    /// Idle seconds before a browse session is discarded
    pub session_idle_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            dataset: None,
            page_size: DEFAULT_PAGE_SIZE,
            result_limit: DEFAULT_RESULT_LIMIT,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
        }
    }
}

/// Get the default base directory (~/.loreseek).
fn default_base_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".loreseek"))
        .unwrap_or_else(|| PathBuf::from("~/.loreseek"))
}

/// Get the XDG config directory for loreseek.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "loreseek").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("loreseek.toml"))
}

impl Settings {
    /// Effective dataset file location.
    pub fn dataset_path(&self) -> PathBuf {
        self.dataset
            .clone()
            .unwrap_or_else(|| self.base_dir.join("wiki.json"))
    }

    /// Session idle lifetime as a duration.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// Load settings with layered precedence: defaults, then the global
    /// config file, then `LORESEEK_*` environment variables.
    pub fn load() -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merged_with_file(&global_path)?;
            }
        }

        Self::apply_env_overrides(current)
    }

    fn merged_with_file(&self, path: &Path) -> Result<Self, ApplicationError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
                message: format!("read {}: {}", path.display(), e),
            })?;
        // #[serde(default)] fills unspecified fields, but from Default
        // rather than from `self`; defaults and file are the only two
        // layers below env, so that is the correct base.
        toml::from_str(&content).map_err(|e| ApplicationError::Config {
            message: format!("parse {}: {}", path.display(), e),
        })
    }

    /// Apply LORESEEK_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder()
            .add_source(Environment::with_prefix("LORESEEK").separator("__"));
        let env = builder.build().map_err(config_err)?;

        if let Ok(val) = env.get_string("base_dir") {
            settings.base_dir = PathBuf::from(val);
        }
        if let Ok(val) = env.get_string("dataset") {
            settings.dataset = Some(PathBuf::from(val));
        }
        if let Ok(val) = env.get_int("page_size") {
            settings.page_size = val.max(1) as usize;
        }
        if let Ok(val) = env.get_int("result_limit") {
            settings.result_limit = val.max(1) as usize;
        }
        if let Ok(val) = env.get_int("session_idle_secs") {
            settings.session_idle_secs = val.max(1) as u64;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# loreseek configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/loreseek/loreseek.toml
#   Env:    LORESEEK_* environment variables (explicit overrides)

# Base directory for loreseek data
# base_dir = "~/.loreseek"

# Dataset file produced by the scraper pipeline
# dataset = "~/.loreseek/wiki.json"

# Results shown per paginated screen
# page_size = 5

# Maximum results pulled from the store per query
# result_limit = 25

# Idle seconds before a browse session is discarded
# session_idle_secs = 180
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::default();
        assert!(settings.base_dir.to_string_lossy().contains(".loreseek"));
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.result_limit, DEFAULT_RESULT_LIMIT);
    }

    #[test]
    fn given_unset_dataset_when_resolving_path_then_falls_back_to_base_dir() {
        let settings = Settings {
            base_dir: PathBuf::from("/data/loreseek"),
            dataset: None,
            ..Settings::default()
        };
        assert_eq!(
            settings.dataset_path(),
            PathBuf::from("/data/loreseek/wiki.json")
        );
    }

    #[test]
    fn given_explicit_dataset_when_resolving_path_then_uses_it() {
        let settings = Settings {
            dataset: Some(PathBuf::from("/tmp/wiki.json")),
            ..Settings::default()
        };
        assert_eq!(settings.dataset_path(), PathBuf::from("/tmp/wiki.json"));
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips() {
        let settings = Settings {
            dataset: Some(PathBuf::from("/tmp/wiki.json")),
            page_size: 7,
            ..Settings::default()
        };
        let toml = settings.to_toml().expect("serialize");
        let parsed: Settings = toml::from_str(&toml).expect("parse");
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_toml_fragment_when_parsing_then_missing_fields_default() {
        let parsed: Settings = toml::from_str("page_size = 9").expect("parse");
        assert_eq!(parsed.page_size, 9);
        assert_eq!(parsed.result_limit, DEFAULT_RESULT_LIMIT);
    }
}
