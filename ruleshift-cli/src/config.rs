//! Settings loaded with figment
//!
//! Sources are merged in precedence order, later ones overriding earlier:
//! 1. Built-in defaults
//! 2. The `--config` file, or `.ruleshift.toml`, `.ruleshift.yaml` and
//!    `.ruleshift.yml` found in the working directory
//! 3. `RULESHIFT_*` environment variables

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use ruleshift::batch::{DEFAULT_CURSOR_EXTENSION, DEFAULT_WINDSURF_EXTENSION};
use ruleshift::Extensions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Prefix of environment variables that override settings
pub const ENV_PREFIX: &str = "RULESHIFT_";

/// Settings files looked for in the working directory, lowest precedence first
pub const CONFIG_FILE_NAMES: [&str; 3] = [".ruleshift.toml", ".ruleshift.yaml", ".ruleshift.yml"];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file named by `--config` does not exist
    #[error("configuration file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// The file named by `--config` has an extension we cannot read
    #[error("unsupported configuration file format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// A source could not be parsed into settings
    #[error("failed to parse configuration: {0}")]
    Parse(#[source] Box<figment::Error>),

    /// A setting has an unusable value
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Parse(Box::new(error))
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings shared by all commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Extension of Cursor rule files
    pub cursor_extension: String,
    /// Extension of Windsurf rule files
    pub windsurf_extension: String,
    /// Replace existing outputs in batch mode
    pub overwrite: bool,
    /// Stop batch mode at the first failure
    pub fail_fast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cursor_extension: DEFAULT_CURSOR_EXTENSION.to_string(),
            windsurf_extension: DEFAULT_WINDSURF_EXTENSION.to_string(),
            overwrite: false,
            fail_fast: false,
        }
    }
}

impl Settings {
    /// Load settings using the current directory for discovery
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_from(&cwd, explicit)
    }

    /// Load settings, discovering config files in `dir` unless `explicit` is given
    pub fn load_from(dir: &Path, explicit: Option<&Path>) -> ConfigResult<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(config_files(dir, explicit)?)
            .merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()));

        let settings: Settings = figment.extract()?;
        let settings = settings.normalized()?;
        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    /// File extensions to hand to the batch driver
    pub fn extensions(&self) -> Extensions {
        Extensions {
            cursor: self.cursor_extension.clone(),
            windsurf: self.windsurf_extension.clone(),
        }
    }

    fn normalized(mut self) -> ConfigResult<Self> {
        self.cursor_extension = normalize_extension("cursor_extension", &self.cursor_extension)?;
        self.windsurf_extension =
            normalize_extension("windsurf_extension", &self.windsurf_extension)?;
        Ok(self)
    }
}

fn config_files(dir: &Path, explicit: Option<&Path>) -> ConfigResult<Figment> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        trace!(path = %path.display(), "Loading explicit config file");
        return config_file(path);
    }

    let mut figment = Figment::new();
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if path.is_file() {
            trace!(path = %path.display(), "Loading discovered config file");
            figment = figment.merge(config_file(&path)?);
        }
    }
    Ok(figment)
}

fn config_file(path: &Path) -> ConfigResult<Figment> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("toml") => Ok(Figment::from(Toml::file(path))),
        Some("yaml") | Some("yml") => Ok(Figment::from(Yaml::file(path))),
        Some("json") => Ok(Figment::from(Json::file(path))),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn normalize_extension(key: &str, value: &str) -> ConfigResult<String> {
    let extension = value.trim().trim_start_matches('.');
    if extension.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "extension must not be empty".to_string(),
        });
    }
    Ok(extension.to_string())
}
