//! `config.json` loading.

use log::{debug, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// Project configuration owned by the external project.
///
/// Unknown fields are ignored so projects can carry their own settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgentsConfig {
    /// Allow-list of tag names; `None` when the key is absent.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Script auto-update opt-out; either `true` or a list of file names.
    /// Carried for completeness; the core does not sync scripts.
    #[serde(default, rename = "disableAutoUpdateScripts")]
    pub disable_auto_update_scripts: Option<serde_json::Value>,
}

impl AgentsConfig {
    /// Declared allow-list; empty when the key is absent.
    pub fn allowed_tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Whether the file declares a `tags` key at all, even an empty one.
    pub fn declares_tags(&self) -> bool {
        self.tags.is_some()
    }

    /// Whether `tag` is in the allow-list (exact, case-sensitive match).
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags().iter().any(|allowed| allowed == tag)
    }
}

/// Configuration load failures.
#[derive(Debug)]
pub enum ConfigError {
    Missing(PathBuf),
    Io { path: PathBuf, source: io::Error },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "config not found: {}", path.display()),
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "cannot parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Missing(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Loads and parses `config.json` at `path`.
///
/// # Errors
/// - `Missing` when the file does not exist.
/// - `Io` when it exists but cannot be read.
/// - `Parse` when it is not a JSON object of the expected shape.
pub fn load_config(path: &Path) -> Result<AgentsConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::Missing(path.to_path_buf()))
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads config, mapping every failure to `None`.
///
/// Used where missing configuration means "no constraints configured".
pub fn load_config_or_default(path: &Path) -> Option<AgentsConfig> {
    match load_config(path) {
        Ok(config) => {
            debug!(
                "event=config_load module=project status=ok allowed_tags={}",
                config.allowed_tags().len()
            );
            Some(config)
        }
        Err(ConfigError::Missing(_)) => {
            debug!("event=config_load module=project status=missing");
            None
        }
        Err(err) => {
            warn!("event=config_load module=project status=error error={err}");
            None
        }
    }
}
