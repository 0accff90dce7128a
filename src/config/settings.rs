use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::platform::tools::ToolPaths;

/// Location of the optional configuration file
pub const CONFIG_PATH: &str = "/etc/ramify/config.toml";

/// Directory holding `<server>.tar` archives
pub const DEFAULT_ARCHIVE_ROOT: &str = "/var/lib/ramify/archives";

/// Directory holding per-server tmpfs mount points
pub const DEFAULT_MOUNT_ROOT: &str = "/run/ramify";

/// Account that owns mounted trees and archives
pub const DEFAULT_OWNER: &str = "ramify";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {}", .path.display(), .source.message())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Process-wide configuration, built once at startup and never mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root directory of the durable archives
    pub archive_root: PathBuf,
    /// Root directory of the tmpfs mount points
    pub mount_root: PathBuf,
    /// Service account given user and group ownership
    pub owner: String,
    /// Configured paths for external tools (mount, umount, chown)
    pub tool_paths: ToolPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_root: PathBuf::from(DEFAULT_ARCHIVE_ROOT),
            mount_root: PathBuf::from(DEFAULT_MOUNT_ROOT),
            owner: DEFAULT_OWNER.to_string(),
            tool_paths: ToolPaths::default(),
        }
    }
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub archive_root: Option<PathBuf>,
    pub mount_root: Option<PathBuf>,
    pub owner: Option<String>,
    /// Tool path configuration
    pub tools: Option<ToolPaths>,
}

impl Config {
    /// Load configuration from the fixed config location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    /// Load configuration from `path`, falling back to defaults when it is absent
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let toml_config =
            toml::from_str::<TomlConfig>(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let config = Self::default().merge(toml_config);
        tracing::debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    /// Overlay the values present in a parsed file on top of `self`
    fn merge(mut self, toml_config: TomlConfig) -> Self {
        if let Some(archive_root) = toml_config.archive_root {
            self.archive_root = archive_root;
        }
        if let Some(mount_root) = toml_config.mount_root {
            self.mount_root = mount_root;
        }
        if let Some(owner) = toml_config.owner {
            self.owner = owner;
        }
        if let Some(tools) = toml_config.tools {
            self.tool_paths = tools;
        }
        self
    }

    pub fn with_archive_root(mut self, dir: PathBuf) -> Self {
        self.archive_root = dir;
        self
    }

    pub fn with_mount_root(mut self, dir: PathBuf) -> Self {
        self.mount_root = dir;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }
}
