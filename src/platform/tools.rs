//! Resolution of the external binaries behind [`SystemPlatform`](super::SystemPlatform)
//!
//! A path configured in the config file wins; otherwise the binary is looked
//! up in PATH with `which`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::PlatformError;

/// External tools ramify shells out to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Mounts the tmpfs
    Mount,
    /// Releases the tmpfs
    Umount,
    /// Fixes ownership after extract and pack
    Chown,
}

impl Tool {
    /// Get the binary name for this tool
    pub fn binary_name(&self) -> &'static str {
        match self {
            Tool::Mount => "mount",
            Tool::Umount => "umount",
            Tool::Chown => "chown",
        }
    }
}

/// Configuration for tool paths from config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolPaths {
    pub mount: Option<PathBuf>,
    pub umount: Option<PathBuf>,
    pub chown: Option<PathBuf>,
}

impl ToolPaths {
    /// Get the configured path for a tool
    pub fn get(&self, tool: Tool) -> Option<&PathBuf> {
        match tool {
            Tool::Mount => self.mount.as_ref(),
            Tool::Umount => self.umount.as_ref(),
            Tool::Chown => self.chown.as_ref(),
        }
    }

    /// Set the path for a tool
    pub fn set(&mut self, tool: Tool, path: PathBuf) {
        match tool {
            Tool::Mount => self.mount = Some(path),
            Tool::Umount => self.umount = Some(path),
            Tool::Chown => self.chown = Some(path),
        }
    }

    /// Resolve the binary to execute for `tool`
    pub fn resolve(&self, tool: Tool) -> Result<PathBuf, PlatformError> {
        if let Some(path) = self.get(tool) {
            return if is_valid_executable(path) {
                Ok(path.clone())
            } else {
                Err(PlatformError::ToolUnavailable {
                    tool,
                    reason: format!("configured path {} is not executable", path.display()),
                })
            };
        }

        which::which(tool.binary_name()).map_err(|e| PlatformError::ToolUnavailable {
            tool,
            reason: e.to_string(),
        })
    }
}

/// Check if a path points to a valid executable
fn is_valid_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        true
    }
}
