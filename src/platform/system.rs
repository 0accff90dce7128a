//! [`Platform`] backed by the host's `mount`, `umount` and `chown` binaries

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use super::tools::{Tool, ToolPaths};
use super::{Platform, PlatformError};

/// Filesystem type requested from `mount`
pub const TMPFS: &str = "tmpfs";

/// Runs the real OS commands
#[derive(Debug, Default, Clone)]
pub struct SystemPlatform {
    tool_paths: ToolPaths,
}

impl SystemPlatform {
    /// Create a SystemPlatform honouring configured tool paths
    pub fn with_tool_paths(tool_paths: ToolPaths) -> Self {
        Self { tool_paths }
    }

    fn run(&self, tool: Tool, args: Vec<OsString>) -> Result<(), PlatformError> {
        let binary = self.tool_paths.resolve(tool)?;
        let command = render_command(tool, &args);
        tracing::debug!(binary = %binary.display(), %command, "Running command");

        let output = Command::new(&binary)
            .args(&args)
            .output()
            .map_err(|source| PlatformError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PlatformError::CommandFailed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl Platform for SystemPlatform {
    fn mount_tmpfs(&self, path: &Path, size_bytes: u64) -> Result<(), PlatformError> {
        self.run(Tool::Mount, mount_args(path, size_bytes))
    }

    fn unmount(&self, path: &Path) -> Result<(), PlatformError> {
        self.run(Tool::Umount, unmount_args(path))
    }

    fn chown_recursive(&self, owner: &str, path: &Path) -> Result<(), PlatformError> {
        self.run(Tool::Chown, chown_args(owner, path))
    }
}

/// `mount -t tmpfs -o size=<bytes> tmpfs <path>`
pub fn mount_args(path: &Path, size_bytes: u64) -> Vec<OsString> {
    vec![
        "-t".into(),
        TMPFS.into(),
        "-o".into(),
        format!("size={size_bytes}").into(),
        TMPFS.into(),
        path.into(),
    ]
}

/// `umount <path>`
pub fn unmount_args(path: &Path) -> Vec<OsString> {
    vec![path.into()]
}

/// `chown -R <owner>:<owner> <path>`
pub fn chown_args(owner: &str, path: &Path) -> Vec<OsString> {
    vec!["-R".into(), format!("{owner}:{owner}").into(), path.into()]
}

fn render_command(tool: Tool, args: &[OsString]) -> String {
    std::iter::once(tool.binary_name().to_string())
        .chain(args.iter().map(|arg| arg.to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}
