//! OS capabilities needed by the orchestrations
//!
//! Mounting, unmounting and recursive ownership changes all go through the
//! [`Platform`] trait so they can be swapped for [`MockPlatform`] in tests.

pub mod mock;
pub mod system;
pub mod tools;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use mock::{MockConfig, MockPlatform};
pub use system::SystemPlatform;
pub use tools::{Tool, ToolPaths};

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("{} is not available: {reason}", .tool.binary_name())]
    ToolUnavailable { tool: Tool, reason: String },
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` exited with {}{}", exit_description(.code), stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr.lines().collect::<Vec<_>>().join(" "))
    }
}

/// A capability invocation, as recorded by [`MockPlatform`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Mount { path: PathBuf, size_bytes: u64 },
    Unmount { path: PathBuf },
    ChownRecursive { owner: String, path: PathBuf },
}

/// The OS services ramify and unramify are built from
pub trait Platform {
    /// Mount a tmpfs of `size_bytes` capacity at `path`
    fn mount_tmpfs(&self, path: &Path, size_bytes: u64) -> Result<(), PlatformError>;

    /// Release the mount at `path`
    fn unmount(&self, path: &Path) -> Result<(), PlatformError>;

    /// Give `owner` user and group ownership of `path` and everything beneath it
    fn chown_recursive(&self, owner: &str, path: &Path) -> Result<(), PlatformError>;
}
