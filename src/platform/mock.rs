//! Mock platform for deterministic testing
//!
//! Implements [`Platform`] without touching the mount table or file
//! ownership. Every call is captured in order, and any capability can be
//! configured to fail so the abort paths of ramify and unramify can be
//! exercised without root.
//!
//! # Example
//! ```
//! use std::path::Path;
//! use ramify::platform::{MockConfig, MockPlatform, Platform, PlatformCall};
//!
//! let platform = MockPlatform::new().with_config(MockConfig::default().failing_unmount());
//! assert!(platform.unmount(Path::new("/run/ramify/lobby")).is_err());
//! assert_eq!(
//!     platform.calls(),
//!     vec![PlatformCall::Unmount { path: "/run/ramify/lobby".into() }]
//! );
//! ```

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Platform, PlatformCall, PlatformError};

/// Configuration for mock platform behavior
#[derive(Clone, Debug, Default)]
pub struct MockConfig {
    /// Whether mount_tmpfs() should fail
    pub fail_mount: bool,
    /// Whether unmount() should fail
    pub fail_unmount: bool,
    /// Whether chown_recursive() should fail
    pub fail_chown: bool,
}

impl MockConfig {
    /// Configure mount_tmpfs() to fail
    pub fn failing_mount(mut self) -> Self {
        self.fail_mount = true;
        self
    }

    /// Configure unmount() to fail
    pub fn failing_unmount(mut self) -> Self {
        self.fail_unmount = true;
        self
    }

    /// Configure chown_recursive() to fail
    pub fn failing_chown(mut self) -> Self {
        self.fail_chown = true;
        self
    }
}

/// Mock platform for testing
///
/// Calls are recorded even when they are configured to fail, so tests can
/// assert both on what was attempted and on what was never reached.
#[derive(Clone, Default)]
pub struct MockPlatform {
    config: MockConfig,
    captured_calls: Arc<Mutex<Vec<PlatformCall>>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock with a MockConfig
    pub fn with_config(mut self, config: MockConfig) -> Self {
        self.config = config;
        self
    }

    /// Get captured calls, oldest first
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.captured_calls.lock().clone()
    }

    /// Sizes passed to every mount_tmpfs() call
    pub fn mount_sizes(&self) -> Vec<u64> {
        self.captured_calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PlatformCall::Mount { size_bytes, .. } => Some(*size_bytes),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PlatformCall, fail: bool) -> Result<(), PlatformError> {
        let command = match &call {
            PlatformCall::Mount { path, size_bytes } => {
                format!("mount -t tmpfs -o size={size_bytes} tmpfs {}", path.display())
            }
            PlatformCall::Unmount { path } => format!("umount {}", path.display()),
            PlatformCall::ChownRecursive { owner, path } => {
                format!("chown -R {owner}:{owner} {}", path.display())
            }
        };
        self.captured_calls.lock().push(call);

        if fail {
            return Err(PlatformError::CommandFailed {
                command,
                code: Some(32),
                stderr: "mock-failure".into(),
            });
        }
        Ok(())
    }
}

impl Platform for MockPlatform {
    fn mount_tmpfs(&self, path: &Path, size_bytes: u64) -> Result<(), PlatformError> {
        self.record(
            PlatformCall::Mount {
                path: path.to_path_buf(),
                size_bytes,
            },
            self.config.fail_mount,
        )
    }

    fn unmount(&self, path: &Path) -> Result<(), PlatformError> {
        self.record(
            PlatformCall::Unmount {
                path: path.to_path_buf(),
            },
            self.config.fail_unmount,
        )
    }

    fn chown_recursive(&self, owner: &str, path: &Path) -> Result<(), PlatformError> {
        self.record(
            PlatformCall::ChownRecursive {
                owner: owner.to_string(),
                path: path.to_path_buf(),
            },
            self.config.fail_chown,
        )
    }
}
