pub mod archive;
pub mod cli;
pub mod config;
pub mod core;
pub mod layout;
pub mod platform;

pub use archive::ArchiveError;
pub use config::{Config, ConfigError};
pub use crate::core::{ramify, tmpfs_capacity, unramify, Operation, RamifyError};
pub use platform::{MockPlatform, Platform, PlatformCall, PlatformError, SystemPlatform};
