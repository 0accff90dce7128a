//! Path derivation for a server's archive and mount point
//!
//! Both paths are a pure function of the config and the server identifier.
//! The identifier is used verbatim.

use std::path::PathBuf;

use crate::config::Config;

/// Extension of the durable archive
pub const ARCHIVE_EXTENSION: &str = "tar";

/// Get the archive path for a server (`<archive_root>/<server>.tar`)
pub fn archive_path(config: &Config, server: &str) -> PathBuf {
    config
        .archive_root
        .join(format!("{server}.{ARCHIVE_EXTENSION}"))
}

/// Get the tmpfs mount point for a server (`<mount_root>/<server>`)
pub fn mount_path(config: &Config, server: &str) -> PathBuf {
    config.mount_root.join(server)
}
