use std::fs;
use std::io;
use std::path::Path;

use crate::archive;
use crate::config::Config;
use crate::layout::{archive_path, mount_path};
use crate::platform::Platform;

use super::error::{Operation, RamifyError};

/// tmpfs capacity requested for an archive of `archive_len` bytes
///
/// Twice the archive's on-disk size. This is a fixed headroom rule, not an
/// estimate of the unpacked size.
pub fn tmpfs_capacity(archive_len: u64) -> u64 {
    archive_len.saturating_mul(2)
}

/// Whether `dir` has no entries
///
/// Stops at the first entry instead of listing the whole directory.
pub fn is_empty_dir(dir: &Path) -> io::Result<bool> {
    match fs::read_dir(dir)?.next() {
        None => Ok(true),
        Some(Ok(_)) => Ok(false),
        Some(Err(e)) => Err(e),
    }
}

/// Materialize `server`'s archive into a fresh tmpfs
///
/// Preconditions are checked before anything is mounted: the archive must
/// exist and the mount point must be empty (it is created when missing).
pub fn ramify(config: &Config, platform: &dyn Platform, server: &str) -> Result<(), RamifyError> {
    let archive_file = archive_path(config, server);
    let mount_dir = mount_path(config, server);

    let archive_len = match fs::metadata(&archive_file) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(RamifyError::ArchiveNotFound(archive_file));
        }
        Err(e) => return Err(RamifyError::io(format!("stat {}", archive_file.display()), e)),
    };

    fs::create_dir_all(&mount_dir)
        .map_err(|e| RamifyError::io(format!("create {}", mount_dir.display()), e))?;

    let empty = is_empty_dir(&mount_dir)
        .map_err(|e| RamifyError::io(format!("read {}", mount_dir.display()), e))?;
    if !empty {
        return Err(RamifyError::DirectoryNotEmpty(mount_dir));
    }

    let capacity = tmpfs_capacity(archive_len);
    tracing::info!(
        server,
        mount = %mount_dir.display(),
        archive_len,
        capacity,
        "Mounting tmpfs"
    );
    platform
        .mount_tmpfs(&mount_dir, capacity)
        .map_err(RamifyError::MountFailed)?;

    tracing::info!(
        server,
        archive = %archive_file.display(),
        mount = %mount_dir.display(),
        "Extracting archive"
    );
    archive::extract(&archive_file, &mount_dir)?;

    tracing::info!(
        server,
        owner = %config.owner,
        path = %mount_dir.display(),
        "Fixing ownership"
    );
    platform
        .chown_recursive(&config.owner, &mount_dir)
        .map_err(|source| RamifyError::Ownership {
            operation: Operation::Ramify,
            source,
        })?;

    tracing::info!(server, "Ramified");
    Ok(())
}
