use crate::archive;
use crate::config::Config;
use crate::layout::{archive_path, mount_path};
use crate::platform::Platform;

use super::error::{Operation, RamifyError};

/// Persist `server`'s tmpfs back into its archive and release the mount
///
/// The mount state is not checked. A failed pack leaves the tmpfs mounted and
/// populated, and a failed unmount happens only after the archive is written.
pub fn unramify(
    config: &Config,
    platform: &dyn Platform,
    server: &str,
) -> Result<(), RamifyError> {
    let archive_file = archive_path(config, server);
    let mount_dir = mount_path(config, server);

    tracing::info!(
        server,
        mount = %mount_dir.display(),
        archive = %archive_file.display(),
        "Packing archive"
    );
    archive::pack(&archive_file, &mount_dir)?;

    tracing::info!(
        server,
        owner = %config.owner,
        path = %archive_file.display(),
        "Fixing ownership"
    );
    platform
        .chown_recursive(&config.owner, &archive_file)
        .map_err(|source| RamifyError::Ownership {
            operation: Operation::Unramify,
            source,
        })?;

    tracing::info!(server, mount = %mount_dir.display(), "Unmounting tmpfs");
    platform
        .unmount(&mount_dir)
        .map_err(RamifyError::UnmountFailed)?;

    tracing::info!(server, "Unramified");
    Ok(())
}
