//! Tar archive pack/unpack for a whole directory tree

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("archive not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ArchiveError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        ArchiveError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Unpack every entry of `archive_path` into `dest`
///
/// Relative paths and permissions are preserved and existing files are
/// overwritten.
pub fn extract(archive_path: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let file = File::open(archive_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ArchiveError::NotFound(archive_path.to_path_buf()),
        _ => ArchiveError::io("open archive", archive_path, e),
    })?;

    let mut archive = tar::Archive::new(BufReader::new(file));
    archive.set_preserve_permissions(true);
    archive.set_preserve_mtime(true);
    archive.set_overwrite(true);
    archive
        .unpack(dest)
        .map_err(|e| ArchiveError::io("extract into", dest, e))?;

    tracing::debug!(
        archive = %archive_path.display(),
        dest = %dest.display(),
        "Extracted archive"
    );
    Ok(())
}

/// Write every entry under `source` into `archive_path`, replacing any prior archive
///
/// Entry names are relative to `source`. Symlinks are stored as links and
/// sockets are skipped. The archive is written to a sibling temp file and
/// renamed into place, so a failed pack leaves the previous archive intact.
pub fn pack(archive_path: &Path, source: &Path) -> Result<(), ArchiveError> {
    let entries = sorted_entries(source)?;

    let parent = match archive_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ArchiveError::NotFound(archive_path.to_path_buf()),
        _ => ArchiveError::io("create archive", archive_path, e),
    })?;

    let mut builder = tar::Builder::new(BufWriter::new(temp));
    builder.follow_symlinks(false);

    let mut appended = 0;
    for path in &entries {
        let Some(name) = path.file_name() else {
            continue;
        };
        appended += append_entry(&mut builder, path, Path::new(name))?;
    }

    let mut writer = builder
        .into_inner()
        .map_err(|e| ArchiveError::io("finish archive", archive_path, e))?;
    writer
        .flush()
        .map_err(|e| ArchiveError::io("write archive", archive_path, e))?;
    let temp = writer
        .into_inner()
        .map_err(|e| ArchiveError::io("write archive", archive_path, e.into_error()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(ARCHIVE_MODE))
            .map_err(|e| ArchiveError::io("set permissions on", archive_path, e))?;
    }
    temp.persist(archive_path)
        .map_err(|e| ArchiveError::io("replace archive", archive_path, e.error))?;

    tracing::debug!(
        archive = %archive_path.display(),
        source = %source.display(),
        entries = appended,
        "Packed archive"
    );
    Ok(())
}

/// Mode given to a freshly packed archive
#[cfg(unix)]
const ARCHIVE_MODE: u32 = 0o644;

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| ArchiveError::io("read directory", dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(|e| ArchiveError::io("read directory", dir, e))?;
    entries.sort();
    Ok(entries)
}

/// Append `path` under `name`, descending into directories
///
/// Returns the number of entries written.
fn append_entry<W: Write>(
    builder: &mut tar::Builder<W>,
    path: &Path,
    name: &Path,
) -> Result<usize, ArchiveError> {
    let file_type = fs::symlink_metadata(path)
        .map_err(|e| ArchiveError::io("stat", path, e))?
        .file_type();

    if is_socket(&file_type) {
        tracing::debug!(path = %path.display(), "Skipping socket");
        return Ok(0);
    }

    if !file_type.is_dir() {
        builder
            .append_path_with_name(path, name)
            .map_err(|e| ArchiveError::io("archive", path, e))?;
        return Ok(1);
    }

    builder
        .append_dir(name, path)
        .map_err(|e| ArchiveError::io("archive", path, e))?;
    let mut appended = 1;
    for child in sorted_entries(path)? {
        let Some(child_name) = child.file_name() else {
            continue;
        };
        appended += append_entry(builder, &child, &name.join(child_name))?;
    }
    Ok(appended)
}

#[cfg(unix)]
fn is_socket(file_type: &fs::FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;
    file_type.is_socket()
}

#[cfg(not(unix))]
fn is_socket(_file_type: &fs::FileType) -> bool {
    false
}
