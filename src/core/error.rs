use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::platform::PlatformError;

/// The operation an error was raised from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Ramify,
    Unramify,
}

#[derive(Error, Debug)]
pub enum RamifyError {
    #[error("archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),
    #[error("directory not empty: {}", .0.display())]
    DirectoryNotEmpty(PathBuf),
    #[error("failed to {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("mount failed: {0}")]
    MountFailed(#[source] PlatformError),
    #[error("unmount failed: {0}")]
    UnmountFailed(#[source] PlatformError),
    #[error("ownership change failed: {source}")]
    Ownership {
        operation: Operation,
        #[source]
        source: PlatformError,
    },
}

impl RamifyError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        RamifyError::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            RamifyError::ArchiveNotFound(_) => 1,
            RamifyError::DirectoryNotEmpty(_) => 2,
            RamifyError::Io { .. } => 3,
            RamifyError::MountFailed(_) => 4,
            RamifyError::UnmountFailed(_) => 5,
            RamifyError::Ownership { operation, .. } => match operation {
                Operation::Ramify => 4,
                Operation::Unramify => 5,
            },
        }
    }
}

impl From<ArchiveError> for RamifyError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::NotFound(path) => RamifyError::ArchiveNotFound(path),
            ArchiveError::Io {
                action,
                path,
                source,
            } => RamifyError::io(format!("{action} {}", path.display()), source),
        }
    }
}
