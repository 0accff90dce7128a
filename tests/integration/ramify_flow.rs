//! Integration tests for materializing a server into tmpfs

use super::common::fixtures::{snapshot, write_sample_tree, TestEnv, TEST_OWNER};
use ramify::platform::{MockConfig, MockPlatform, PlatformCall};
use ramify::{ramify, RamifyError};
use std::fs;
use tempfile::TempDir;

/// A missing archive fails before anything is mounted
#[test]
fn test_missing_archive() {
    let env = TestEnv::new();
    let platform = MockPlatform::new();

    let err = ramify(&env.config, &platform, "lobby").unwrap_err();

    assert!(matches!(&err, RamifyError::ArchiveNotFound(p) if *p == env.archive("lobby")));
    assert_eq!(err.exit_code(), 1);
    assert!(platform.calls().is_empty(), "No mount should be attempted");
    assert!(!env.mount("lobby").exists(), "Mount point is not created");
}

/// A non-empty mount point fails before anything is mounted
#[test]
fn test_mount_point_not_empty() {
    let env = TestEnv::new();
    env.with_archive("lobby");
    fs::create_dir_all(env.mount("lobby")).unwrap();
    fs::write(env.mount("lobby").join("leftover.log"), "old").unwrap();
    let platform = MockPlatform::new();

    let err = ramify(&env.config, &platform, "lobby").unwrap_err();

    assert!(matches!(&err, RamifyError::DirectoryNotEmpty(p) if *p == env.mount("lobby")));
    assert_eq!(err.exit_code(), 2);
    assert!(platform.calls().is_empty());
    assert_eq!(
        fs::read_to_string(env.mount("lobby").join("leftover.log")).unwrap(),
        "old"
    );
}

/// A lone hidden entry is enough to count as not empty
#[test]
fn test_hidden_entry_counts() {
    let env = TestEnv::new();
    env.with_archive("lobby");
    fs::create_dir_all(env.mount("lobby").join(".cache")).unwrap();
    let platform = MockPlatform::new();

    let err = ramify(&env.config, &platform, "lobby").unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

/// Mount point parents are created when missing
#[test]
fn test_creates_mount_point() {
    let env = TestEnv::new();
    env.with_archive("lobby");
    assert!(!env.config.mount_root.exists());
    let platform = MockPlatform::new();

    ramify(&env.config, &platform, "lobby").unwrap();

    assert!(env.mount("lobby").is_dir());
}

/// An existing empty mount point is accepted
#[test]
fn test_existing_empty_mount_point() {
    let env = TestEnv::new();
    env.with_archive("lobby");
    fs::create_dir_all(env.mount("lobby")).unwrap();
    let platform = MockPlatform::new();

    ramify(&env.config, &platform, "lobby").unwrap();
}

/// Successful ramify mounts, extracts, then chowns the mount point
#[test]
fn test_success_sequence() {
    let env = TestEnv::new();
    env.with_archive("lobby");
    let archive_len = env.archive_len("lobby");
    let platform = MockPlatform::new();

    ramify(&env.config, &platform, "lobby").unwrap();

    assert_eq!(
        platform.calls(),
        vec![
            PlatformCall::Mount {
                path: env.mount("lobby"),
                size_bytes: archive_len * 2,
            },
            PlatformCall::ChownRecursive {
                owner: TEST_OWNER.to_string(),
                path: env.mount("lobby"),
            },
        ]
    );

    let expected = TempDir::new().unwrap();
    write_sample_tree(expected.path());
    assert_eq!(snapshot(&env.mount("lobby")), snapshot(expected.path()));
}

/// The requested capacity is exactly twice the archive's size
#[test]
fn test_capacity_tracks_archive_size() {
    let env = TestEnv::new();
    let archive = env.with_archive("lobby");
    let mut padded = fs::read(&archive).unwrap();
    padded.extend(std::iter::repeat(0u8).take(10 * 512));
    fs::write(&archive, &padded).unwrap();
    let platform = MockPlatform::new();

    ramify(&env.config, &platform, "lobby").unwrap();

    assert_eq!(platform.mount_sizes(), vec![padded.len() as u64 * 2]);
}

/// A failed mount stops before extraction and ownership changes
#[test]
fn test_mount_failure() {
    let env = TestEnv::new();
    env.with_archive("lobby");
    let platform = MockPlatform::new().with_config(MockConfig::default().failing_mount());

    let err = ramify(&env.config, &platform, "lobby").unwrap_err();

    assert!(matches!(err, RamifyError::MountFailed(_)));
    assert_eq!(err.exit_code(), 4);
    assert_eq!(platform.calls().len(), 1, "Only the mount is attempted");
    assert!(
        fs::read_dir(env.mount("lobby")).unwrap().next().is_none(),
        "Nothing is extracted"
    );
}

/// A failed chown after extraction reports exit code 4
#[test]
fn test_chown_failure() {
    let env = TestEnv::new();
    env.with_archive("lobby");
    let platform = MockPlatform::new().with_config(MockConfig::default().failing_chown());

    let err = ramify(&env.config, &platform, "lobby").unwrap_err();

    assert_eq!(err.exit_code(), 4);
    assert!(err.to_string().starts_with("ownership change failed: "));
    assert!(env.mount("lobby").join("server.properties").exists());
}

/// An unreadable archive is a generic OS error, not a missing archive
#[test]
fn test_corrupt_archive_is_os_error() {
    let env = TestEnv::new();
    let archive = env.archive("lobby");
    fs::write(&archive, vec![0xabu8; 1024]).unwrap();
    let platform = MockPlatform::new();

    let err = ramify(&env.config, &platform, "lobby").unwrap_err();

    assert!(matches!(err, RamifyError::Io { .. }));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(platform.calls().len(), 1, "Mount happens before extraction");
}

/// A mount root that cannot be created is a generic OS error
#[test]
fn test_mount_root_blocked_by_file() {
    let env = TestEnv::new();
    env.with_archive("lobby");
    fs::write(&env.config.mount_root, "not a directory").unwrap();
    let platform = MockPlatform::new();

    let err = ramify(&env.config, &platform, "lobby").unwrap_err();

    assert!(matches!(err, RamifyError::Io { .. }));
    assert_eq!(err.exit_code(), 3);
    assert!(platform.calls().is_empty());
}
