//! Server state fixtures
//!
//! Provides a throwaway archive root and mount root per test, so the
//! orchestrations can run against real directories while a `MockPlatform`
//! stands in for mount, umount and chown.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ramify::layout::{archive_path, mount_path};
use ramify::Config;
use tempfile::TempDir;

pub const TEST_OWNER: &str = "svc-test";

/// A temporary archive root and mount root for one test
///
/// Both directories are removed when the `TestEnv` is dropped.
pub struct TestEnv {
    dir: TempDir,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let archive_root = dir.path().join("archives");
        let mount_root = dir.path().join("run");
        fs::create_dir_all(&archive_root).unwrap();

        let config = Config::default()
            .with_archive_root(archive_root)
            .with_mount_root(mount_root)
            .with_owner(TEST_OWNER);

        Self { dir, config }
    }

    pub fn archive(&self, server: &str) -> PathBuf {
        archive_path(&self.config, server)
    }

    pub fn mount(&self, server: &str) -> PathBuf {
        mount_path(&self.config, server)
    }

    /// Write an archive for `server` holding the standard sample tree
    pub fn with_archive(&self, server: &str) -> PathBuf {
        let staging = self.dir.path().join(format!("staging-{server}"));
        fs::create_dir_all(&staging).unwrap();
        write_sample_tree(&staging);

        let archive = self.archive(server);
        ramify::archive::pack(&archive, &staging).unwrap();
        archive
    }

    /// Extract `archive` into a fresh directory and snapshot it
    pub fn snapshot_archive(&self, archive: &Path) -> Tree {
        let out = TempDir::new_in(self.dir.path()).unwrap();
        ramify::archive::extract(archive, out.path()).unwrap();
        snapshot(out.path())
    }

    pub fn archive_len(&self, server: &str) -> u64 {
        fs::metadata(self.archive(server)).unwrap().len()
    }
}

/// Populate `root` with a small server state tree
pub fn write_sample_tree(root: &Path) {
    fs::create_dir_all(root.join("world/region")).unwrap();
    fs::create_dir_all(root.join("world/playerdata")).unwrap();
    fs::create_dir_all(root.join("plugins/empty")).unwrap();
    fs::write(root.join("server.properties"), "motd=hello\nmax-players=20\n").unwrap();
    fs::write(root.join("ops.json"), "[]").unwrap();
    fs::write(root.join("world/level.dat"), [0x1fu8, 0x8b, 0x08, 0x00, 0xff]).unwrap();
    fs::write(
        root.join("world/region/r.0.0.mca"),
        (0..8192u32).map(|i| (i % 251) as u8).collect::<Vec<_>>(),
    )
    .unwrap();
}

/// Relative path to file contents (`None` for directories)
pub type Tree = BTreeMap<PathBuf, Option<Vec<u8>>>;

/// Record every entry under `root` by relative path
pub fn snapshot(root: &Path) -> Tree {
    let mut tree = Tree::new();
    walk(root, root, &mut tree);
    tree
}

fn walk(root: &Path, dir: &Path, tree: &mut Tree) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let rel = path.strip_prefix(root).unwrap().to_path_buf();
        if path.is_dir() {
            tree.insert(rel, None);
            walk(root, &path, tree);
        } else {
            tree.insert(rel, Some(fs::read(&path).unwrap()));
        }
    }
}
