//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use pitbox::DetectorConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fake Steam library plus a documents folder in a temp directory.
pub struct FakeInstall {
    dir: TempDir,
}

impl FakeInstall {
    pub fn new() -> anyhow::Result<Self> {
        let install = Self { dir: tempfile::tempdir()? };
        std::fs::create_dir_all(install.documents())?;
        std::fs::create_dir_all(install.content().join("cars"))?;
        std::fs::create_dir_all(install.content().join("tracks"))?;
        std::fs::write(install.steam().join("steam.exe"), b"")?;
        std::fs::write(install.game().join("AssettoCorsa.exe"), b"")?;
        Ok(install)
    }

    pub fn documents(&self) -> PathBuf {
        self.dir.path().join("Documents").join("Assetto Corsa")
    }

    pub fn steam(&self) -> PathBuf {
        self.dir.path().join("Steam")
    }

    pub fn game(&self) -> PathBuf {
        self.steam().join("steamapps").join("common").join("assettocorsa")
    }

    pub fn content(&self) -> PathBuf {
        self.game().join("content")
    }

    /// Finds the game through the library root, not a direct candidate.
    pub fn config(&self) -> DetectorConfig {
        let mut config = DetectorConfig::empty();
        config.user_data_candidates = vec![self.documents()];
        config.library_roots = vec![self.steam()];
        config
    }

    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) -> anyhow::Result<()> {
        let path = self.content().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}
