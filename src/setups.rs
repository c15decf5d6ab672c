//! Setup files stored under `<setups>/<car_id>/<track_id>/`.
//!
//! A [`SetupFolder`] owns one car/track directory and reads, writes, backs up
//! and deletes the `.ini` files in it. Every file name passes
//! [`check_identifier`] first, so no operation reaches outside the folder.
//!
//! ```rust,no_run
//! use pitbox::setups::SetupFolder;
//! use pitbox::content::IniDocument;
//!
//! # fn main() -> pitbox::Result<()> {
//! let folder = SetupFolder::new("Documents/Assetto Corsa/setups/ks_toyota_ae86/akina");
//! let mut setup = IniDocument::default();
//! setup.set("PRESSURE_LF", "VALUE", 26);
//! folder.save("rea_drift", &setup, false)?;
//!
//! for file in folder.list()? {
//!     println!("{} ({} bytes)", file.file_name, file.size_bytes);
//! }
//! # Ok(())
//! # }
//! ```

use crate::content::IniDocument;
use crate::install::check_identifier;
use crate::{PitboxError, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SETUP_EXTENSION: &str = "ini";

/// File name prefix of setups written by the setup generator.
pub const GENERATED_PREFIX: &str = "rea_";

/// Track folder the simulator shows for every track of a car.
pub const GENERIC_TRACK: &str = "generic";

/// One `.ini` file in a setup folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SetupFile {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// `None` on filesystems without modification times.
    pub modified: Option<DateTime<Utc>>,
    /// Name starts with [`GENERATED_PREFIX`].
    pub is_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupFolder {
    dir: PathBuf,
}

impl SetupFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Path of `file_name` in this folder, with `.ini` appended when missing.
    pub fn file_path(&self, file_name: &str) -> Result<PathBuf> {
        check_identifier(file_name)?;
        let path = self.dir.join(file_name);
        if has_setup_extension(&path) {
            Ok(path)
        } else {
            Ok(self.dir.join(format!("{file_name}.{SETUP_EXTENSION}")))
        }
    }

    /// Setup files, newest first. A folder that does not exist is empty.
    pub fn list(&self) -> Result<Vec<SetupFile>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PitboxError::file_error(self.dir.clone(), e)),
        };

        let mut setups: Vec<SetupFile> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_setup_extension(path))
            .filter_map(|path| setup_file(path).ok())
            .collect();

        setups.sort_by(|a, b| {
            b.modified.cmp(&a.modified).then_with(|| a.file_name.cmp(&b.file_name))
        });
        debug!(dir = %self.dir.display(), count = setups.len(), "Listed setups");
        Ok(setups)
    }

    pub fn load(&self, file_name: &str) -> Result<IniDocument> {
        let path = self.existing(file_name)?;
        IniDocument::read(&path)
    }

    /// Write `setup` as `file_name`, creating the folder if needed.
    ///
    /// An existing file is only replaced when `overwrite` is set.
    pub fn save(&self, file_name: &str, setup: &IniDocument, overwrite: bool) -> Result<PathBuf> {
        let path = self.file_path(file_name)?;
        if path.exists() && !overwrite {
            return Err(PitboxError::SetupExists { path });
        }

        std::fs::create_dir_all(&self.dir)
            .map_err(|source| PitboxError::SetupDirectory { path: self.dir.clone(), source })?;
        setup.write(&path)?;
        info!(path = %path.display(), "Setup saved");
        Ok(path)
    }

    /// Copy `file_name` to `<stem>_backup_<local time>.ini` next to it.
    pub fn backup(&self, file_name: &str) -> Result<PathBuf> {
        let source = self.existing(file_name)?;
        let stem = source.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let stamp = Local::now().format("%Y%m%d_%H%M%S");

        let mut backup = self.dir.join(format!("{stem}_backup_{stamp}.{SETUP_EXTENSION}"));
        let mut attempt = 2;
        while backup.exists() {
            backup = self.dir.join(format!("{stem}_backup_{stamp}_{attempt}.{SETUP_EXTENSION}"));
            attempt += 1;
        }

        std::fs::copy(&source, &backup).map_err(|e| PitboxError::file_error(backup.clone(), e))?;
        info!(source = %source.display(), backup = %backup.display(), "Setup backed up");
        Ok(backup)
    }

    pub fn delete(&self, file_name: &str) -> Result<PathBuf> {
        let path = self.existing(file_name)?;
        std::fs::remove_file(&path).map_err(|e| PitboxError::file_error(path.clone(), e))?;
        info!(path = %path.display(), "Setup deleted");
        Ok(path)
    }

    fn existing(&self, file_name: &str) -> Result<PathBuf> {
        let path = self.file_path(file_name)?;
        if !path.is_file() {
            return Err(PitboxError::SetupNotFound { path });
        }
        Ok(path)
    }
}

fn has_setup_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(SETUP_EXTENSION))
}

fn setup_file(path: PathBuf) -> std::io::Result<SetupFile> {
    let metadata = std::fs::metadata(&path)?;
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    Ok(SetupFile {
        is_generated: file_name.starts_with(GENERATED_PREFIX),
        size_bytes: metadata.len(),
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        file_name,
        path,
    })
}
