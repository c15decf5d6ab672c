//! Candidate lists for installation detection.
//!
//! The defaults mirror a stock Steam install on Windows. A JSON file can
//! replace any subset of the lists; omitted keys keep their defaults:
//!
//! ```json
//! {
//!   "game_candidates": ["D:/Games/assettocorsa"],
//!   "library_roots": ["D:/Steam"]
//! }
//! ```

use crate::{PitboxError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const USER_DATA_DIR: &str = "Assetto Corsa";

const STEAM_GAME_PATHS: &[&str] = &[
    "C:/Program Files (x86)/Steam/steamapps/common/assettocorsa",
    "C:/Program Files/Steam/steamapps/common/assettocorsa",
    "D:/Steam/steamapps/common/assettocorsa",
    "D:/Games/Steam/steamapps/common/assettocorsa",
    "E:/Steam/steamapps/common/assettocorsa",
    "D:/SteamLibrary/steamapps/common/assettocorsa",
    "E:/SteamLibrary/steamapps/common/assettocorsa",
    "F:/SteamLibrary/steamapps/common/assettocorsa",
    "G:/SteamLibrary/steamapps/common/assettocorsa",
];

const STEAM_ROOTS: &[&str] =
    &["C:/Program Files (x86)/Steam", "C:/Program Files/Steam", "D:/Steam", "E:/Steam"];

/// Where to look for the user-data and game roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Ordered user-data candidates; the first existing directory wins.
    pub user_data_candidates: Vec<PathBuf>,
    /// Ordered game-root candidates; must contain [`Self::launcher_executable`].
    pub game_candidates: Vec<PathBuf>,
    /// Package-manager roots, accepted when they contain
    /// [`Self::library_marker`].
    pub library_roots: Vec<PathBuf>,
    pub launcher_executable: String,
    pub library_marker: String,
    /// Game directory relative to a library root.
    pub game_subpath: PathBuf,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            user_data_candidates: default_user_data_candidates(),
            game_candidates: STEAM_GAME_PATHS.iter().map(PathBuf::from).collect(),
            library_roots: STEAM_ROOTS.iter().map(PathBuf::from).collect(),
            launcher_executable: "AssettoCorsa.exe".to_string(),
            library_marker: "steam.exe".to_string(),
            game_subpath: PathBuf::from("steamapps").join("common").join("assettocorsa"),
        }
    }
}

impl DetectorConfig {
    /// Config with every candidate list empty.
    ///
    /// Useful as a base when the caller knows exactly where to look.
    pub fn empty() -> Self {
        Self {
            user_data_candidates: Vec::new(),
            game_candidates: Vec::new(),
            library_roots: Vec::new(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PitboxError::parse_error("detector config", e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PitboxError::file_error(path.to_path_buf(), e))?;
        Self::from_json_str(&content)
    }
}

fn default_user_data_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join("Documents").join(USER_DATA_DIR));
        candidates.push(home.join("OneDrive").join("Documents").join(USER_DATA_DIR));
    }

    if let Some(profile) = std::env::var_os("USERPROFILE") {
        let candidate = PathBuf::from(profile).join("Documents").join(USER_DATA_DIR);
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    candidates
}
