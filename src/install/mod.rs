//! Installation detection.
//!
//! An Assetto Corsa install is split across two independent roots:
//!
//! - the **user-data root** (`Documents/Assetto Corsa`), holding `setups/`
//! - the **game root** (the Steam app folder), holding `content/cars` and
//!   `content/tracks`
//!
//! An [`Installation`] is valid only when both roots exist. The detector
//! caches the result until [`InstallationDetector::invalidate`] is called.

mod config;

pub use config::DetectorConfig;

use crate::{PitboxError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Sentinel file created and removed by the write check.
pub const WRITE_CHECK_FILE: &str = ".write_test";

/// Reject names that would leave their parent folder when joined to it.
///
/// Car ids, track ids and setup file names are single path components:
/// non-empty, not `.` or `..`, and free of separators, drive prefixes and NUL.
pub fn check_identifier(id: &str) -> Result<()> {
    let unsafe_char = |c: char| matches!(c, '/' | '\\' | ':' | '\0');
    if id.trim().is_empty() || id == "." || id == ".." || id.contains(unsafe_char) {
        return Err(PitboxError::invalid_identifier(id));
    }
    Ok(())
}

/// Detected install roots and the paths derived from them.
///
/// Derived paths are fixed when the value is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Installation {
    user_data_root: Option<PathBuf>,
    game_root: Option<PathBuf>,
    setups_root: Option<PathBuf>,
    cars_root: Option<PathBuf>,
    tracks_root: Option<PathBuf>,
    is_valid: bool,
    can_write_setups: bool,
}

impl Installation {
    /// Unvalidated installation over the given roots.
    pub fn new(user_data_root: Option<PathBuf>, game_root: Option<PathBuf>) -> Self {
        let setups_root = user_data_root.as_ref().map(|root| root.join("setups"));
        let content = game_root.as_ref().map(|root| root.join("content"));
        Self {
            cars_root: content.as_ref().map(|c| c.join("cars")),
            tracks_root: content.map(|c| c.join("tracks")),
            setups_root,
            user_data_root,
            game_root,
            is_valid: false,
            can_write_setups: false,
        }
    }

    /// Build from two stored roots and validate them against the filesystem.
    ///
    /// Used to restore an installation the user configured by hand.
    pub fn validated(user_data_root: impl Into<PathBuf>, game_root: impl Into<PathBuf>) -> Self {
        let mut installation = Self::new(Some(user_data_root.into()), Some(game_root.into()));
        installation.validate();
        installation
    }

    /// Re-check both roots and, when valid, test writing to the setups directory.
    ///
    /// Never fails: a denied write only clears `can_write_setups`.
    pub fn validate(&mut self) {
        self.is_valid = matches!(
            (&self.user_data_root, &self.game_root),
            (Some(user), Some(game)) if user.exists() && game.exists()
        );

        self.can_write_setups = match (&self.setups_root, self.is_valid) {
            (Some(setups), true) => check_writable(setups),
            _ => false,
        };
    }

    pub fn user_data_root(&self) -> Option<&Path> {
        self.user_data_root.as_deref()
    }

    pub fn game_root(&self) -> Option<&Path> {
        self.game_root.as_deref()
    }

    pub fn setups_root(&self) -> Option<&Path> {
        self.setups_root.as_deref()
    }

    pub fn cars_root(&self) -> Option<&Path> {
        self.cars_root.as_deref()
    }

    pub fn tracks_root(&self) -> Option<&Path> {
        self.tracks_root.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn can_write_setups(&self) -> bool {
        self.can_write_setups
    }

    /// At least one root was found.
    pub fn is_detected(&self) -> bool {
        self.user_data_root.is_some() || self.game_root.is_some()
    }
}

/// Create `setups` if needed, then create and delete a sentinel file in it.
fn check_writable(setups: &Path) -> bool {
    let sentinel = setups.join(WRITE_CHECK_FILE);
    let outcome = std::fs::create_dir_all(setups)
        .and_then(|()| std::fs::File::create(&sentinel))
        .and_then(|file| {
            drop(file);
            std::fs::remove_file(&sentinel)
        });

    match outcome {
        Ok(()) => {
            trace!(path = %setups.display(), "Setups directory is writable");
            true
        }
        Err(e) => {
            warn!(path = %setups.display(), error = %e, "Setups directory is not writable");
            false
        }
    }
}

/// Finds and caches the installation.
#[derive(Debug, Clone, Default)]
pub struct InstallationDetector {
    config: DetectorConfig,
    installation: Option<Installation>,
}

impl InstallationDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config, installation: None }
    }

    /// Pre-seed the cache, typically with [`Installation::validated`].
    ///
    /// A valid seed is returned by [`Self::detect_installation`] without
    /// searching; an invalid one is replaced on the next detection.
    pub fn with_installation(mut self, installation: Installation) -> Self {
        self.installation = Some(installation);
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// First user-data candidate that exists.
    pub fn detect_user_data_root(&self) -> Option<PathBuf> {
        let found = self.config.user_data_candidates.iter().find(|p| {
            trace!(path = %p.display(), "Checking user data root");
            p.is_dir()
        });
        found.cloned()
    }

    /// First game candidate holding the launcher, then the library roots.
    pub fn detect_game_root(&self) -> Option<PathBuf> {
        let launcher = &self.config.launcher_executable;
        let has_launcher = |dir: &Path| dir.is_dir() && dir.join(launcher).is_file();

        if let Some(found) = self.config.game_candidates.iter().find(|p| {
            trace!(path = %p.display(), "Checking game root");
            has_launcher(p)
        }) {
            return Some(found.clone());
        }

        self.config
            .library_roots
            .iter()
            .filter(|root| root.join(&self.config.library_marker).is_file())
            .map(|root| root.join(&self.config.game_subpath))
            .find(|candidate| {
                trace!(path = %candidate.display(), "Checking library game root");
                has_launcher(candidate)
            })
    }

    /// Detect both roots, validate, and cache the result.
    ///
    /// A cached valid installation is returned unchanged.
    pub fn detect_installation(&mut self) -> &Installation {
        if self.installation.as_ref().is_some_and(Installation::is_valid) {
            debug!("Using cached installation");
        } else {
            let mut installation =
                Installation::new(self.detect_user_data_root(), self.detect_game_root());
            installation.validate();

            if installation.is_valid() {
                info!(
                    user_data = ?installation.user_data_root(),
                    game = ?installation.game_root(),
                    can_write = installation.can_write_setups(),
                    "Assetto Corsa installation detected"
                );
            } else {
                debug!(
                    user_data = ?installation.user_data_root(),
                    game = ?installation.game_root(),
                    "No complete Assetto Corsa installation found"
                );
            }
            self.installation = Some(installation);
        }

        self.installation.get_or_insert_with(Installation::default)
    }

    /// Cached installation, detecting on first use.
    pub fn installation(&mut self) -> &Installation {
        if self.installation.is_none() {
            return self.detect_installation();
        }
        self.installation.get_or_insert_with(Installation::default)
    }

    /// Cached installation without triggering detection.
    pub fn cached(&self) -> Option<&Installation> {
        self.installation.as_ref()
    }

    /// Drop the cached installation.
    pub fn invalidate(&mut self) {
        if self.installation.take().is_some() {
            debug!("Installation cache cleared");
        }
    }

    /// `<setups>/<car_id>/<track_id>`, or `None` without a valid installation
    /// or when either id is not a plain folder name.
    pub fn get_setup_path(&mut self, car_id: &str, track_id: &str) -> Option<PathBuf> {
        if let Err(e) = check_identifier(car_id).and_then(|()| check_identifier(track_id)) {
            warn!(error = %e, "Refusing setup path");
            return None;
        }
        let installation = self.installation();
        if !installation.is_valid() {
            return None;
        }
        installation.setups_root().map(|setups| setups.join(car_id).join(track_id))
    }

    /// Like [`Self::get_setup_path`], with the reason when there is no path.
    ///
    /// Nothing is created; the directory may not exist.
    pub fn checked_setup_path(&mut self, car_id: &str, track_id: &str) -> Result<PathBuf> {
        check_identifier(car_id)?;
        check_identifier(track_id)?;
        Ok(self.usable_setups_root()?.join(car_id).join(track_id))
    }

    /// Create the setup directory for a car/track pair.
    pub fn ensure_setup_path(&mut self, car_id: &str, track_id: &str) -> Result<PathBuf> {
        let path = self.checked_setup_path(car_id, track_id)?;
        if !self.installation().can_write_setups() {
            let setups = self.usable_setups_root()?;
            return Err(PitboxError::SetupsNotWritable { path: setups });
        }

        std::fs::create_dir_all(&path)
            .map_err(|source| PitboxError::SetupDirectory { path: path.clone(), source })?;
        debug!(path = %path.display(), "Setup directory ready");
        Ok(path)
    }

    fn usable_setups_root(&mut self) -> Result<PathBuf> {
        let installation = self.installation();

        if !installation.is_detected() {
            return Err(PitboxError::InstallationNotDetected);
        }
        if !installation.is_valid() {
            let missing = if installation.user_data_root().is_none_or(|p| !p.exists()) {
                "documents folder"
            } else {
                "game folder"
            };
            return Err(PitboxError::InvalidInstallation { missing });
        }

        installation
            .setups_root()
            .map(Path::to_path_buf)
            .ok_or(PitboxError::InvalidInstallation { missing: "documents folder" })
    }

    /// [`Self::ensure_setup_path`] as a success flag and a message for the user.
    pub fn validate_setup_path(&mut self, car_id: &str, track_id: &str) -> (bool, String) {
        match self.ensure_setup_path(car_id, track_id) {
            Ok(path) => (true, format!("Setup path ready: {}", path.display())),
            Err(e) => (false, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::InstallFixture;

    #[test]
    fn derived_paths_follow_roots() {
        let installation =
            Installation::new(Some(PathBuf::from("/docs/AC")), Some(PathBuf::from("/games/ac")));
        assert_eq!(installation.setups_root(), Some(Path::new("/docs/AC/setups")));
        assert_eq!(installation.cars_root(), Some(Path::new("/games/ac/content/cars")));
        assert_eq!(installation.tracks_root(), Some(Path::new("/games/ac/content/tracks")));
        assert!(!installation.is_valid());
    }

    #[test]
    fn missing_roots_leave_derived_paths_empty() {
        let installation = Installation::new(None, None);
        assert!(installation.setups_root().is_none());
        assert!(installation.cars_root().is_none());
        assert!(!installation.is_detected());
    }

    #[test]
    fn one_root_alone_is_not_valid() {
        let fixture = InstallFixture::new();
        let only_user = Installation::validated(fixture.user_data_root(), "/nonexistent/game");
        assert!(!only_user.is_valid());
        assert!(!only_user.can_write_setups());

        let only_game = Installation::validated("/nonexistent/docs", fixture.game_root());
        assert!(!only_game.is_valid());
    }

    #[test]
    fn both_roots_validate_and_check_writables() {
        let fixture = InstallFixture::new();
        let installation = Installation::validated(fixture.user_data_root(), fixture.game_root());
        assert!(installation.is_valid());
        assert!(installation.can_write_setups());
        assert!(fixture.user_data_root().join("setups").is_dir());
        assert!(!fixture.user_data_root().join("setups").join(WRITE_CHECK_FILE).exists());
    }

    #[test]
    fn setups_blocked_by_a_file_is_not_writable() {
        let fixture = InstallFixture::new();
        std::fs::write(fixture.user_data_root().join("setups"), b"not a directory").unwrap();

        let installation = Installation::validated(fixture.user_data_root(), fixture.game_root());
        assert!(installation.is_valid());
        assert!(!installation.can_write_setups());
    }

    #[test]
    fn detector_uses_first_existing_candidate() {
        let fixture = InstallFixture::new();
        let mut config = fixture.detector_config();
        config.user_data_candidates.insert(0, PathBuf::from("/nonexistent/first"));

        let detector = InstallationDetector::new(config);
        assert_eq!(detector.detect_user_data_root(), Some(fixture.user_data_root()));
        assert_eq!(detector.detect_game_root(), Some(fixture.game_root()));
    }

    #[test]
    fn game_candidate_without_launcher_is_skipped() {
        let fixture = InstallFixture::new();
        std::fs::remove_file(fixture.game_root().join("AssettoCorsa.exe")).unwrap();

        let detector = InstallationDetector::new(fixture.detector_config());
        assert_eq!(detector.detect_game_root(), None);
    }

    #[test]
    fn library_root_needs_marker_and_launcher() {
        let fixture = InstallFixture::new();
        let library = fixture.root().join("Steam");
        let game = library.join("steamapps").join("common").join("assettocorsa");
        std::fs::create_dir_all(&game).unwrap();

        let mut config = DetectorConfig::empty();
        config.library_roots = vec![library.clone()];
        let detector = InstallationDetector::new(config);
        assert_eq!(detector.detect_game_root(), None);

        std::fs::write(library.join("steam.exe"), b"").unwrap();
        assert_eq!(detector.detect_game_root(), None);

        std::fs::write(game.join("AssettoCorsa.exe"), b"").unwrap();
        assert_eq!(detector.detect_game_root(), Some(game));
    }

    #[test]
    fn valid_installation_is_cached_until_invalidated() {
        let fixture = InstallFixture::new();
        let mut detector = InstallationDetector::new(fixture.detector_config());
        assert!(detector.detect_installation().is_valid());

        // Cached: still valid even though detection would now fail
        std::fs::remove_dir_all(fixture.game_root()).unwrap();
        assert!(detector.detect_installation().is_valid());

        detector.invalidate();
        assert!(detector.cached().is_none());
        assert!(!detector.detect_installation().is_valid());
    }

    #[test]
    fn invalid_cache_is_redetected() {
        let fixture = InstallFixture::new();
        let mut detector = InstallationDetector::new(fixture.detector_config())
            .with_installation(Installation::new(None, None));
        assert!(detector.detect_installation().is_valid());
    }

    #[test]
    fn seeded_installation_short_circuits_detection() {
        let fixture = InstallFixture::new();
        let seeded = Installation::validated(fixture.user_data_root(), fixture.game_root());
        let mut detector =
            InstallationDetector::new(DetectorConfig::empty()).with_installation(seeded.clone());
        assert_eq!(detector.detect_installation(), &seeded);
    }

    #[test]
    fn setup_path_joins_ids() {
        let fixture = InstallFixture::new();
        let mut detector = InstallationDetector::new(fixture.detector_config());
        let path = detector.get_setup_path("ks_mazda_rx7", "akina").unwrap();
        assert_eq!(path, fixture.user_data_root().join("setups/ks_mazda_rx7/akina"));
        assert!(!path.exists());

        let (ok, message) = detector.validate_setup_path("ks_mazda_rx7", "akina");
        assert!(ok, "{message}");
        assert!(message.starts_with("Setup path ready"));
        assert!(path.is_dir());
    }

    #[test]
    fn setup_path_conditions_are_reported_distinctly() {
        let mut nothing = InstallationDetector::new(DetectorConfig::empty());
        assert!(nothing.get_setup_path("car", "track").is_none());
        let (ok, not_detected) = nothing.validate_setup_path("car", "track");
        assert!(!ok);

        let fixture = InstallFixture::new();
        let mut config = DetectorConfig::empty();
        config.user_data_candidates = vec![fixture.user_data_root()];
        let mut half = InstallationDetector::new(config);
        let (ok, invalid) = half.validate_setup_path("car", "track");
        assert!(!ok);
        assert!(invalid.contains("game folder"));

        std::fs::write(fixture.user_data_root().join("setups"), b"").unwrap();
        let mut blocked = InstallationDetector::new(fixture.detector_config());
        let (ok, not_writable) = blocked.validate_setup_path("car", "track");
        assert!(!ok);

        assert_ne!(not_detected, invalid);
        assert_ne!(invalid, not_writable);
        assert_ne!(not_detected, not_writable);
    }

    #[test]
    fn identifiers_must_be_single_components() {
        for ok in ["ks_mazda_rx7", "akina", "rea_drift.ini", "ks nordschleife", "a..b"] {
            assert!(check_identifier(ok).is_ok(), "{ok}");
        }
        let bad = ["", " ", ".", "..", "../car", "car/track", "car\\track", "C:", "/abs", "a\0b"];
        for bad in bad {
            assert!(
                matches!(check_identifier(bad), Err(PitboxError::InvalidIdentifier { .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn traversal_ids_never_resolve_to_a_path() {
        let fixture = InstallFixture::new();
        let mut detector = InstallationDetector::new(fixture.detector_config());

        assert!(detector.get_setup_path("..", "akina").is_none());
        assert!(detector.get_setup_path("car", "../../escape").is_none());

        let err = detector.ensure_setup_path("../outside", "akina").unwrap_err();
        assert!(matches!(err, PitboxError::InvalidIdentifier { .. }));
        let err = detector.ensure_setup_path("car", "..").unwrap_err();
        assert!(matches!(err, PitboxError::InvalidIdentifier { .. }));
        assert!(!fixture.user_data_root().join("outside").exists());

        let (ok, message) = detector.validate_setup_path("car", "a/b");
        assert!(!ok);
        assert!(message.contains("Invalid identifier"));
    }

    #[test]
    fn directory_creation_failure_is_its_own_condition() {
        let fixture = InstallFixture::new();
        let mut detector = InstallationDetector::new(fixture.detector_config());
        detector.detect_installation();

        // A file where the car directory should go
        std::fs::write(fixture.user_data_root().join("setups").join("car"), b"").unwrap();
        let err = detector.ensure_setup_path("car", "track").unwrap_err();
        assert!(matches!(err, PitboxError::SetupDirectory { .. }));
    }
}
