//! One-stop access to the installation and its content.

use crate::Result;
use crate::content::{Car, ContentCatalog, Drivetrain, IniDocument, Track, TrackType};
use crate::install::{DetectorConfig, InstallationDetector};
use crate::setups::{GENERIC_TRACK, SetupFile, SetupFolder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Summary of the last [`Pitbox::connect`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ConnectionStatus {
    /// Both roots found.
    pub is_connected: bool,
    pub user_data_found: bool,
    pub game_found: bool,
    pub can_write: bool,
    pub user_data_root: Option<PathBuf>,
    pub game_root: Option<PathBuf>,
    pub cars_count: usize,
    pub tracks_count: usize,
    /// Empty when connected.
    pub error_message: String,
}

/// Installation, catalogs and setup folders behind one handle.
///
/// ```rust,no_run
/// use pitbox::Pitbox;
///
/// let mut pitbox = Pitbox::default();
/// let status = pitbox.connect();
/// if status.is_connected {
///     for car in pitbox.drift_cars() {
///         println!("{} ({})", car.display_name, car.drivetrain);
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct Pitbox {
    catalog: ContentCatalog,
    status: Option<ConnectionStatus>,
}

impl Pitbox {
    pub fn new(detector: InstallationDetector) -> Self {
        Self { catalog: ContentCatalog::new(detector), status: None }
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self::new(InstallationDetector::new(config))
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut ContentCatalog {
        &mut self.catalog
    }

    /// Detect the installation and, when valid, scan both catalogs.
    pub fn connect(&mut self) -> ConnectionStatus {
        let installation = self.catalog.detector_mut().detect_installation().clone();

        let mut status = ConnectionStatus {
            user_data_found: installation.user_data_root().is_some(),
            game_found: installation.game_root().is_some(),
            user_data_root: installation.user_data_root().map(PathBuf::from),
            game_root: installation.game_root().map(PathBuf::from),
            ..ConnectionStatus::default()
        };

        if installation.is_valid() {
            status.is_connected = true;
            status.can_write = installation.can_write_setups();
            status.cars_count = self.catalog.scan_cars(false).len();
            status.tracks_count = self.catalog.scan_tracks(false).len();
            info!(
                cars = status.cars_count,
                tracks = status.tracks_count,
                can_write = status.can_write,
                "Connected to Assetto Corsa installation"
            );
        } else {
            status.error_message = "Assetto Corsa installation not found or invalid".to_string();
            debug!(
                user_data_found = status.user_data_found,
                game_found = status.game_found,
                "Installation not usable"
            );
        }

        self.status = Some(status.clone());
        status
    }

    /// Last status, connecting on first use.
    pub fn status(&mut self) -> &ConnectionStatus {
        if self.status.is_none() {
            self.connect();
        }
        self.status.get_or_insert_with(ConnectionStatus::default)
    }

    pub fn is_connected(&mut self) -> bool {
        self.status().is_connected
    }

    /// Clear both catalogs and connect again.
    ///
    /// A cached valid installation is kept; use [`Self::redetect`] to search
    /// the filesystem again.
    pub fn refresh(&mut self) -> ConnectionStatus {
        self.status = None;
        self.catalog.invalidate();
        self.connect()
    }

    /// Like [`Self::refresh`], also dropping the cached installation.
    pub fn redetect(&mut self) -> ConnectionStatus {
        self.catalog.detector_mut().invalidate();
        self.refresh()
    }

    /// All cars; empty when not connected.
    pub fn cars(&mut self, force_refresh: bool) -> Vec<&Car> {
        if !self.is_connected() {
            return Vec::new();
        }
        self.catalog.scan_cars(force_refresh).values().collect()
    }

    /// All track layouts; empty when not connected.
    pub fn tracks(&mut self, force_refresh: bool) -> Vec<&Track> {
        if !self.is_connected() {
            return Vec::new();
        }
        self.catalog.scan_tracks(force_refresh).values().collect()
    }

    pub fn car(&mut self, car_id: &str) -> Option<&Car> {
        self.catalog.get_car(car_id)
    }

    pub fn track(&mut self, track_id: &str, config: &str) -> Option<&Track> {
        self.catalog.get_track(track_id, config)
    }

    /// Check a car and a `track` or `track/config` id both exist.
    pub fn validate_car_track(&mut self, car_id: &str, track_full_id: &str) -> (bool, String) {
        let Some(car_name) = self.catalog.get_car(car_id).map(|c| c.display_name.clone()) else {
            return (false, format!("Car not found: {car_id}"));
        };

        let (track_id, config) = track_full_id.split_once('/').unwrap_or((track_full_id, ""));
        match self.catalog.get_track(track_id, config) {
            Some(track) => (true, format!("Valid: {car_name} on {}", track.display_name)),
            None => (false, format!("Track not found: {track_full_id}")),
        }
    }

    pub fn setup_directory(&mut self, car_id: &str, track_id: &str) -> Option<PathBuf> {
        self.catalog.detector_mut().get_setup_path(car_id, track_id)
    }

    /// Create the setup directory, reporting success and a message.
    pub fn ensure_setup_directory(&mut self, car_id: &str, track_id: &str) -> (bool, String) {
        self.catalog.detector_mut().validate_setup_path(car_id, track_id)
    }

    /// Setup files for a car/track pair, newest first.
    pub fn list_setups(&mut self, car_id: &str, track_id: &str) -> Result<Vec<SetupFile>> {
        self.setup_folder(car_id, track_id)?.list()
    }

    pub fn load_setup(
        &mut self,
        car_id: &str,
        track_id: &str,
        file_name: &str,
    ) -> Result<IniDocument> {
        self.setup_folder(car_id, track_id)?.load(file_name)
    }

    /// Save a setup for a car/track pair and mirror it to the car's generic
    /// folder, where the simulator lists it on every track.
    ///
    /// A missing `[CAR] MODEL` is filled with `car_id`. The generic copy is
    /// best effort and never fails the save.
    pub fn save_setup(
        &mut self,
        car_id: &str,
        track_id: &str,
        file_name: &str,
        setup: &IniDocument,
        overwrite: bool,
    ) -> Result<PathBuf> {
        let mut setup = setup.clone();
        if setup.get("CAR", "MODEL").is_none() {
            setup.set("CAR", "MODEL", car_id);
        }

        let detector = self.catalog.detector_mut();
        let folder = SetupFolder::new(detector.ensure_setup_path(car_id, track_id)?);
        let path = folder.save(file_name, &setup, overwrite)?;

        if track_id != GENERIC_TRACK {
            let generic = detector
                .ensure_setup_path(car_id, GENERIC_TRACK)
                .and_then(|dir| SetupFolder::new(dir).save(file_name, &setup, overwrite));
            if let Err(e) = generic {
                warn!(car_id = %car_id, error = %e, "Setup not mirrored to generic folder");
            }
        }
        Ok(path)
    }

    /// Copy a setup next to itself under a timestamped name.
    pub fn backup_setup(
        &mut self,
        car_id: &str,
        track_id: &str,
        file_name: &str,
    ) -> Result<PathBuf> {
        self.setup_folder(car_id, track_id)?.backup(file_name)
    }

    pub fn delete_setup(
        &mut self,
        car_id: &str,
        track_id: &str,
        file_name: &str,
    ) -> Result<PathBuf> {
        self.setup_folder(car_id, track_id)?.delete(file_name)
    }

    fn setup_folder(&mut self, car_id: &str, track_id: &str) -> Result<SetupFolder> {
        let dir = self.catalog.detector_mut().checked_setup_path(car_id, track_id)?;
        Ok(SetupFolder::new(dir))
    }

    pub fn cars_by_drivetrain(&mut self, drivetrain: Drivetrain) -> Vec<&Car> {
        self.cars(false).into_iter().filter(|c| c.drivetrain == drivetrain).collect()
    }

    pub fn tracks_by_type(&mut self, track_type: TrackType) -> Vec<&Track> {
        self.tracks(false).into_iter().filter(|t| t.track_type == track_type).collect()
    }

    pub fn touge_tracks(&mut self) -> Vec<&Track> {
        self.tracks_by_type(TrackType::Touge)
    }

    pub fn drift_cars(&mut self) -> Vec<&Car> {
        self.cars(false).into_iter().filter(|c| c.is_drift_car()).collect()
    }

    /// Case-insensitive match on name, brand or id. Empty queries match all.
    pub fn search_cars(&mut self, query: &str) -> Vec<&Car> {
        let query = query.to_lowercase();
        self.cars(false)
            .into_iter()
            .filter(|c| {
                query.is_empty()
                    || c.display_name.to_lowercase().contains(&query)
                    || c.brand.to_lowercase().contains(&query)
                    || c.car_id.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Case-insensitive match on name or id. Empty queries match all.
    pub fn search_tracks(&mut self, query: &str) -> Vec<&Track> {
        let query = query.to_lowercase();
        self.tracks(false)
            .into_iter()
            .filter(|t| {
                query.is_empty()
                    || t.display_name.to_lowercase().contains(&query)
                    || t.track_id.to_lowercase().contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PitboxError;
    use crate::test_utils::InstallFixture;

    fn populated() -> (InstallFixture, Pitbox) {
        let fixture = InstallFixture::new();
        fixture.car("ks_toyota_ae86").ui_json(
            r#"{"name": "Toyota AE86 Tuned", "brand": "Toyota", "class": "street",
                "specs": {"bhp": "150bhp", "weight": "950kg"}}"#,
        );
        fixture.car("ks_audi_r8").ui_json(
            r#"{"name": "Audi R8 V10", "brand": "Audi", "class": "race",
                "specs": {"bhp": "540 bhp", "drivetrain": "AWD"}}"#,
        );
        fixture.track("akina").layout_json("downhill", r#"{"name": "Akina Downhill", "tags": ["touge"]}"#);
        fixture.track("akina").layout_json("uphill", r#"{"name": "Akina Uphill"}"#);
        fixture.track("monza").ui_json(r#"{"name": "Monza", "tags": ["circuit"]}"#);
        let pitbox = Pitbox::with_config(fixture.detector_config());
        (fixture, pitbox)
    }

    #[test]
    fn connect_reports_counts() {
        let _ = tracing_subscriber::fmt::try_init();
        let (_fixture, mut pitbox) = populated();
        let status = pitbox.connect();
        assert!(status.is_connected);
        assert!(status.user_data_found && status.game_found);
        assert!(status.can_write);
        assert_eq!(status.cars_count, 2);
        assert_eq!(status.tracks_count, 3);
        assert!(status.error_message.is_empty());
    }

    #[test]
    fn missing_installation_is_reported_not_raised() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut pitbox = Pitbox::with_config(DetectorConfig::empty());
        let status = pitbox.connect();
        assert!(!status.is_connected);
        assert!(!status.user_data_found);
        assert!(!status.error_message.is_empty());
        assert!(pitbox.cars(false).is_empty());
        assert!(pitbox.tracks(true).is_empty());
    }

    #[test]
    fn status_connects_lazily() {
        let (_fixture, mut pitbox) = populated();
        assert_eq!(pitbox.status().cars_count, 2);
        assert!(pitbox.is_connected());
    }

    #[test]
    fn refresh_picks_up_new_content() {
        let (fixture, mut pitbox) = populated();
        pitbox.connect();
        fixture.car("new_car");
        assert_eq!(pitbox.cars(false).len(), 2);
        assert_eq!(pitbox.refresh().cars_count, 3);
    }

    #[test]
    fn filters_and_searches() {
        let (_fixture, mut pitbox) = populated();

        let awd: Vec<_> =
            pitbox.cars_by_drivetrain(Drivetrain::Awd).iter().map(|c| c.car_id.clone()).collect();
        assert_eq!(awd, vec!["ks_audi_r8"]);

        let drift: Vec<_> = pitbox.drift_cars().iter().map(|c| c.car_id.clone()).collect();
        assert_eq!(drift, vec!["ks_toyota_ae86"]);

        let touge: Vec<_> = pitbox.touge_tracks().iter().map(|t| t.full_id.clone()).collect();
        assert_eq!(touge, vec!["akina/downhill", "akina/uphill"]);
        assert_eq!(pitbox.tracks_by_type(TrackType::Circuit).len(), 1);

        assert_eq!(pitbox.search_cars("TOYOTA").len(), 1);
        assert_eq!(pitbox.search_cars("r8").len(), 1);
        assert_eq!(pitbox.search_cars("").len(), 2);
        assert_eq!(pitbox.search_tracks("akina").len(), 2);
        assert_eq!(pitbox.search_tracks("mon").len(), 1);
        assert!(pitbox.search_tracks("spa").is_empty());
    }

    #[test]
    fn validate_car_track_messages() {
        let (_fixture, mut pitbox) = populated();

        let (ok, message) = pitbox.validate_car_track("ks_toyota_ae86", "akina/downhill");
        assert!(ok);
        assert_eq!(message, "Valid: Toyota AE86 Tuned on Akina Downhill");

        let (ok, message) = pitbox.validate_car_track("ks_toyota_ae86", "monza");
        assert!(ok, "{message}");

        let (ok, message) = pitbox.validate_car_track("missing", "monza");
        assert!(!ok);
        assert_eq!(message, "Car not found: missing");

        let (ok, message) = pitbox.validate_car_track("ks_audi_r8", "akina");
        assert!(!ok);
        assert_eq!(message, "Track not found: akina");
    }

    #[test]
    fn setup_directories() {
        let (fixture, mut pitbox) = populated();
        let expected = fixture.user_data_root().join("setups").join("ks_audi_r8").join("monza");
        assert_eq!(pitbox.setup_directory("ks_audi_r8", "monza"), Some(expected.clone()));

        let (ok, _) = pitbox.ensure_setup_directory("ks_audi_r8", "monza");
        assert!(ok);
        assert!(expected.is_dir());
    }

    #[test]
    fn setup_files_round_trip_through_the_installation() {
        let _ = tracing_subscriber::fmt::try_init();
        let (fixture, mut pitbox) = populated();
        assert!(pitbox.list_setups("ks_toyota_ae86", "akina").unwrap().is_empty());

        let mut setup = IniDocument::default();
        setup.set("PRESSURE_LF", "VALUE", 26);
        let path =
            pitbox.save_setup("ks_toyota_ae86", "akina", "rea_drift", &setup, false).unwrap();
        let setups_root = fixture.user_data_root().join("setups");
        assert_eq!(path, setups_root.join("ks_toyota_ae86/akina/rea_drift.ini"));
        assert!(setups_root.join("ks_toyota_ae86/generic/rea_drift.ini").is_file());

        let loaded = pitbox.load_setup("ks_toyota_ae86", "akina", "rea_drift").unwrap();
        assert_eq!(loaded.get("PRESSURE_LF", "VALUE"), Some("26"));
        assert_eq!(loaded.get("CAR", "MODEL"), Some("ks_toyota_ae86"));

        let backup = pitbox.backup_setup("ks_toyota_ae86", "akina", "rea_drift").unwrap();
        let listed = pitbox.list_setups("ks_toyota_ae86", "akina").unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|s| s.path == backup));
        assert!(listed.iter().all(|s| s.is_generated));

        pitbox.delete_setup("ks_toyota_ae86", "akina", "rea_drift").unwrap();
        let listed = pitbox.list_setups("ks_toyota_ae86", "akina").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].path, backup);
        assert_eq!(pitbox.list_setups("ks_toyota_ae86", "generic").unwrap().len(), 1);
    }

    #[test]
    fn setup_operations_report_why_they_failed() {
        let (_fixture, mut pitbox) = populated();
        let setup = IniDocument::default();

        let err = pitbox.save_setup("../ks_audi_r8", "monza", "x", &setup, false).unwrap_err();
        assert!(matches!(err, PitboxError::InvalidIdentifier { .. }));
        let err = pitbox.delete_setup("ks_audi_r8", "monza", "missing").unwrap_err();
        assert!(matches!(err, PitboxError::SetupNotFound { .. }));

        pitbox.save_setup("ks_audi_r8", "monza", "base", &setup, false).unwrap();
        let err = pitbox.save_setup("ks_audi_r8", "monza", "base", &setup, false).unwrap_err();
        assert!(matches!(err, PitboxError::SetupExists { .. }));

        let mut nowhere = Pitbox::with_config(DetectorConfig::empty());
        let err = nowhere.list_setups("ks_audi_r8", "monza").unwrap_err();
        assert!(matches!(err, PitboxError::InstallationNotDetected));
    }
}
