//! Car and track catalogs built from the game's `content` folder.
//!
//! ```text
//! content/cars/<car_id>/ui/ui_car.json         name, brand, class, specs
//! content/cars/<car_id>/data/drivetrain.ini    [TRACTION] TYPE (overrides specs)
//! content/tracks/<track_id>/ui/ui_track.json            default layout
//! content/tracks/<track_id>/ui/<layout>/ui_track.json   one per layout
//! ```
//!
//! Scans never fail as a whole. An unreadable or malformed file is logged and
//! its fields fall back to defaults; the item is still catalogued. Catalogs
//! are cached until a forced rescan or [`ContentCatalog::invalidate`].

mod car;
mod ini;
mod json;
mod metadata;
mod track;

pub use car::{Car, DEFAULT_CAR_CLASS, Drivetrain, HIGH_POWER_HP};
pub use ini::IniDocument;
pub use json::{parse_ui_json, preprocess_ui_json, read_ui_json};
pub use metadata::{
    CarMetadata, TrackMetadata, annotated_number, classify_track, parse_annotated_number,
    parse_length_m,
};
pub use track::{Track, TrackType, full_track_id};

use crate::install::InstallationDetector;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Cached catalogs of the installed cars and tracks.
#[derive(Debug, Default)]
pub struct ContentCatalog {
    detector: InstallationDetector,
    cars: BTreeMap<String, Car>,
    tracks: BTreeMap<String, Track>,
}

impl ContentCatalog {
    pub fn new(detector: InstallationDetector) -> Self {
        Self { detector, cars: BTreeMap::new(), tracks: BTreeMap::new() }
    }

    pub fn detector(&self) -> &InstallationDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut InstallationDetector {
        &mut self.detector
    }

    /// Cars keyed by `car_id`.
    ///
    /// A non-empty cache is returned without touching the filesystem unless
    /// `force_refresh` is set.
    pub fn scan_cars(&mut self, force_refresh: bool) -> &BTreeMap<String, Car> {
        if !self.cars.is_empty() && !force_refresh {
            debug!(count = self.cars.len(), "Car catalog cache hit");
            return &self.cars;
        }

        self.cars.clear();
        let Some(cars_root) = self.detector.installation().cars_root().map(Path::to_path_buf)
        else {
            debug!("No cars folder known, car catalog is empty");
            return &self.cars;
        };

        for dir in subdirectories(&cars_root) {
            if let Some(car) = parse_car_dir(&dir) {
                self.cars.insert(car.car_id.clone(), car);
            }
        }

        info!(count = self.cars.len(), path = %cars_root.display(), "Scanned cars");
        &self.cars
    }

    /// Tracks keyed by full id (`track_id` or `track_id/config`).
    pub fn scan_tracks(&mut self, force_refresh: bool) -> &BTreeMap<String, Track> {
        if !self.tracks.is_empty() && !force_refresh {
            debug!(count = self.tracks.len(), "Track catalog cache hit");
            return &self.tracks;
        }

        self.tracks.clear();
        let Some(tracks_root) = self.detector.installation().tracks_root().map(Path::to_path_buf)
        else {
            debug!("No tracks folder known, track catalog is empty");
            return &self.tracks;
        };

        for dir in subdirectories(&tracks_root) {
            for track in parse_track_dir(&dir) {
                self.tracks.insert(track.full_id.clone(), track);
            }
        }

        info!(count = self.tracks.len(), path = %tracks_root.display(), "Scanned tracks");
        &self.tracks
    }

    /// Look up a car, scanning first if the catalog is empty.
    pub fn get_car(&mut self, car_id: &str) -> Option<&Car> {
        if self.cars.is_empty() {
            self.scan_cars(false);
        }
        self.cars.get(car_id)
    }

    /// Look up a track layout; an empty `config` means the default layout.
    pub fn get_track(&mut self, track_id: &str, config: &str) -> Option<&Track> {
        if self.tracks.is_empty() {
            self.scan_tracks(false);
        }
        self.tracks.get(&full_track_id(track_id, config))
    }

    /// Cached cars without scanning.
    pub fn cached_cars(&self) -> &BTreeMap<String, Car> {
        &self.cars
    }

    /// Cached tracks without scanning.
    pub fn cached_tracks(&self) -> &BTreeMap<String, Track> {
        &self.tracks
    }

    /// Drop both catalogs; the next access rescans.
    pub fn invalidate(&mut self) {
        self.cars.clear();
        self.tracks.clear();
        debug!("Content catalogs cleared");
    }
}

/// Immediate subdirectories, sorted by name. Unreadable roots yield none.
fn subdirectories(root: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %root.display(), error = %e, "Cannot list directory");
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> =
        entries.flatten().map(|entry| entry.path()).filter(|path| path.is_dir()).collect();
    dirs.sort();
    dirs
}

fn dir_name(dir: &Path) -> Option<String> {
    let name = dir.file_name()?.to_str();
    if name.is_none() {
        warn!(path = %dir.display(), "Skipping folder with a non UTF-8 name");
    }
    name.map(str::to_string)
}

/// One car from its folder; `None` only when the folder name is unusable.
fn parse_car_dir(dir: &Path) -> Option<Car> {
    let car_id = dir_name(dir)?;
    trace!(car_id = %car_id, "Parsing car");

    let mut sources = Vec::with_capacity(2);

    let ui_json = dir.join("ui").join("ui_car.json");
    if ui_json.is_file() {
        match read_ui_json(&ui_json) {
            Ok(value) => sources.push(CarMetadata::from_ui_json(&value)),
            Err(e) => warn!(car_id = %car_id, error = %e, "Ignoring unreadable ui_car.json"),
        }
    }

    let drivetrain_ini = dir.join("data").join("drivetrain.ini");
    if drivetrain_ini.is_file() {
        match IniDocument::read(&drivetrain_ini) {
            Ok(ini) => sources.push(CarMetadata::from_drivetrain_ini(&ini)),
            Err(e) => warn!(car_id = %car_id, error = %e, "Ignoring unreadable drivetrain.ini"),
        }
    }

    Some(Car::from_metadata(car_id, dir.to_path_buf(), CarMetadata::merge_all(sources)))
}

/// Every layout of a track folder.
///
/// Folders without `ui/` are not tracks. Layout subfolders of `ui/` that hold
/// a `ui_track.json` each become a track; with none, the folder is a single
/// default-layout track. A top-level `ui/ui_track.json` next to layouts
/// supplies the fields a layout's own file leaves out.
fn parse_track_dir(dir: &Path) -> Vec<Track> {
    let Some(track_id) = dir_name(dir) else {
        return Vec::new();
    };
    let ui_dir = dir.join("ui");
    if !ui_dir.is_dir() {
        trace!(track_id = %track_id, "Skipping folder without ui/");
        return Vec::new();
    }

    let layouts: Vec<(String, PathBuf)> = subdirectories(&ui_dir)
        .into_iter()
        .filter(|layout| layout.join("ui_track.json").is_file())
        .filter_map(|layout| Some((dir_name(&layout)?, layout)))
        .collect();

    let shared = read_track_metadata(&track_id, &ui_dir.join("ui_track.json"));
    if layouts.is_empty() {
        return vec![Track::from_metadata(track_id, "", dir.to_path_buf(), shared)];
    }

    layouts
        .into_iter()
        .map(|(config, layout_dir)| {
            let own = read_track_metadata(&track_id, &layout_dir.join("ui_track.json"));
            let meta = shared.clone().merge(own);
            Track::from_metadata(track_id.clone(), config, dir.to_path_buf(), meta)
        })
        .collect()
}

fn read_track_metadata(track_id: &str, path: &Path) -> TrackMetadata {
    if !path.is_file() {
        return TrackMetadata::default();
    }
    match read_ui_json(path) {
        Ok(value) => TrackMetadata::from_ui_json(&value),
        Err(e) => {
            warn!(track_id = %track_id, error = %e, "Ignoring unreadable ui_track.json");
            TrackMetadata::default()
        }
    }
}
