//! Rust library for Assetto Corsa telemetry and content discovery.
//!
//! Pitbox reads the simulator's shared memory pages while it runs and finds the
//! cars, tracks and setup folders of an installation on disk.
//!
//! # Features
//!
//! - **Live Telemetry**: Pull-based reads of the physics, graphics and static
//!   pages on Windows, with a packet id guard against torn frames
//! - **Streams**: Interval-driven snapshot streams that skip repeated frames
//! - **Installation Detection**: Steam library search with a write check on
//!   the setups folder
//! - **Content Catalogs**: Tolerant parsing of `ui_car.json`, `ui_track.json`
//!   and `drivetrain.ini`
//! - **Setup Files**: Listing, saving, backing up and deleting `.ini` setups
//!   per car and track
//!
//! ## Example (content)
//!
//! ```rust,no_run
//! use pitbox::{Drivetrain, Pitbox};
//!
//! let mut pitbox = Pitbox::default();
//! let status = pitbox.connect();
//! println!("{} cars, {} tracks", status.cars_count, status.tracks_count);
//!
//! for car in pitbox.cars_by_drivetrain(Drivetrain::Rwd) {
//!     println!("{} {} hp", car.display_name, car.power_hp);
//! }
//! ```
//!
//! ## Example (live telemetry)
//!
//! ```rust,no_run
//! use pitbox::TelemetryAggregator;
//!
//! let mut telemetry = TelemetryAggregator::default();
//! if telemetry.connect().is_ok() {
//!     let thermal = telemetry.thermal();
//!     println!("air {:.1} °C, road {:.1} °C", thermal.ambient_c, thermal.road_c);
//! }
//! ```

// Core types and error handling
mod error;
pub mod layout;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;

// Live telemetry
pub mod session;
pub mod stream;
pub mod telemetry;

// Installation and content
pub mod connector;
pub mod content;
pub mod install;
pub mod setups;

// Platform-specific modules
#[cfg(windows)]
pub mod windows;

// Core exports
pub use error::*;

// Telemetry exports
pub use session::{MappedRegion, MemoryBackend, SharedMemorySession};
pub use telemetry::{
    LiveData, TelemetryAggregator, TelemetrySnapshot, TelemetryValue, ThermalReading,
};

// Content exports
pub use connector::{ConnectionStatus, Pitbox};
pub use content::{Car, ContentCatalog, Drivetrain, IniDocument, Track, TrackType};
pub use install::{DetectorConfig, Installation, InstallationDetector};
pub use setups::{SetupFile, SetupFolder};
