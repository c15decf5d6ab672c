//! Derived readings over the latest shared memory pages.
//!
//! Every view falls back to a documented default when the session is
//! disconnected or a read fails, so callers never branch on connectivity:
//!
//! | View | Fallback |
//! |------|----------|
//! | [`TelemetryAggregator::thermal`] | ambient 25 °C, road 30 °C, tyre average 0 |
//! | [`TelemetryAggregator::tire_pressures`] | all corners 0 |
//! | [`TelemetryAggregator::suspension_travel`] | all corners 0 |
//! | [`TelemetryAggregator::identity`] | empty strings, torque 0 |
//!
//! ```rust
//! use pitbox::telemetry::TelemetryAggregator;
//!
//! let mut telemetry = TelemetryAggregator::default();
//! let thermal = telemetry.thermal();
//! if !telemetry.is_connected() {
//!     assert_eq!(thermal.ambient_c, 25.0);
//! }
//! ```

mod readings;

pub use readings::{
    CarTrackIdentity, CornerValues, DEFAULT_AMBIENT_C, DEFAULT_ROAD_C, FALLBACK_MAX_RPM, LiveData,
    TelemetrySnapshot, TelemetryValue, ThermalReading, tire_core_average,
};

use crate::Result;
use crate::layout::{GraphicsPage, PhysicsPage, SimStatus, StaticPage};
use crate::session::SharedMemorySession;
use tracing::{debug, trace};

/// Turns raw pages into the readings setup generation consumes.
#[derive(Debug, Default)]
pub struct TelemetryAggregator {
    session: SharedMemorySession,
    last_car: String,
    last_track: String,
}

impl TelemetryAggregator {
    pub fn new(session: SharedMemorySession) -> Self {
        Self { session, last_car: String::new(), last_track: String::new() }
    }

    pub fn session(&self) -> &SharedMemorySession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SharedMemorySession {
        &mut self.session
    }

    pub fn into_session(self) -> SharedMemorySession {
        self.session
    }

    pub fn connect(&mut self) -> Result<()> {
        self.session.connect()
    }

    pub fn disconnect(&mut self) {
        self.session.disconnect()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn thermal(&mut self) -> ThermalReading {
        self.physics().map(|p| ThermalReading::from_physics(&p)).unwrap_or_default()
    }

    /// Hot tyre pressures in PSI.
    pub fn tire_pressures(&mut self) -> CornerValues {
        self.physics().map(|p| CornerValues::from_wheels(p.wheels_pressure)).unwrap_or_default()
    }

    /// Suspension compression in metres.
    pub fn suspension_travel(&mut self) -> CornerValues {
        self.physics().map(|p| CornerValues::from_wheels(p.suspension_travel)).unwrap_or_default()
    }

    pub fn identity(&mut self) -> CarTrackIdentity {
        self.statics().map(|s| CarTrackIdentity::from_static(&s)).unwrap_or_default()
    }

    /// Whether the car or track differs from the last call that saw them.
    ///
    /// Empty names (disconnected, or the simulator still loading) never
    /// report a change and do not replace the remembered values.
    pub fn car_track_changed(&mut self) -> bool {
        let identity = self.identity();
        let changed = identity.car_model != self.last_car || identity.track != self.last_track;

        if !identity.car_model.is_empty() {
            self.last_car = identity.car_model.clone();
        }
        if !identity.track.is_empty() {
            self.last_track = identity.track.clone();
        }

        let changed = changed && !identity.car_model.is_empty() && !identity.track.is_empty();
        if changed {
            debug!(car = %identity.car_model, track = %identity.track, "Car or track changed");
        }
        changed
    }

    /// Dashboard view of all three pages.
    ///
    /// Attempts to connect first when disconnected; a failed attempt yields
    /// [`LiveData::default`].
    pub fn live_data(&mut self) -> LiveData {
        if !self.session.is_connected() && self.session.connect().is_err() {
            return LiveData::default();
        }

        let mut data = LiveData { is_connected: true, ..LiveData::default() };
        if let Some(page) = self.statics() {
            data.apply_static(&page);
        }
        if let Some(page) = self.graphics() {
            data.apply_graphics(&page);
        }
        if let Some(page) = self.physics() {
            data.apply_physics(&page);
        }
        data
    }

    /// Connected and in a live or paused session.
    pub fn is_sim_running(&mut self) -> bool {
        matches!(
            self.graphics().map(|g| g.sim_status()),
            Some(SimStatus::Live | SimStatus::Pause)
        )
    }

    /// In the pit box or the pit lane.
    pub fn is_in_pits(&mut self) -> bool {
        self.graphics().is_some_and(|g| g.is_in_pit != 0 || g.is_in_pit_lane != 0)
    }

    /// All setup-generation inputs from a single physics and static read.
    pub fn snapshot(&mut self) -> TelemetrySnapshot {
        let physics = self.physics();
        let statics = self.statics();

        TelemetrySnapshot {
            thermal: physics.as_ref().map(ThermalReading::from_physics).unwrap_or_default(),
            identity: statics.as_ref().map(CarTrackIdentity::from_static).unwrap_or_default(),
            tire_pressures: physics
                .as_ref()
                .map(|p| CornerValues::from_wheels(p.wheels_pressure))
                .unwrap_or_default(),
            suspension_travel: physics
                .as_ref()
                .map(|p| CornerValues::from_wheels(p.suspension_travel))
                .unwrap_or_default(),
            is_connected: self.session.is_connected(),
            physics_packet_id: physics.map(|p| p.packet_id),
        }
    }

    fn physics(&mut self) -> Option<PhysicsPage> {
        match self.session.read_physics() {
            Ok(page) => page.copied(),
            Err(e) => {
                debug!(error = %e, "Physics read failed, using fallback values");
                None
            }
        }
    }

    fn graphics(&mut self) -> Option<GraphicsPage> {
        match self.session.read_graphics() {
            Ok(page) => page.copied(),
            Err(e) => {
                debug!(error = %e, "Graphics read failed, using fallback values");
                None
            }
        }
    }

    fn statics(&mut self) -> Option<StaticPage> {
        match self.session.read_static() {
            Ok(page) => {
                trace!(connected = page.is_some(), "Static page read");
                page.copied()
            }
            Err(e) => {
                debug!(error = %e, "Static read failed, using fallback values");
                None
            }
        }
    }
}
