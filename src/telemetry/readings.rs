//! Value types produced by the aggregator.

use crate::layout::{GraphicsPage, PhysicsPage, SessionType, SimStatus, StaticPage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ambient air temperature reported while no physics data is available.
pub const DEFAULT_AMBIENT_C: f32 = 25.0;
/// Road temperature reported while no physics data is available.
pub const DEFAULT_ROAD_C: f32 = 30.0;
/// Rev limit assumed when the static page reports none.
pub const FALLBACK_MAX_RPM: i32 = 8000;

/// Temperatures that drive tyre pressure decisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ThermalReading {
    pub ambient_c: f32,
    pub road_c: f32,
    /// Mean of the four tyre core temperatures; 0.0 means no data.
    pub tire_core_avg_c: f32,
}

impl Default for ThermalReading {
    fn default() -> Self {
        Self { ambient_c: DEFAULT_AMBIENT_C, road_c: DEFAULT_ROAD_C, tire_core_avg_c: 0.0 }
    }
}

impl ThermalReading {
    pub fn from_physics(physics: &PhysicsPage) -> Self {
        Self {
            ambient_c: physics.air_temp,
            road_c: physics.road_temp,
            tire_core_avg_c: tire_core_average(&physics.tyre_core_temperature),
        }
    }
}

/// Arithmetic mean of four core temperatures.
///
/// Four exact zeros are the simulator's "not yet sampled" value and average
/// to 0.0.
pub fn tire_core_average(core: &[f32; 4]) -> f32 {
    if core.iter().all(|&t| t == 0.0) {
        return 0.0;
    }
    core.iter().sum::<f32>() / 4.0
}

/// One value per wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CornerValues {
    pub front_left: f32,
    pub front_right: f32,
    pub rear_left: f32,
    pub rear_right: f32,
}

impl CornerValues {
    /// Build from a page array ordered FL, FR, RL, RR.
    pub fn from_wheels(wheels: [f32; 4]) -> Self {
        let [front_left, front_right, rear_left, rear_right] = wheels;
        Self { front_left, front_right, rear_left, rear_right }
    }

    pub fn to_wheels(self) -> [f32; 4] {
        [self.front_left, self.front_right, self.rear_left, self.rear_right]
    }
}

/// Which car is on which track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarTrackIdentity {
    pub car_model: String,
    pub track: String,
    /// Empty for the default layout.
    pub track_config: String,
    /// N·m
    pub max_torque: f32,
}

impl CarTrackIdentity {
    pub fn from_static(page: &StaticPage) -> Self {
        Self {
            car_model: page.car_model.to_string_lossy(),
            track: page.track.to_string_lossy(),
            track_config: page.track_configuration.to_string_lossy(),
            max_torque: page.max_torque,
        }
    }
}

/// Dashboard summary combining all three pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LiveData {
    pub is_connected: bool,
    pub status: SimStatus,
    pub session_type: SessionType,

    pub car_model: String,
    pub track: String,
    pub track_config: String,

    pub speed_kmh: f32,
    pub rpm: i32,
    pub max_rpm: i32,
    pub gear: i32,
    pub gas: f32,
    pub brake: f32,
    pub steer_angle: f32,
    pub brake_bias: f32,

    pub g_lateral: f32,
    pub g_longitudinal: f32,

    pub tyre_pressure: CornerValues,
    pub tyre_core_temp: CornerValues,
    pub tyre_wear: CornerValues,

    pub is_in_pit: bool,
    pub is_in_pit_lane: bool,
    pub completed_laps: i32,
    pub current_lap_time: String,
    pub best_lap_time: String,
    pub last_lap_time: String,

    pub air_temp: f32,
    pub road_temp: f32,
}

impl Default for LiveData {
    fn default() -> Self {
        Self {
            is_connected: false,
            status: SimStatus::Off,
            session_type: SessionType::Unknown,
            car_model: String::new(),
            track: String::new(),
            track_config: String::new(),
            speed_kmh: 0.0,
            rpm: 0,
            max_rpm: FALLBACK_MAX_RPM,
            gear: 0,
            gas: 0.0,
            brake: 0.0,
            steer_angle: 0.0,
            brake_bias: 0.0,
            g_lateral: 0.0,
            g_longitudinal: 0.0,
            tyre_pressure: CornerValues::default(),
            tyre_core_temp: CornerValues::default(),
            tyre_wear: CornerValues::default(),
            is_in_pit: false,
            is_in_pit_lane: false,
            completed_laps: 0,
            current_lap_time: String::new(),
            best_lap_time: String::new(),
            last_lap_time: String::new(),
            air_temp: 0.0,
            road_temp: 0.0,
        }
    }
}

impl LiveData {
    pub(crate) fn apply_static(&mut self, page: &StaticPage) {
        self.car_model = page.car_model.to_string_lossy();
        self.track = page.track.to_string_lossy();
        self.track_config = page.track_configuration.to_string_lossy();
        self.max_rpm = if page.max_rpm > 0 { page.max_rpm } else { FALLBACK_MAX_RPM };
    }

    pub(crate) fn apply_graphics(&mut self, page: &GraphicsPage) {
        self.status = page.sim_status();
        self.session_type = page.session_type();
        self.is_in_pit = page.is_in_pit != 0;
        self.is_in_pit_lane = page.is_in_pit_lane != 0;
        self.completed_laps = page.completed_laps;
        self.current_lap_time = page.current_time.to_string_lossy();
        self.best_lap_time = page.best_time.to_string_lossy();
        self.last_lap_time = page.last_time.to_string_lossy();
    }

    pub(crate) fn apply_physics(&mut self, page: &PhysicsPage) {
        self.speed_kmh = page.speed_kmh;
        self.rpm = page.rpms;
        self.gear = page.gear;
        self.gas = page.gas;
        self.brake = page.brake;
        self.steer_angle = page.steer_angle;
        self.brake_bias = page.brake_bias;
        self.air_temp = page.air_temp;
        self.road_temp = page.road_temp;
        self.g_lateral = page.acc_g[0];
        self.g_longitudinal = page.acc_g[2];
        self.tyre_pressure = CornerValues::from_wheels(page.wheels_pressure);
        self.tyre_core_temp = CornerValues::from_wheels(page.tyre_core_temperature);
        self.tyre_wear = CornerValues::from_wheels(page.tyre_wear);
    }
}

/// Everything setup generation needs from one poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TelemetrySnapshot {
    pub thermal: ThermalReading,
    pub identity: CarTrackIdentity,
    pub tire_pressures: CornerValues,
    pub suspension_travel: CornerValues,
    pub is_connected: bool,
    /// Packet id of the physics page the snapshot was built from.
    pub physics_packet_id: Option<i32>,
}

/// A value in the flattened telemetry map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Bool(bool),
    Number(f32),
    Text(String),
}

impl TelemetrySnapshot {
    /// Flatten into the key-value form consumed by setup generation.
    pub fn to_map(&self) -> BTreeMap<String, TelemetryValue> {
        let mut map = BTreeMap::new();
        let mut number = |key: &str, value: f32| {
            map.insert(key.to_string(), TelemetryValue::Number(value));
        };

        number("ambient_temp", self.thermal.ambient_c);
        number("road_temp", self.thermal.road_c);
        number("tire_temp_avg", self.thermal.tire_core_avg_c);
        number("max_torque", self.identity.max_torque);

        for (prefix, values) in
            [("PRESSURE", self.tire_pressures), ("TRAVEL", self.suspension_travel)]
        {
            number(&format!("{prefix}_LF"), values.front_left);
            number(&format!("{prefix}_RF"), values.front_right);
            number(&format!("{prefix}_LR"), values.rear_left);
            number(&format!("{prefix}_RR"), values.rear_right);
        }

        map.insert("car_model".into(), TelemetryValue::Text(self.identity.car_model.clone()));
        map.insert("track".into(), TelemetryValue::Text(self.identity.track.clone()));
        map.insert("track_config".into(), TelemetryValue::Text(self.identity.track_config.clone()));
        map.insert("is_connected".into(), TelemetryValue::Bool(self.is_connected));
        map
    }
}
