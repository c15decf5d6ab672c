//! `SPageFileGraphic`, session and HUD state.

use super::{LayoutReader, RecordLayout, WideStr};
use serde::{Deserialize, Serialize};

/// Maximum number of cars the page carries positions for.
pub const MAX_CARS: usize = 60;

pub mod offsets {
    pub const PACKET_ID: usize = 0;
    pub const STATUS: usize = 4;
    pub const SESSION: usize = 8;
    pub const CURRENT_TIME: usize = 12;
    pub const LAST_TIME: usize = 42;
    pub const BEST_TIME: usize = 72;
    pub const COMPLETED_LAPS: usize = 132;
    pub const IS_IN_PIT: usize = 160;
    pub const TYRE_COMPOUND: usize = 176;
    pub const REPLAY_TIME_MULTIPLIER: usize = 244;
    pub const ACTIVE_CARS: usize = 252;
    pub const CAR_COORDINATES: usize = 256;
    pub const CAR_ID: usize = 976;
    pub const PLAYER_CAR_ID: usize = 1216;
    pub const IS_IN_PIT_LANE: usize = 1236;
    pub const WIND_DIRECTION: usize = 1252;
}

/// `AC_STATUS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum SimStatus {
    #[default]
    Off,
    Replay,
    Live,
    Pause,
}

impl SimStatus {
    /// Unknown values read as [`SimStatus::Off`].
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => SimStatus::Replay,
            2 => SimStatus::Live,
            3 => SimStatus::Pause,
            _ => SimStatus::Off,
        }
    }
}

/// `AC_SESSION_TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum SessionType {
    #[default]
    Unknown,
    Practice,
    Qualify,
    Race,
    Hotlap,
    TimeAttack,
    Drift,
    Drag,
}

impl SessionType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => SessionType::Practice,
            1 => SessionType::Qualify,
            2 => SessionType::Race,
            3 => SessionType::Hotlap,
            4 => SessionType::TimeAttack,
            5 => SessionType::Drift,
            6 => SessionType::Drag,
            _ => SessionType::Unknown,
        }
    }
}

/// `AC_FLAG_TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum FlagType {
    #[default]
    None,
    Blue,
    Yellow,
    Black,
    White,
    Checkered,
    Penalty,
}

impl FlagType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => FlagType::Blue,
            2 => FlagType::Yellow,
            3 => FlagType::Black,
            4 => FlagType::White,
            5 => FlagType::Checkered,
            6 => FlagType::Penalty,
            _ => FlagType::None,
        }
    }
}

/// Session, timing and HUD state.
///
/// Enum-typed fields are kept raw; use the accessor methods for typed views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicsPage {
    pub packet_id: i32,
    pub status: i32,
    pub session: i32,
    pub current_time: WideStr<15>,
    pub last_time: WideStr<15>,
    pub best_time: WideStr<15>,
    pub split: WideStr<15>,
    pub completed_laps: i32,
    pub position: i32,
    /// Milliseconds
    pub i_current_time: i32,
    pub i_last_time: i32,
    pub i_best_time: i32,
    pub session_time_left: f32,
    pub distance_traveled: f32,
    pub is_in_pit: i32,
    pub current_sector_index: i32,
    pub last_sector_time: i32,
    pub number_of_laps: i32,
    pub tyre_compound: WideStr<33>,
    pub replay_time_multiplier: f32,
    pub normalized_car_position: f32,
    pub active_cars: i32,
    pub car_coordinates: [[f32; 3]; MAX_CARS],
    pub car_id: [i32; MAX_CARS],
    pub player_car_id: i32,
    pub penalty_time: f32,
    pub flag: i32,
    pub penalty: i32,
    pub ideal_line_on: i32,
    pub is_in_pit_lane: i32,
    pub surface_grip: f32,
    pub mandatory_pit_done: i32,
    pub wind_speed: f32,
    pub wind_direction: f32,
}

impl Default for GraphicsPage {
    fn default() -> Self {
        Self {
            packet_id: 0,
            status: 0,
            session: 0,
            current_time: WideStr::default(),
            last_time: WideStr::default(),
            best_time: WideStr::default(),
            split: WideStr::default(),
            completed_laps: 0,
            position: 0,
            i_current_time: 0,
            i_last_time: 0,
            i_best_time: 0,
            session_time_left: 0.0,
            distance_traveled: 0.0,
            is_in_pit: 0,
            current_sector_index: 0,
            last_sector_time: 0,
            number_of_laps: 0,
            tyre_compound: WideStr::default(),
            replay_time_multiplier: 0.0,
            normalized_car_position: 0.0,
            active_cars: 0,
            car_coordinates: [[0.0; 3]; MAX_CARS],
            car_id: [0; MAX_CARS],
            player_car_id: 0,
            penalty_time: 0.0,
            flag: 0,
            penalty: 0,
            ideal_line_on: 0,
            is_in_pit_lane: 0,
            surface_grip: 0.0,
            mandatory_pit_done: 0,
            wind_speed: 0.0,
            wind_direction: 0.0,
        }
    }
}

impl GraphicsPage {
    pub fn sim_status(&self) -> SimStatus {
        SimStatus::from_raw(self.status)
    }

    pub fn session_type(&self) -> SessionType {
        SessionType::from_raw(self.session)
    }

    pub fn flag_type(&self) -> FlagType {
        FlagType::from_raw(self.flag)
    }

    /// Positions of the cars currently on track, clamped to [`MAX_CARS`].
    pub fn active_car_coordinates(&self) -> &[[f32; 3]] {
        let n = usize::try_from(self.active_cars).unwrap_or(0).min(MAX_CARS);
        &self.car_coordinates[..n]
    }
}

impl RecordLayout for GraphicsPage {
    const NAME: &'static str = "graphics";
    const MAP_NAME: &'static str = "Local\\acpmf_graphics";
    const SIZE: usize = 1256;

    fn read_from(r: &mut LayoutReader<'_>) -> Self {
        Self {
            packet_id: r.i32(),
            status: r.i32(),
            session: r.i32(),
            current_time: r.wide(),
            last_time: r.wide(),
            best_time: r.wide(),
            split: r.wide(),
            completed_laps: r.i32(),
            position: r.i32(),
            i_current_time: r.i32(),
            i_last_time: r.i32(),
            i_best_time: r.i32(),
            session_time_left: r.f32(),
            distance_traveled: r.f32(),
            is_in_pit: r.i32(),
            current_sector_index: r.i32(),
            last_sector_time: r.i32(),
            number_of_laps: r.i32(),
            tyre_compound: r.wide(),
            replay_time_multiplier: r.f32(),
            normalized_car_position: r.f32(),
            active_cars: r.i32(),
            car_coordinates: r.vec3s(),
            car_id: r.i32s(),
            player_car_id: r.i32(),
            penalty_time: r.f32(),
            flag: r.i32(),
            penalty: r.i32(),
            ideal_line_on: r.i32(),
            is_in_pit_lane: r.i32(),
            surface_grip: r.f32(),
            mandatory_pit_done: r.i32(),
            wind_speed: r.f32(),
            wind_direction: r.f32(),
        }
    }
}
