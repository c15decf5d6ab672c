//! `SPageFilePhysics`, updated by the simulator every physics step.

use super::{LayoutReader, RecordLayout};

/// Byte offsets of the fields consumers read most often.
pub mod offsets {
    pub const PACKET_ID: usize = 0;
    pub const GAS: usize = 4;
    pub const BRAKE: usize = 8;
    pub const GEAR: usize = 16;
    pub const RPMS: usize = 20;
    pub const SPEED_KMH: usize = 28;
    pub const ACC_G: usize = 44;
    pub const WHEEL_LOAD: usize = 72;
    pub const WHEELS_PRESSURE: usize = 88;
    pub const TYRE_WEAR: usize = 120;
    pub const TYRE_CORE_TEMPERATURE: usize = 152;
    pub const SUSPENSION_TRAVEL: usize = 184;
    pub const AIR_TEMP: usize = 288;
    pub const ROAD_TEMP: usize = 292;
    pub const BRAKE_TEMP: usize = 348;
    pub const TYRE_TEMP_I: usize = 368;
    pub const BRAKE_BIAS: usize = 564;
}

/// Live physics state of the player car.
///
/// Per-wheel arrays are ordered front-left, front-right, rear-left, rear-right.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsPage {
    pub packet_id: i32,
    /// 0.0 to 1.0
    pub gas: f32,
    /// 0.0 to 1.0
    pub brake: f32,
    /// Litres
    pub fuel: f32,
    /// 0 = reverse, 1 = neutral, 2 = first
    pub gear: i32,
    pub rpms: i32,
    /// Radians
    pub steer_angle: f32,
    pub speed_kmh: f32,
    pub velocity: [f32; 3],
    pub acc_g: [f32; 3],
    pub wheel_slip: [f32; 4],
    /// Newtons
    pub wheel_load: [f32; 4],
    /// PSI
    pub wheels_pressure: [f32; 4],
    /// rad/s
    pub wheel_angular_speed: [f32; 4],
    pub tyre_wear: [f32; 4],
    pub tyre_dirty_level: [f32; 4],
    /// °C
    pub tyre_core_temperature: [f32; 4],
    /// Radians
    pub camber_rad: [f32; 4],
    /// Metres
    pub suspension_travel: [f32; 4],
    pub drs: f32,
    pub tc: f32,
    pub heading: f32,
    pub pitch: f32,
    pub roll: f32,
    pub cg_height: f32,
    pub car_damage: [f32; 5],
    pub number_of_tyres_out: i32,
    pub pit_limiter_on: i32,
    pub abs: f32,
    pub kers_charge: f32,
    pub kers_input: f32,
    pub auto_shifter_on: i32,
    pub ride_height: [f32; 2],
    pub turbo_boost: f32,
    pub ballast: f32,
    pub air_density: f32,
    /// Ambient air temperature, °C
    pub air_temp: f32,
    /// Road surface temperature, °C
    pub road_temp: f32,
    pub local_angular_vel: [f32; 3],
    pub final_ff: f32,
    pub performance_meter: f32,
    pub engine_brake: i32,
    pub ers_recovery_level: i32,
    pub ers_power_level: i32,
    pub ers_heat_charging: i32,
    pub ers_is_charging: i32,
    pub kers_current_kj: f32,
    pub drs_available: i32,
    pub drs_enabled: i32,
    /// °C
    pub brake_temp: [f32; 4],
    pub clutch: f32,
    pub tyre_temp_i: [f32; 4],
    pub tyre_temp_m: [f32; 4],
    pub tyre_temp_o: [f32; 4],
    pub is_ai_controlled: i32,
    pub tyre_contact_point: [[f32; 3]; 4],
    pub tyre_contact_normal: [[f32; 3]; 4],
    pub tyre_contact_heading: [[f32; 3]; 4],
    pub brake_bias: f32,
    pub local_velocity: [f32; 3],
}

impl RecordLayout for PhysicsPage {
    const NAME: &'static str = "physics";
    const MAP_NAME: &'static str = "Local\\acpmf_physics";
    const SIZE: usize = 580;

    fn read_from(r: &mut LayoutReader<'_>) -> Self {
        Self {
            packet_id: r.i32(),
            gas: r.f32(),
            brake: r.f32(),
            fuel: r.f32(),
            gear: r.i32(),
            rpms: r.i32(),
            steer_angle: r.f32(),
            speed_kmh: r.f32(),
            velocity: r.f32s(),
            acc_g: r.f32s(),
            wheel_slip: r.f32s(),
            wheel_load: r.f32s(),
            wheels_pressure: r.f32s(),
            wheel_angular_speed: r.f32s(),
            tyre_wear: r.f32s(),
            tyre_dirty_level: r.f32s(),
            tyre_core_temperature: r.f32s(),
            camber_rad: r.f32s(),
            suspension_travel: r.f32s(),
            drs: r.f32(),
            tc: r.f32(),
            heading: r.f32(),
            pitch: r.f32(),
            roll: r.f32(),
            cg_height: r.f32(),
            car_damage: r.f32s(),
            number_of_tyres_out: r.i32(),
            pit_limiter_on: r.i32(),
            abs: r.f32(),
            kers_charge: r.f32(),
            kers_input: r.f32(),
            auto_shifter_on: r.i32(),
            ride_height: r.f32s(),
            turbo_boost: r.f32(),
            ballast: r.f32(),
            air_density: r.f32(),
            air_temp: r.f32(),
            road_temp: r.f32(),
            local_angular_vel: r.f32s(),
            final_ff: r.f32(),
            performance_meter: r.f32(),
            engine_brake: r.i32(),
            ers_recovery_level: r.i32(),
            ers_power_level: r.i32(),
            ers_heat_charging: r.i32(),
            ers_is_charging: r.i32(),
            kers_current_kj: r.f32(),
            drs_available: r.i32(),
            drs_enabled: r.i32(),
            brake_temp: r.f32s(),
            clutch: r.f32(),
            tyre_temp_i: r.f32s(),
            tyre_temp_m: r.f32s(),
            tyre_temp_o: r.f32s(),
            is_ai_controlled: r.i32(),
            tyre_contact_point: r.vec3s(),
            tyre_contact_normal: r.vec3s(),
            tyre_contact_heading: r.vec3s(),
            brake_bias: r.f32(),
            local_velocity: r.f32s(),
        }
    }
}
