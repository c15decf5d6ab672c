//! `SPageFileStatic`, written once when a session loads.

use super::{LayoutReader, RecordLayout, WideStr};

pub mod offsets {
    pub const SM_VERSION: usize = 0;
    pub const NUM_CARS: usize = 64;
    pub const CAR_MODEL: usize = 68;
    pub const TRACK: usize = 134;
    pub const PLAYER_NICK: usize = 332;
    pub const SECTOR_COUNT: usize = 400;
    pub const MAX_TORQUE: usize = 404;
    pub const MAX_POWER: usize = 408;
    pub const MAX_RPM: usize = 412;
    pub const MAX_FUEL: usize = 416;
    pub const MAX_TURBO_BOOST: usize = 452;
    pub const TRACK_CONFIGURATION: usize = 524;
    pub const ERS_MAX_J: usize = 592;
    pub const CAR_SKIN: usize = 604;
    pub const PIT_WINDOW_END: usize = 680;
}

/// Car, track and rules information for the loaded session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaticPage {
    pub sm_version: WideStr<15>,
    pub ac_version: WideStr<15>,
    pub number_of_sessions: i32,
    pub num_cars: i32,
    pub car_model: WideStr<33>,
    pub track: WideStr<33>,
    pub player_name: WideStr<33>,
    pub player_surname: WideStr<33>,
    pub player_nick: WideStr<33>,
    pub sector_count: i32,
    /// N·m
    pub max_torque: f32,
    /// W
    pub max_power: f32,
    pub max_rpm: i32,
    /// Litres
    pub max_fuel: f32,
    pub suspension_max_travel: [f32; 4],
    pub tyre_radius: [f32; 4],
    pub max_turbo_boost: f32,
    pub deprecated_1: f32,
    pub deprecated_2: f32,
    pub penalties_enabled: i32,
    pub aid_fuel_rate: f32,
    pub aid_tire_rate: f32,
    pub aid_mechanical_damage: f32,
    pub aid_allow_tyre_blankets: i32,
    pub aid_stability: f32,
    pub aid_auto_clutch: i32,
    pub aid_auto_blip: i32,
    pub has_drs: i32,
    pub has_ers: i32,
    pub has_kers: i32,
    pub kers_max_j: f32,
    pub engine_brake_settings_count: i32,
    pub ers_power_controller_count: i32,
    pub track_spline_length: f32,
    pub track_configuration: WideStr<33>,
    pub ers_max_j: f32,
    pub is_timed_race: i32,
    pub has_extra_lap: i32,
    pub car_skin: WideStr<33>,
    pub reversed_grid_positions: i32,
    pub pit_window_start: i32,
    pub pit_window_end: i32,
}

impl RecordLayout for StaticPage {
    const NAME: &'static str = "static";
    const MAP_NAME: &'static str = "Local\\acpmf_static";
    const SIZE: usize = 684;

    fn read_from(r: &mut LayoutReader<'_>) -> Self {
        Self {
            sm_version: r.wide(),
            ac_version: r.wide(),
            number_of_sessions: r.i32(),
            num_cars: r.i32(),
            car_model: r.wide(),
            track: r.wide(),
            player_name: r.wide(),
            player_surname: r.wide(),
            player_nick: r.wide(),
            sector_count: r.i32(),
            max_torque: r.f32(),
            max_power: r.f32(),
            max_rpm: r.i32(),
            max_fuel: r.f32(),
            suspension_max_travel: r.f32s(),
            tyre_radius: r.f32s(),
            max_turbo_boost: r.f32(),
            deprecated_1: r.f32(),
            deprecated_2: r.f32(),
            penalties_enabled: r.i32(),
            aid_fuel_rate: r.f32(),
            aid_tire_rate: r.f32(),
            aid_mechanical_damage: r.f32(),
            aid_allow_tyre_blankets: r.i32(),
            aid_stability: r.f32(),
            aid_auto_clutch: r.i32(),
            aid_auto_blip: r.i32(),
            has_drs: r.i32(),
            has_ers: r.i32(),
            has_kers: r.i32(),
            kers_max_j: r.f32(),
            engine_brake_settings_count: r.i32(),
            ers_power_controller_count: r.i32(),
            track_spline_length: r.f32(),
            track_configuration: r.wide(),
            ers_max_j: r.f32(),
            is_timed_race: r.i32(),
            has_extra_lap: r.i32(),
            car_skin: r.wide(),
            reversed_grid_positions: r.i32(),
            pit_window_start: r.i32(),
            pit_window_end: r.i32(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_wide(buf: &mut [u8], offset: usize, s: &str) {
        for (i, unit) in s.encode_utf16().enumerate() {
            buf[offset + i * 2..offset + i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
        }
    }

    #[test]
    fn layout_consumes_exactly_the_declared_size() {
        let buf = vec![0u8; StaticPage::SIZE];
        let mut reader = LayoutReader::new(&buf);
        let _ = StaticPage::read_from(&mut reader);
        assert_eq!(reader.padded_end(), StaticPage::SIZE);
    }

    #[test]
    fn identity_strings_and_specs_decode() {
        let mut buf = vec![0u8; StaticPage::SIZE];
        put_wide(&mut buf, offsets::SM_VERSION, "1.7");
        put_wide(&mut buf, offsets::CAR_MODEL, "ks_toyota_ae86_drift");
        put_wide(&mut buf, offsets::TRACK, "akina");
        put_wide(&mut buf, offsets::TRACK_CONFIGURATION, "downhill");
        put_wide(&mut buf, offsets::CAR_SKIN, "panda");
        buf[offsets::MAX_TORQUE..offsets::MAX_TORQUE + 4].copy_from_slice(&162.5f32.to_le_bytes());
        buf[offsets::MAX_RPM..offsets::MAX_RPM + 4].copy_from_slice(&7600i32.to_le_bytes());
        buf[offsets::PIT_WINDOW_END..offsets::PIT_WINDOW_END + 4]
            .copy_from_slice(&12i32.to_le_bytes());

        let page = StaticPage::decode(&buf).unwrap();
        assert_eq!(page.sm_version.to_string_lossy(), "1.7");
        assert_eq!(page.car_model.to_string_lossy(), "ks_toyota_ae86_drift");
        assert_eq!(page.track.to_string_lossy(), "akina");
        assert_eq!(page.track_configuration.to_string_lossy(), "downhill");
        assert_eq!(page.car_skin.to_string_lossy(), "panda");
        assert_eq!(page.max_torque, 162.5);
        assert_eq!(page.max_rpm, 7600);
        assert_eq!(page.pit_window_end, 12);
    }

    #[test]
    fn full_width_name_does_not_bleed_into_next_field() {
        let mut buf = vec![0u8; StaticPage::SIZE];
        let long = "x".repeat(33);
        put_wide(&mut buf, offsets::CAR_MODEL, &long);
        put_wide(&mut buf, offsets::TRACK, "imola");

        let page = StaticPage::decode(&buf).unwrap();
        assert_eq!(page.car_model.to_string_lossy(), long);
        assert_eq!(page.track.to_string_lossy(), "imola");
    }
}
