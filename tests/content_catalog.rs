//! Catalog scans over a fake installation on disk.

mod common;

use common::FakeInstall;
use pitbox::{Drivetrain, Pitbox, TrackType};

fn populate(install: &FakeInstall) -> anyhow::Result<()> {
    install.write(
        "cars/ks_mazda_rx7_spirit_r/ui/ui_car.json",
        "\u{feff}{\"name\": \"Mazda RX-7 Spirit R\", \"brand\": \"Mazda\",\n\
         \"class\": \"street\", \"description\": \"Line one\nline two\",\n\
         \"specs\": {\"bhp\": \"276bhp\", \"weight\": \"1,270kg\"}}",
    )?;
    install.write("cars/ks_mazda_rx7_spirit_r/data/drivetrain.ini", "[TRACTION]\nTYPE=RWD ; rear\n")?;
    install.write(
        "cars/ks_nissan_gtr/ui/ui_car.json",
        r#"{"name": "Nissan GT-R", "brand": "Nissan", "class": "race",
            "specs": {"bhp": "550 bhp", "weight": "1740 kg", "drivetrain": "awd"}}"#,
    )?;
    install.write("cars/broken_mod/ui/ui_car.json", "{\"name\": \"Broken")?;

    install.write(
        "tracks/usui_pass/ui/ui_track.json",
        r#"{"name": "Usui Pass", "length": "7.2 km", "tags": ["mountain", "japan"]}"#,
    )?;
    install.write(
        "tracks/ks_vallelunga/ui/club_circuit/ui_track.json",
        r#"{"name": "Vallelunga Club", "length": "1750m", "tags": ["circuit"]}"#,
    )?;
    install.write(
        "tracks/ks_vallelunga/ui/extended_circuit/ui_track.json",
        r#"{"name": "Vallelunga Extended", "length": 4085, "tags": ["circuit"]}"#,
    )?;
    install.write(
        "tracks/ebisu_north/ui/ui_track.json",
        r#"{"name": "Ebisu North", "tags": ["drift"]}"#,
    )?;
    Ok(())
}

#[test]
fn full_scan_through_the_connector() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();
    let install = FakeInstall::new()?;
    populate(&install)?;

    let mut pitbox = Pitbox::with_config(install.config());
    let status = pitbox.connect();
    assert!(status.is_connected, "{}", status.error_message);
    assert_eq!(status.game_root.as_deref(), Some(install.game().as_path()));
    assert_eq!(status.cars_count, 3);
    assert_eq!(status.tracks_count, 4);

    let rx7 = pitbox.car("ks_mazda_rx7_spirit_r").expect("rx7 catalogued").clone();
    assert_eq!(rx7.display_name, "Mazda RX-7 Spirit R");
    assert_eq!(rx7.power_hp, 276);
    assert_eq!(rx7.weight_kg, 1270);
    assert_eq!(rx7.drivetrain, Drivetrain::Rwd);
    assert!(rx7.is_drift_car());

    let gtr = pitbox.car("ks_nissan_gtr").expect("gtr catalogued").clone();
    assert_eq!(gtr.drivetrain, Drivetrain::Awd);
    assert!(gtr.is_high_power());

    let broken = pitbox.car("broken_mod").expect("broken car still catalogued").clone();
    assert_eq!(broken.display_name, "broken_mod");

    let usui = pitbox.track("usui_pass", "").expect("usui catalogued").clone();
    assert_eq!(usui.length_m, 7200);
    assert_eq!(usui.track_type, TrackType::Touge);

    let extended = pitbox.track("ks_vallelunga", "extended_circuit").expect("layout").clone();
    assert_eq!(extended.full_id, "ks_vallelunga/extended_circuit");
    assert_eq!(extended.length_m, 4085);
    assert_eq!(extended.track_type, TrackType::Circuit);
    assert!(pitbox.track("ks_vallelunga", "").is_none());

    assert_eq!(pitbox.tracks_by_type(TrackType::Drift).len(), 1);
    assert_eq!(pitbox.search_tracks("VALLELUNGA").len(), 2);
    assert_eq!(pitbox.search_cars("nissan").len(), 1);
    Ok(())
}

#[test]
fn validate_and_prepare_setup_folder() -> anyhow::Result<()> {
    let install = FakeInstall::new()?;
    populate(&install)?;
    let mut pitbox = Pitbox::with_config(install.config());

    let (ok, message) = pitbox.validate_car_track("ks_nissan_gtr", "ks_vallelunga/club_circuit");
    assert!(ok);
    assert_eq!(message, "Valid: Nissan GT-R on Vallelunga Club");

    let (ok, message) = pitbox.ensure_setup_directory("ks_nissan_gtr", "ks_vallelunga");
    assert!(ok, "{message}");
    assert!(install.documents().join("setups/ks_nissan_gtr/ks_vallelunga").is_dir());
    Ok(())
}

#[test]
fn status_serializes_for_frontends() -> anyhow::Result<()> {
    let mut pitbox = Pitbox::with_config(pitbox::DetectorConfig::empty());
    let status = pitbox.connect();

    let json = serde_json::to_value(&status)?;
    assert_eq!(json["is_connected"], false);
    assert_eq!(json["cars_count"], 0);
    assert!(json["user_data_root"].is_null());
    Ok(())
}
