use super::metadata::CarMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Class assumed when a car declares none.
pub const DEFAULT_CAR_CLASS: &str = "street";

/// Power at or above which a car counts as high power.
pub const HIGH_POWER_HP: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Drivetrain {
    #[default]
    #[serde(rename = "RWD")]
    Rwd,
    #[serde(rename = "FWD")]
    Fwd,
    #[serde(rename = "AWD")]
    Awd,
}

impl Drivetrain {
    pub fn as_str(self) -> &'static str {
        match self {
            Drivetrain::Rwd => "RWD",
            Drivetrain::Fwd => "FWD",
            Drivetrain::Awd => "AWD",
        }
    }

    /// Exact `RWD` / `FWD` / `AWD` as written in `drivetrain.ini`.
    pub fn from_ini_value(value: &str) -> Option<Self> {
        match value.trim() {
            "RWD" => Some(Drivetrain::Rwd),
            "FWD" => Some(Drivetrain::Fwd),
            "AWD" => Some(Drivetrain::Awd),
            _ => None,
        }
    }
}

impl fmt::Display for Drivetrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, for metadata written by hand.
impl FromStr for Drivetrain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RWD" => Ok(Drivetrain::Rwd),
            "FWD" => Ok(Drivetrain::Fwd),
            "AWD" => Ok(Drivetrain::Awd),
            other => Err(format!("unknown drivetrain: {other}")),
        }
    }
}

/// A car folder under `content/cars`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Car {
    /// Folder name; unique within the catalog.
    pub car_id: String,
    pub display_name: String,
    pub brand: String,
    pub class_tag: String,
    pub drivetrain: Drivetrain,
    pub power_hp: u32,
    pub weight_kg: u32,
    pub path: PathBuf,
}

impl Car {
    /// Resolve merged metadata against the defaults.
    pub fn from_metadata(car_id: impl Into<String>, path: PathBuf, meta: CarMetadata) -> Self {
        let car_id = car_id.into();
        Self {
            display_name: meta.name.unwrap_or_else(|| car_id.clone()),
            brand: meta.brand.unwrap_or_default(),
            class_tag: meta.class_tag.unwrap_or_else(|| DEFAULT_CAR_CLASS.to_string()),
            drivetrain: meta.drivetrain.unwrap_or_default(),
            power_hp: meta.power_hp.unwrap_or(0),
            weight_kg: meta.weight_kg.unwrap_or(0),
            car_id,
            path,
        }
    }

    /// Horsepower per tonne; 0 when the weight is unknown.
    pub fn power_to_weight(&self) -> f32 {
        if self.weight_kg == 0 {
            return 0.0;
        }
        self.power_hp as f32 / self.weight_kg as f32 * 1000.0
    }

    /// Rear-wheel drive in the drift or street class.
    pub fn is_drift_car(&self) -> bool {
        self.drivetrain == Drivetrain::Rwd
            && (self.class_tag.eq_ignore_ascii_case("drift")
                || self.class_tag.eq_ignore_ascii_case("street"))
    }

    pub fn is_high_power(&self) -> bool {
        self.power_hp >= HIGH_POWER_HP
    }
}
