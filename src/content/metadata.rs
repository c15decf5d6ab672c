//! Per-item metadata sources and their merge rules.
//!
//! Each file a car or track ships with is read into a record of optional
//! fields. A field that is missing, empty or unparseable stays `None`, so one
//! bad value never discards the rest of the file. Records are merged in
//! source order with later non-empty values replacing earlier ones, then
//! resolved against defaults.

use super::car::Drivetrain;
use super::ini::IniDocument;
use super::track::TrackType;
use serde_json::Value;

/// Largest numeric spec or length accepted; anything above is a typo.
pub const MAX_PLAUSIBLE_VALUE: u32 = 10_000_000;

/// Car fields contributed by one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarMetadata {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub class_tag: Option<String>,
    pub drivetrain: Option<Drivetrain>,
    pub power_hp: Option<u32>,
    pub weight_kg: Option<u32>,
}

impl CarMetadata {
    /// Fields from `ui/ui_car.json`.
    pub fn from_ui_json(value: &Value) -> Self {
        let specs = value.get("specs");
        let spec = |key: &str| specs.and_then(|s| s.get(key));
        Self {
            name: text(value.get("name")),
            brand: text(value.get("brand")),
            class_tag: text(value.get("class")),
            drivetrain: text(spec("drivetrain")).and_then(|d| d.parse().ok()),
            power_hp: annotated_number(spec("bhp")),
            weight_kg: annotated_number(spec("weight")),
        }
    }

    /// `[TRACTION] TYPE` from `data/drivetrain.ini`.
    pub fn from_drivetrain_ini(ini: &IniDocument) -> Self {
        Self {
            drivetrain: ini.get("TRACTION", "TYPE").and_then(Drivetrain::from_ini_value),
            ..Self::default()
        }
    }

    /// Overlay `later` on `self`; later non-empty fields win.
    pub fn merge(self, later: Self) -> Self {
        Self {
            name: later.name.or(self.name),
            brand: later.brand.or(self.brand),
            class_tag: later.class_tag.or(self.class_tag),
            drivetrain: later.drivetrain.or(self.drivetrain),
            power_hp: later.power_hp.or(self.power_hp),
            weight_kg: later.weight_kg.or(self.weight_kg),
        }
    }

    pub fn merge_all(sources: impl IntoIterator<Item = Self>) -> Self {
        sources.into_iter().fold(Self::default(), Self::merge)
    }
}

/// Track fields contributed by one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub name: Option<String>,
    pub length_m: Option<u32>,
    pub track_type: Option<TrackType>,
}

impl TrackMetadata {
    /// Fields from a `ui_track.json`.
    pub fn from_ui_json(value: &Value) -> Self {
        let length_m = match value.get("length") {
            Some(Value::Number(n)) => n.as_f64().and_then(plausible_u32),
            Some(Value::String(s)) => Some(parse_length_m(s)),
            _ => None,
        };

        let tags: Vec<String> = value
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        let description = value.get("description").and_then(Value::as_str).unwrap_or_default();

        Self {
            name: text(value.get("name")),
            length_m,
            track_type: classify_track(&tags, description),
        }
    }

    pub fn merge(self, later: Self) -> Self {
        Self {
            name: later.name.or(self.name),
            length_m: later.length_m.or(self.length_m),
            track_type: later.track_type.or(self.track_type),
        }
    }
}

/// Non-empty trimmed string; numbers are accepted and rendered as text.
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A spec value such as `"1,150 kg"`, `"280bhp"` or a bare JSON number.
pub fn annotated_number(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_f64().and_then(plausible_u32),
        Value::String(s) => parse_annotated_number(s),
        _ => None,
    }
}

/// Strip thousands separators and a trailing unit word, then parse.
///
/// Returns `None` for anything that is not a non-negative number up to
/// [`MAX_PLAUSIBLE_VALUE`].
pub fn parse_annotated_number(s: &str) -> Option<u32> {
    let cleaned = s.replace(',', "");
    let number = cleaned.trim().trim_end_matches(|c: char| c.is_alphabetic()).trim_end();
    if number.is_empty() {
        return None;
    }
    if let Ok(n) = number.parse::<u32>() {
        return (n <= MAX_PLAUSIBLE_VALUE).then_some(n);
    }
    number.parse::<f64>().ok().and_then(plausible_u32)
}

/// Track length in metres from strings like `"5.2 km"`, `"1200 m"` or `"3400"`.
///
/// Unparseable, negative or implausibly long lengths are 0.
pub fn parse_length_m(s: &str) -> u32 {
    let lowered = s.to_lowercase().replace(',', "");
    let (number, scale) = if lowered.contains("km") {
        (lowered.replace("km", ""), 1000.0)
    } else if lowered.contains('m') {
        (lowered.replace('m', ""), 1.0)
    } else {
        (lowered, 1.0)
    };

    match number.trim().parse::<f64>() {
        Ok(v) if v > 0.0 => plausible_u32(v * scale).unwrap_or(0),
        _ => 0,
    }
}

/// Classify from tags first, then the description.
///
/// `None` when nothing matches; callers default to touge.
pub fn classify_track(tags: &[String], description: &str) -> Option<TrackType> {
    let tags: Vec<String> = tags.iter().map(|t| t.trim().to_lowercase()).collect();
    let tagged = |words: &[&str]| tags.iter().any(|t| words.contains(&t.as_str()));

    if tagged(&["touge", "mountain", "hill"]) {
        return Some(TrackType::Touge);
    }
    if tagged(&["drift"]) {
        return Some(TrackType::Drift);
    }
    if tagged(&["circuit", "race"]) {
        return Some(TrackType::Circuit);
    }

    let description = description.to_lowercase();
    (description.contains("touge") || description.contains("mountain")).then_some(TrackType::Touge)
}

fn plausible_u32(v: f64) -> Option<u32> {
    let rounded = v.round();
    (rounded.is_finite() && (0.0..=MAX_PLAUSIBLE_VALUE as f64).contains(&rounded))
        .then_some(rounded as u32)
}
