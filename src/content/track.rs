use super::metadata::TrackMetadata;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    /// Mountain pass; assumed when metadata says nothing.
    #[default]
    Touge,
    Drift,
    Circuit,
}

/// Catalog key: `track_id/config`, or `track_id` for the default layout.
pub fn full_track_id(track_id: &str, layout_config: &str) -> String {
    if layout_config.is_empty() {
        track_id.to_string()
    } else {
        format!("{track_id}/{layout_config}")
    }
}

/// One layout of a track folder under `content/tracks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Track {
    pub track_id: String,
    /// Layout folder name; empty for the default layout.
    pub layout_config: String,
    pub full_id: String,
    pub display_name: String,
    pub length_m: u32,
    pub track_type: TrackType,
    /// The track folder, shared by all its layouts.
    pub path: PathBuf,
}

impl Track {
    pub fn from_metadata(
        track_id: impl Into<String>,
        layout_config: impl Into<String>,
        path: PathBuf,
        meta: TrackMetadata,
    ) -> Self {
        let track_id = track_id.into();
        let layout_config = layout_config.into();
        Self {
            full_id: full_track_id(&track_id, &layout_config),
            display_name: meta.name.unwrap_or_else(|| track_id.clone()),
            length_m: meta.length_m.unwrap_or(0),
            track_type: meta.track_type.unwrap_or_default(),
            track_id,
            layout_config,
            path,
        }
    }

    pub fn is_touge(&self) -> bool {
        self.track_type == TrackType::Touge
    }
}
