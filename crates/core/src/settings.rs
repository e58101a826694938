//! Process-wide game settings.
//!
//! Loaded once at startup from a JSON record; the simulation core never
//! mutates it. A missing or malformed file falls back to defaults so a bad
//! config cannot block launch.

use serde::{Deserialize, Serialize};

/// Key bindings as device-level key names, resolved by the input provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: String,
    pub right: String,
    pub up: String,
    pub down: String,
    pub jump: String,
    pub fire: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: "A".to_string(),
            right: "D".to_string(),
            up: "W".to_string(),
            down: "S".to_string(),
            jump: "Space".to_string(),
            fire: "J".to_string(),
        }
    }
}

/// Read-only configuration consumed once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub resolution_width: u32,
    pub resolution_height: u32,
    pub fullscreen: bool,
    pub sound_enabled: bool,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub bindings: KeyBindings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            resolution_width: 1280,
            resolution_height: 720,
            fullscreen: false,
            sound_enabled: true,
            music_volume: 0.7,
            sfx_volume: 1.0,
            bindings: KeyBindings::default(),
        }
    }
}

impl GameSettings {
    /// Parse settings from a JSON document, falling back to defaults on any
    /// parse failure.
    pub fn from_json_str(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(%err, "settings file malformed, using defaults");
                Self::default()
            }
        }
    }
}
