//! Player settings and preferences
//!
//! The host loads and stores these however it persists data; the engine only
//! reads them. JSON helpers are provided for that round-trip.

use serde::{Deserialize, Serialize};

use crate::error::DuelError;
use crate::sim::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preselected on the menu
    pub difficulty: Difficulty,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no dial glow pulses or banner fades)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Beginner,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,

            // Accessibility
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Sound effect gain after the master volume
    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    pub fn effective_music_volume(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }

    /// Whether to animate the hit glow and miss pulse (respects reduced_motion)
    pub fn effective_dial_effects(&self) -> bool {
        !self.reduced_motion
    }

    /// Banner fade to present: snaps straight to shown under reduced_motion
    pub fn effective_banner_fade(&self, fade: f32) -> f32 {
        if self.reduced_motion { 1.0 } else { fade }
    }

    /// Parse settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, DuelError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        log::info!("Loaded settings ({} difficulty)", settings.difficulty);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, DuelError> {
        Ok(serde_json::to_string(self)?)
    }
}
