//! Data-driven game balance
//!
//! Every number that shapes how a duel feels lives here so it can be
//! tweaked from JSON without touching the simulation.

use std::f32::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::error::DuelError;

/// Balance and timing knobs for the dial and the phase sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Dial ===
    /// Base pointer speed (radians/sec), scaled by the speed multiplier
    pub dial_base_speed: f32,
    /// Angular width of a single hit zone (radians)
    pub zone_arc: f32,
    /// Lower edge of the spawn arc (radians)
    pub spawn_min: f32,
    /// Upper edge of the spawn arc (radians)
    pub spawn_max: f32,
    /// Pointer bearing on `start()` (radians)
    pub home_angle: f32,
    /// Bearing where a lap is committed (radians)
    pub gate_angle: f32,
    /// Zone count after `start()`
    pub initial_zone_count: u8,
    /// Speed multiplier after `start()`
    pub initial_speed: f32,
    /// Multiplier change per hit or miss
    pub speed_step: f32,
    /// Maximum multiplier gain over `initial_speed`
    pub max_speed_bonus: f32,

    // === Effects ===
    /// Hit glow duration (seconds)
    pub hit_glow_secs: f32,
    /// Miss pulse duration (seconds)
    pub miss_pulse_secs: f32,
    /// Number of recent hit colors kept for the streak display
    pub streak_len: usize,

    // === Match ===
    /// Score magnitude that ends the match
    pub win_threshold: i32,

    // === Phase timing (seconds) ===
    pub intro_secs: f32,
    pub countdown_steps: u8,
    pub countdown_step_secs: f32,
    pub attack_intro_secs: f32,
    pub round_recover_secs: f32,
    pub clash_recover_secs: f32,
    pub banner_fade_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            dial_base_speed: 2.5,
            zone_arc: 0.05 * TAU, // 18°
            spawn_min: 65.0_f32.to_radians(),
            spawn_max: 260.0_f32.to_radians(),
            home_angle: -FRAC_PI_2, // top
            gate_angle: 300.0_f32.to_radians(),
            initial_zone_count: 4,
            initial_speed: 1.5,
            speed_step: 0.2,
            max_speed_bonus: 0.6,

            hit_glow_secs: 0.3,
            miss_pulse_secs: 0.4,
            streak_len: 5,

            win_threshold: 10,

            intro_secs: 1.0,
            countdown_steps: 3,
            countdown_step_secs: 0.8,
            attack_intro_secs: 1.2,
            round_recover_secs: 0.6,
            clash_recover_secs: 0.8,
            banner_fade_secs: 0.6,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, DuelError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, DuelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Highest speed multiplier the dial can reach
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.initial_speed + self.max_speed_bonus
    }

    /// Reject values the simulation cannot honor
    pub fn validate(&self) -> Result<(), DuelError> {
        let fail = |msg: String| -> Result<(), DuelError> { Err(DuelError::InvalidTuning(msg)) };

        if !(1..=crate::consts::MAX_ZONE_COUNT).contains(&self.initial_zone_count) {
            return fail(format!(
                "initial_zone_count {} outside 1..={}",
                self.initial_zone_count,
                crate::consts::MAX_ZONE_COUNT
            ));
        }
        if self.dial_base_speed <= 0.0 || self.initial_speed <= 0.0 {
            return fail("dial speeds must be positive".into());
        }
        if self.zone_arc <= 0.0 {
            return fail("zone_arc must be positive".into());
        }
        if self.spawn_max <= self.spawn_min || self.spawn_max - self.spawn_min > TAU {
            return fail(format!(
                "spawn arc [{}, {}] is empty or wider than a full turn",
                self.spawn_min, self.spawn_max
            ));
        }
        if self.speed_step < 0.0 || self.max_speed_bonus < 0.0 {
            return fail("speed_step and max_speed_bonus must not be negative".into());
        }
        if self.win_threshold <= 0 {
            return fail(format!("win_threshold {} must be positive", self.win_threshold));
        }
        let durations = [
            self.hit_glow_secs,
            self.miss_pulse_secs,
            self.intro_secs,
            self.countdown_step_secs,
            self.attack_intro_secs,
            self.round_recover_secs,
            self.clash_recover_secs,
            self.banner_fade_secs,
        ];
        if durations.iter().any(|d| *d < 0.0 || !d.is_finite()) {
            return fail("durations must be finite and non-negative".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert!((Tuning::default().max_speed() - 2.1).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "win_threshold": 5 }"#).unwrap();
        assert_eq!(tuning.win_threshold, 5);
        assert_eq!(tuning.initial_zone_count, 4);
    }

    #[test]
    fn test_rejects_bad_zone_count() {
        let err = Tuning::from_json(r#"{ "initial_zone_count": 7 }"#).unwrap_err();
        assert!(matches!(err, DuelError::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ nope").unwrap_err();
        assert!(matches!(err, DuelError::Json(_)));
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let mut tuning = Tuning::default();
        tuning.gate_angle = 1.0;
        let back = Tuning::from_json(&tuning.to_json().unwrap()).unwrap();
        assert_eq!(back, tuning);
    }
}
