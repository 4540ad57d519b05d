//! Dial engine: the rotating pointer and its hit zones
//!
//! The pointer angle is unwrapped and only ever increases while active.
//! Attempts take effect immediately on zone count and speed, but the zone
//! group and its colors are only replaced when the pointer crosses the gate
//! bearing, so each lap is resolved exactly once:
//! - tapped lap: the tap decides hit/miss
//! - untapped lap: the gate crossing synthesizes a miss (except the first
//!   crossing after `start`, which ends a partial lap)

use std::f64::consts::TAU;

use glam::Vec2;
use rand_pcg::Pcg32;

use super::color::{PendingStack, ZoneColor, build_color_stack};
use super::state::{RngState, TurnOutcome};
use super::zone::{HitZone, find_hit, generate_zones};
use crate::consts::{MAX_ZONE_COUNT, MIN_ZONE_COUNT};
use crate::tuning::Tuning;
use crate::{normalize_angle, polar_to_cartesian};

/// Player dial state
#[derive(Debug, Clone)]
pub struct DialEngine {
    tuning: Tuning,
    rng: Pcg32,

    /// Pointer angle (radians, unwrapped; f64 so long sessions keep moving)
    angle: f64,
    speed_multiplier: f32,
    zone_count: u8,
    zones: Vec<HitZone>,
    color_stack: Vec<ZoneColor>,
    /// Stack change to apply at the next gate crossing
    pending_stack: PendingStack,
    attempted_this_lap: bool,
    active: bool,
    /// Gate crossings since `start()`
    regen_count: u64,

    // Effects
    hit_glow_timer: f32,
    miss_pulse_timer: f32,
    /// Pointer bearing of the last miss (cleared at the gate)
    miss_angle: Option<f32>,
    /// Zone that was hit, for the glow highlight
    hit_zone: Option<HitZone>,
    /// Recent hit colors, oldest first
    hit_colors: Vec<ZoneColor>,

    // One-shot signals
    last_attempt: Option<TurnOutcome>,
    auto_missed: bool,
}

impl DialEngine {
    /// Create an inert dial; nothing moves until `start()`
    pub fn new(tuning: Tuning, rng_state: RngState) -> Self {
        Self {
            angle: f64::from(tuning.home_angle),
            speed_multiplier: tuning.initial_speed,
            zone_count: tuning.initial_zone_count,
            tuning,
            rng: rng_state.to_rng(),
            zones: Vec::new(),
            color_stack: Vec::new(),
            pending_stack: PendingStack::None,
            attempted_this_lap: false,
            active: false,
            regen_count: 0,
            hit_glow_timer: 0.0,
            miss_pulse_timer: 0.0,
            miss_angle: None,
            hit_zone: None,
            hit_colors: Vec::new(),
            last_attempt: None,
            auto_missed: false,
        }
    }

    /// Reset to home and begin rotating
    pub fn start(&mut self) {
        self.active = true;
        self.angle = f64::from(self.tuning.home_angle);
        self.speed_multiplier = self.tuning.initial_speed;
        self.zone_count = self.tuning.initial_zone_count;
        self.zones = generate_zones(self.zone_count, &self.tuning, &mut self.rng);
        self.color_stack = build_color_stack(self.zone_count);
        self.pending_stack = PendingStack::None;
        self.attempted_this_lap = false;
        self.regen_count = 0;
        self.hit_glow_timer = 0.0;
        self.miss_pulse_timer = 0.0;
        self.miss_angle = None;
        self.hit_zone = None;
        self.hit_colors.clear();
        self.last_attempt = None;
        self.auto_missed = false;
        log::info!(
            "Dial started: {} zones at {:.1}°",
            self.zone_count,
            self.zones.first().map_or(0.0, |z| z.start_angle.to_degrees())
        );
    }

    /// Freeze the dial; `tick` and `attempt` become no-ops
    pub fn stop(&mut self) {
        if self.active {
            log::info!("Dial stopped after {} laps", self.regen_count);
        }
        self.active = false;
    }

    /// Tap. `None` when inactive or the lap was already attempted.
    pub fn attempt(&mut self) -> Option<TurnOutcome> {
        if !self.active || self.attempted_this_lap {
            return None;
        }
        self.attempted_this_lap = true;

        let outcome = match find_hit(self.bearing(), &self.zones).copied() {
            Some(zone) => {
                let color = self.zone_color(&zone).unwrap_or(ZoneColor::Green);
                let before = self.zone_count;
                self.zone_count = before.saturating_sub(1).max(MIN_ZONE_COUNT);
                self.speed_multiplier =
                    (self.speed_multiplier + self.tuning.speed_step).min(self.tuning.max_speed());
                self.hit_glow_timer = self.tuning.hit_glow_secs;
                self.hit_zone = Some(zone);
                if self.zone_count < before {
                    self.pending_stack = PendingStack::Trim;
                }
                self.push_streak(color);
                TurnOutcome::hit(color)
            }
            None => {
                self.apply_miss();
                self.miss_pulse_timer = self.tuning.miss_pulse_secs;
                self.miss_angle = Some(self.bearing());
                TurnOutcome::miss()
            }
        };

        log::debug!(
            "Attempt at {:.1}°: {:?} ({} pts), zones -> {}, speed x{:.2}",
            self.bearing().to_degrees(),
            outcome.color,
            outcome.points,
            self.zone_count,
            self.speed_multiplier
        );

        self.last_attempt = Some(outcome);
        Some(outcome)
    }

    /// Advance the pointer by `dt` seconds and return the angle
    pub fn tick(&mut self, dt: f32) -> f32 {
        if !self.active {
            return self.angle();
        }
        let dt = dt.max(0.0);
        let prev = self.angle;
        self.angle += f64::from(self.tuning.dial_base_speed * self.speed_multiplier * dt);

        self.hit_glow_timer = (self.hit_glow_timer - dt).max(0.0);
        self.miss_pulse_timer = (self.miss_pulse_timer - dt).max(0.0);
        if self.hit_glow_timer == 0.0 {
            self.hit_zone = None;
        }

        let crossings = self.gate_lap(self.angle) - self.gate_lap(prev);
        if crossings > 0 {
            if crossings > 1 {
                log::warn!("Dial skipped {} gate crossings in one tick (dt={dt})", crossings - 1);
            }
            self.cross_gate();
        }

        self.angle()
    }

    /// Index of the lap `angle` is in, counted from the gate bearing
    fn gate_lap(&self, angle: f64) -> i64 {
        ((angle - f64::from(self.tuning.gate_angle)) / TAU).floor() as i64
    }

    fn cross_gate(&mut self) {
        if self.regen_count > 0 && !self.attempted_this_lap && !self.zones.is_empty() {
            self.apply_miss();
            self.auto_missed = true;
            log::debug!(
                "Lap {} passed untouched: auto-miss, zones -> {}",
                self.regen_count,
                self.zone_count
            );
        }

        self.miss_angle = None;
        self.pending_stack.apply(&mut self.color_stack, self.zone_count);
        self.zones = generate_zones(self.zone_count, &self.tuning, &mut self.rng);
        self.attempted_this_lap = false;
        self.regen_count += 1;
    }

    fn apply_miss(&mut self) {
        self.zone_count = (self.zone_count + 1).min(MAX_ZONE_COUNT);
        self.speed_multiplier =
            (self.speed_multiplier - self.tuning.speed_step).max(self.tuning.initial_speed);
        self.pending_stack = PendingStack::Rebuild;
    }

    fn push_streak(&mut self, color: ZoneColor) {
        self.hit_colors.push(color);
        if self.hit_colors.len() > self.tuning.streak_len {
            let excess = self.hit_colors.len() - self.tuning.streak_len;
            self.hit_colors.drain(..excess);
        }
    }

    // === Observables ===

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Unwrapped pointer angle
    pub fn angle(&self) -> f32 {
        self.angle as f32
    }

    /// Pointer bearing in [0, 2π)
    pub fn bearing(&self) -> f32 {
        normalize_angle(self.angle.rem_euclid(TAU) as f32)
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn zone_count(&self) -> u8 {
        self.zone_count
    }

    pub fn zones(&self) -> &[HitZone] {
        &self.zones
    }

    pub fn color_stack(&self) -> &[ZoneColor] {
        &self.color_stack
    }

    /// Color a zone is drawn with
    pub fn zone_color(&self, zone: &HitZone) -> Option<ZoneColor> {
        self.color_stack.get(zone.index).copied()
    }

    /// Zone currently under the pointer
    pub fn zone_under_pointer(&self) -> Option<&HitZone> {
        find_hit(self.bearing(), &self.zones)
    }

    pub fn attempted_this_lap(&self) -> bool {
        self.attempted_this_lap
    }

    /// Increments on every gate crossing; zeroed by `start()`
    pub fn regen_count(&self) -> u64 {
        self.regen_count
    }

    pub fn hit_glow_timer(&self) -> f32 {
        self.hit_glow_timer
    }

    /// Glow progress, 1 at the hit → 0
    pub fn glow_fraction(&self) -> f32 {
        fraction(self.hit_glow_timer, self.tuning.hit_glow_secs)
    }

    pub fn hit_zone(&self) -> Option<&HitZone> {
        self.hit_zone.as_ref()
    }

    pub fn miss_pulse_timer(&self) -> f32 {
        self.miss_pulse_timer
    }

    /// Miss pulse progress, 1 at the miss → 0
    pub fn miss_fraction(&self) -> f32 {
        fraction(self.miss_pulse_timer, self.tuning.miss_pulse_secs)
    }

    pub fn miss_angle(&self) -> Option<f32> {
        self.miss_angle
    }

    pub fn hit_colors(&self) -> &[ZoneColor] {
        &self.hit_colors
    }

    /// Pointer tip position for a hand of `length`
    pub fn pointer_tip(&self, length: f32) -> Vec2 {
        polar_to_cartesian(length, self.bearing())
    }

    /// Outcome of the last explicit tap; cleared on read
    pub fn take_last_attempt(&mut self) -> Option<TurnOutcome> {
        self.last_attempt.take()
    }

    /// Whether a lap timed out since the last read
    pub fn take_auto_miss(&mut self) -> bool {
        std::mem::take(&mut self.auto_missed)
    }

    #[cfg(test)]
    pub(crate) fn set_angle(&mut self, angle: f32) {
        self.angle = f64::from(angle);
    }
}

fn fraction(timer: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        0.0
    } else {
        (timer / duration).clamp(0.0, 1.0)
    }
}
