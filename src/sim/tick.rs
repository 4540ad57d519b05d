//! Fixed timestep frame driver
//!
//! Translates one frame of host input into `Duel` calls. Taps are applied
//! before time advances, so a tap landing on the same frame as a gate
//! crossing belongs to the lap the player saw.

use super::duel::Duel;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap (click/tap/space)
    pub attempt: bool,
    /// Idle/demo mode - autopilot taps for the player
    pub idle_mode: bool,
}

/// Advance the duel by one fixed timestep
pub fn tick(duel: &mut Duel, input: &TickInput, dt: f32) {
    let mut input = input.clone();
    if input.idle_mode && autopilot_wants_tap(duel) {
        input.attempt = true;
    }

    if input.attempt {
        duel.attempt();
    }
    duel.advance(dt);
}

/// Tap once the pointer is over the most valuable zone of the lap
fn autopilot_wants_tap(duel: &Duel) -> bool {
    let dial = duel.dial();
    if !duel.phase().accepts_input() || dial.attempted_this_lap() {
        return false;
    }
    let Some(best) = dial
        .zones()
        .iter()
        .max_by_key(|z| dial.zone_color(z).map_or(0, |c| c.points()))
    else {
        return false;
    };
    dial.zone_under_pointer().is_some_and(|z| z.index == best.index)
}
