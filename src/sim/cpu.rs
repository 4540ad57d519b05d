//! CPU opponent turn model
//!
//! The CPU has no visible dial. Each turn is a single roll against a table
//! keyed by difficulty and the CPU's own remaining zone count, so it shrinks
//! and grows its zone group by the same rules as the player.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::ZoneColor;
use super::color::ZoneColor::{Green, Orange, Red, Yellow};
use super::state::TurnOutcome;
use crate::consts::{MAX_ZONE_COUNT, MIN_ZONE_COUNT};
use crate::error::DuelError;

/// Difficulty tiers, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    fn tier(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" => Ok(Difficulty::Beginner),
            "intermediate" | "medium" => Ok(Difficulty::Intermediate),
            "advanced" | "hard" => Ok(Difficulty::Advanced),
            _ => Err(DuelError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// One row of the CPU table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuRollEntry {
    /// Probability of landing `hit_color`
    pub chance: f32,
    pub hit_color: ZoneColor,
    /// Consolation hit when the roll fails (higher tiers only)
    pub miss_color: Option<ZoneColor>,
}

const fn entry(chance: f32, hit_color: ZoneColor, miss_color: Option<ZoneColor>) -> CpuRollEntry {
    CpuRollEntry {
        chance,
        hit_color,
        miss_color,
    }
}

/// Indexed by `[difficulty tier][zone_count - 1]`
const CPU_TABLE: [[CpuRollEntry; MAX_ZONE_COUNT as usize]; 3] = [
    // Beginner
    [
        entry(0.40, Red, None),
        entry(0.50, Orange, None),
        entry(0.60, Yellow, None),
        entry(0.70, Green, None),
    ],
    // Intermediate
    [
        entry(0.50, Red, None),
        entry(0.60, Orange, None),
        entry(0.70, Orange, None),
        entry(0.80, Yellow, None),
    ],
    // Advanced
    [
        entry(0.60, Red, None),
        entry(0.60, Orange, Some(Red)),
        entry(0.70, Orange, Some(Red)),
        entry(0.80, Orange, Some(Red)),
    ],
];

/// Table row for a difficulty and zone count.
///
/// Panics if `zone_count` is outside `1..=4`; callers clamp first.
pub fn table_entry(difficulty: Difficulty, zone_count: u8) -> &'static CpuRollEntry {
    assert!(
        (MIN_ZONE_COUNT..=MAX_ZONE_COUNT).contains(&zone_count),
        "CPU table has no row for zone count {zone_count}"
    );
    &CPU_TABLE[difficulty.tier()][usize::from(zone_count - 1)]
}

/// The CPU's only persistent state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuState {
    pub zone_count: u8,
}

impl CpuState {
    pub fn new(zone_count: u8) -> Self {
        Self { zone_count }
    }
}

/// Take one CPU turn: roll, pick a color, and shrink or grow the zone count
pub fn cpu_turn<R: Rng + ?Sized>(
    state: CpuState,
    difficulty: Difficulty,
    rng: &mut R,
) -> (TurnOutcome, CpuState) {
    let count = state.zone_count.clamp(MIN_ZONE_COUNT, MAX_ZONE_COUNT);
    let row = table_entry(difficulty, count);

    let roll = rng.random::<f32>();
    let outcome = if roll < row.chance {
        TurnOutcome::hit(row.hit_color)
    } else if let Some(fallback) = row.miss_color {
        TurnOutcome::hit(fallback)
    } else {
        TurnOutcome::miss()
    };

    let next = if outcome.hit {
        count.saturating_sub(1).max(MIN_ZONE_COUNT)
    } else {
        (count + 1).min(MAX_ZONE_COUNT)
    };

    log::debug!(
        "CPU ({difficulty}) zones={count} roll={roll:.3} chance={:.2} -> {:?} ({} pts), next zones={next}",
        row.chance,
        outcome.color,
        outcome.points
    );

    (outcome, CpuState::new(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_parse_difficulty() {
        assert_eq!("Beginner".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert_eq!(" hard ".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!(matches!(
            "nightmare".parse::<Difficulty>(),
            Err(DuelError::UnknownDifficulty(_))
        ));
    }

    #[test]
    #[should_panic(expected = "no row for zone count")]
    fn test_table_rejects_zero_zones() {
        let _ = table_entry(Difficulty::Beginner, 0);
    }

    #[test]
    #[should_panic(expected = "no row for zone count")]
    fn test_table_rejects_five_zones() {
        let _ = table_entry(Difficulty::Advanced, 5);
    }

    #[test]
    fn test_table_monotonic() {
        for difficulty in Difficulty::ALL {
            // Fewer zones left never makes the CPU more accurate
            for count in 2..=MAX_ZONE_COUNT {
                assert!(
                    table_entry(difficulty, count - 1).chance <= table_entry(difficulty, count).chance,
                    "{difficulty} chance rises as zones shrink to {}",
                    count - 1
                );
            }
        }
        for pair in Difficulty::ALL.windows(2) {
            for count in MIN_ZONE_COUNT..=MAX_ZONE_COUNT {
                let lower = table_entry(pair[0], count);
                let higher = table_entry(pair[1], count);
                assert!(
                    higher.chance >= lower.chance
                        || (higher.miss_color.is_some() && lower.miss_color.is_none())
                );
            }
        }
    }

    #[test]
    fn test_cpu_turn_clamps_out_of_range_state() {
        let mut rng = Pcg32::seed_from_u64(3);
        let (_, next) = cpu_turn(CpuState::new(9), Difficulty::Beginner, &mut rng);
        assert!((MIN_ZONE_COUNT..=MAX_ZONE_COUNT).contains(&next.zone_count));
        let (_, next) = cpu_turn(CpuState::new(0), Difficulty::Beginner, &mut rng);
        assert!((MIN_ZONE_COUNT..=MAX_ZONE_COUNT).contains(&next.zone_count));
    }

    #[test]
    fn test_advanced_always_scores_with_fallback() {
        // Every advanced row above one zone has a consolation color
        let mut rng = Pcg32::seed_from_u64(11);
        let mut state = CpuState::new(4);
        for _ in 0..200 {
            let before = state.zone_count;
            let (outcome, next) = cpu_turn(state, Difficulty::Advanced, &mut rng);
            if before > 1 {
                assert!(outcome.hit);
                assert!(outcome.points >= 3);
            }
            state = next;
        }
    }

    #[test]
    fn test_hit_rate_tracks_table_chance() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let trials = 4000;
        let hits = (0..trials)
            .filter(|_| cpu_turn(CpuState::new(4), Difficulty::Beginner, &mut rng).0.hit)
            .count();
        let rate = hits as f32 / trials as f32;
        assert!((rate - 0.70).abs() < 0.05, "rate={rate}");
    }

    proptest! {
        #[test]
        fn prop_zone_count_moves_with_outcome(seed in any::<u64>(), count in 1u8..=4, tier in 0usize..3) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let (outcome, next) = cpu_turn(CpuState::new(count), Difficulty::ALL[tier], &mut rng);
            if outcome.hit {
                prop_assert!(next.zone_count <= count);
                prop_assert!(outcome.points > 0);
            } else {
                prop_assert!(next.zone_count >= count);
                prop_assert_eq!(outcome.points, 0);
            }
            prop_assert!((1..=4).contains(&next.zone_count));
        }
    }
}
