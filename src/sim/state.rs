//! Match state types shared by the dial, the CPU and the orchestrator
//!
//! Everything the presentation layer observes is defined here.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::color::ZoneColor;

/// Current phase of the duel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Fighters walk in (also the resting phase before a match starts)
    Intro,
    /// "3, 2, 1"
    Countdown,
    /// "FIGHT!" banner
    AttackIntro,
    /// Dial running, waiting for input
    Idle,
    /// Player won the last round
    PlayerScores,
    /// CPU won the last round
    OpponentScores,
    /// Both sides scored the same
    Clash,
    /// Match over, player reached the threshold
    EndedWon,
    /// Match over, CPU reached the threshold
    EndedLost,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Intro => "intro",
            Phase::Countdown => "countdown",
            Phase::AttackIntro => "attack-intro",
            Phase::Idle => "idle",
            Phase::PlayerScores => "player-scores",
            Phase::OpponentScores => "opponent-scores",
            Phase::Clash => "clash",
            Phase::EndedWon => "ended-won",
            Phase::EndedLost => "ended-lost",
        }
    }

    /// Match is over; no more rounds until restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::EndedWon | Phase::EndedLost)
    }

    /// Phases during which a tap reaches the dial
    pub fn accepts_input(&self) -> bool {
        matches!(
            self,
            Phase::Idle | Phase::PlayerScores | Phase::OpponentScores | Phase::Clash
        )
    }

    /// Phase a resolved round presents, by sign of the score delta
    pub fn for_delta(delta: i32) -> Self {
        match delta.signum() {
            1 => Phase::PlayerScores,
            -1 => Phase::OpponentScores,
            _ => Phase::Clash,
        }
    }
}

/// Clamped signed score; positive means the player is ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    value: i32,
    limit: i32,
}

impl Score {
    /// `limit` is raised to at least 1
    pub fn new(limit: i32) -> Self {
        Self {
            value: 0,
            limit: limit.max(1),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn limit(&self) -> i32 {
        self.limit
    }

    /// Add `delta`, clamping to [-limit, limit]
    pub fn apply(&mut self, delta: i32) -> i32 {
        self.value = self.value.saturating_add(delta).clamp(-self.limit, self.limit);
        self.value
    }

    /// Either bound reached
    pub fn is_decided(&self) -> bool {
        self.value.abs() >= self.limit
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

/// One side's result for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub hit: bool,
    pub color: Option<ZoneColor>,
    pub points: u32,
}

impl TurnOutcome {
    pub fn hit(color: ZoneColor) -> Self {
        Self {
            hit: true,
            color: Some(color),
            points: color.points(),
        }
    }

    pub fn miss() -> Self {
        Self {
            hit: false,
            color: None,
            points: 0,
        }
    }
}

/// What started a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundTrigger {
    /// Player tapped during the lap
    Input,
    /// A full lap passed without a tap
    LapTimeout,
}

/// Result of `resolve_round`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub delta: i32,
    /// Score after the round
    pub score: i32,
    /// Phase entered by the round
    pub phase: Phase,
}

/// Signals for the presentation layer, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    RoundResolved {
        trigger: RoundTrigger,
        player: TurnOutcome,
        cpu: TurnOutcome,
        outcome: RoundOutcome,
    },
    MatchEnded {
        player_won: bool,
        score: i32,
    },
}

/// End-of-match banner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Banner {
    pub text: &'static str,
    /// 0 (invisible) → 1 (fully shown)
    pub fade: f32,
}

/// RNG state wrapper: one seed, independent streams per consumer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// RNG stream for the dial's zone placement
pub const DIAL_STREAM: u64 = 1;
/// RNG stream for CPU rolls
pub const CPU_STREAM: u64 = 2;
