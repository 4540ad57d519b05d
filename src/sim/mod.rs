//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`/`advance`
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod color;
pub mod cpu;
pub mod dial;
pub mod duel;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod zone;

pub use color::{PALETTE, PendingStack, ZoneColor, build_color_stack};
pub use cpu::{CpuRollEntry, CpuState, Difficulty, cpu_turn, table_entry};
pub use dial::DialEngine;
pub use duel::Duel;
pub use schedule::{Scheduler, TaskId};
pub use state::{
    Banner, GameEvent, Phase, RngState, RoundOutcome, RoundTrigger, Score, TurnOutcome,
};
pub use tick::{TickInput, tick};
pub use zone::{HitZone, find_hit, generate_zones};
