//! Round resolver and phase orchestrator
//!
//! `Duel` owns every piece of match state: the player's dial, the CPU, the
//! score and the phase. All mutation goes through its methods:
//! - `start_game` / `play_again` / `reset` for the match lifecycle
//! - `attempt` for player input
//! - `advance` once per frame
//!
//! Each lap of the dial produces exactly one round. A tap resolves the lap
//! immediately; a lap that passes the gate untouched is resolved as a miss
//! when the dial regenerates its zones. Rounds mutate the score, then the
//! phase, then queue events, all inside one `&mut self` call.

use rand_pcg::Pcg32;

use super::color::ZoneColor;
use super::cpu::{CpuState, Difficulty, cpu_turn};
use super::dial::DialEngine;
use super::schedule::Scheduler;
use super::state::{
    Banner, CPU_STREAM, DIAL_STREAM, GameEvent, Phase, RngState, RoundOutcome, RoundTrigger, Score,
    TurnOutcome,
};
use crate::error::DuelError;
use crate::tuning::Tuning;

/// Deferred phase work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    /// Show countdown step `n`
    Countdown(u8),
    AttackIntro,
    /// Start the dial and enter idle
    BeginPlay,
    /// End the round presentation
    ReturnToIdle,
}

/// Complete duel state
#[derive(Debug, Clone)]
pub struct Duel {
    tuning: Tuning,
    /// Session seed
    seed: u64,
    /// CPU roll RNG
    rng: Pcg32,
    dial: DialEngine,
    cpu: CpuState,
    difficulty: Option<Difficulty>,
    score: Score,
    phase: Phase,
    scheduler: Scheduler<Cue>,
    /// Countdown step being shown
    countdown: Option<u8>,
    /// Dial regeneration count already handled
    seen_regen: u64,
    /// A round was resolved for the dial's current lap
    lap_resolved: bool,
    rounds_played: u32,
    cpu_turns: u32,
    cpu_hit_colors: Vec<ZoneColor>,
    last_round: Option<RoundOutcome>,
    /// Seconds since the match ended (drives the banner fade)
    ended_elapsed: f32,
    events: Vec<GameEvent>,
}

impl Duel {
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Duel with custom balance values; rejects tuning the engine cannot run
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, DuelError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: RngState::new(seed, CPU_STREAM).to_rng(),
            dial: DialEngine::new(tuning.clone(), RngState::new(seed, DIAL_STREAM)),
            cpu: CpuState::new(tuning.initial_zone_count),
            difficulty: None,
            score: Score::new(tuning.win_threshold),
            phase: Phase::Intro,
            scheduler: Scheduler::new(),
            countdown: None,
            seen_regen: 0,
            lap_resolved: false,
            rounds_played: 0,
            cpu_turns: 0,
            cpu_hit_colors: Vec::new(),
            last_round: None,
            ended_elapsed: 0.0,
            events: Vec::new(),
            tuning,
        }
    }

    // === Lifecycle ===

    /// Begin a match: intro → countdown → attack intro → idle (dial starts)
    pub fn start_game(&mut self, difficulty: Difficulty) {
        log::info!("Starting duel on {difficulty} (seed {})", self.seed);
        self.clear_match();
        self.difficulty = Some(difficulty);
        self.enter(Phase::Intro);

        let first = if self.tuning.countdown_steps > 0 {
            Cue::Countdown(self.tuning.countdown_steps)
        } else {
            Cue::AttackIntro
        };
        self.scheduler.schedule(self.tuning.intro_secs, first);
    }

    /// Restart with the difficulty of the previous match
    pub fn play_again(&mut self) -> Result<(), DuelError> {
        let difficulty = self.difficulty.ok_or(DuelError::NoDifficulty)?;
        self.start_game(difficulty);
        Ok(())
    }

    /// Abandon the match and return to the pre-game state
    pub fn reset(&mut self) {
        log::info!("Duel reset");
        self.clear_match();
        self.difficulty = None;
        self.enter(Phase::Intro);
    }

    fn clear_match(&mut self) {
        self.scheduler.cancel_all();
        self.dial.stop();
        self.score.reset();
        self.cpu = CpuState::new(self.tuning.initial_zone_count);
        self.countdown = None;
        self.seen_regen = 0;
        self.lap_resolved = false;
        self.rounds_played = 0;
        self.cpu_turns = 0;
        self.cpu_hit_colors.clear();
        self.last_round = None;
        self.ended_elapsed = 0.0;
    }

    // === Input ===

    /// Player tap. Returns the round it resolved, if any.
    ///
    /// Ignored outside combat phases and after the lap's first tap.
    pub fn attempt(&mut self) -> Option<RoundOutcome> {
        if !self.phase.accepts_input() {
            return None;
        }
        let player = self.dial.attempt()?;
        self.resolve_lap(RoundTrigger::Input, player)
    }

    // === Frame ===

    /// Advance scheduled transitions and the dial by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);

        for cue in self.scheduler.advance(dt) {
            log::trace!("Cue fired: {cue:?}");
            self.run_cue(cue);
        }

        if self.phase.is_terminal() {
            self.ended_elapsed += dt;
        }

        self.dial.tick(dt);

        let regen = self.dial.regen_count();
        if regen != self.seen_regen {
            self.seen_regen = regen;
            // The first regeneration closes the partial lap from home to the gate
            if regen > 1 && !self.lap_resolved {
                self.resolve_lap(RoundTrigger::LapTimeout, TurnOutcome::miss());
            }
            self.lap_resolved = false;
        }
    }

    fn run_cue(&mut self, cue: Cue) {
        match cue {
            Cue::Countdown(n) => {
                self.countdown = Some(n);
                self.enter(Phase::Countdown);
                let next = if n > 1 {
                    Cue::Countdown(n - 1)
                } else {
                    Cue::AttackIntro
                };
                self.scheduler.schedule(self.tuning.countdown_step_secs, next);
            }
            Cue::AttackIntro => {
                self.countdown = None;
                self.enter(Phase::AttackIntro);
                self.scheduler.schedule(self.tuning.attack_intro_secs, Cue::BeginPlay);
            }
            Cue::BeginPlay => {
                self.enter(Phase::Idle);
                self.dial.start();
                self.seen_regen = 0;
                self.lap_resolved = false;
            }
            Cue::ReturnToIdle => {
                if matches!(
                    self.phase,
                    Phase::PlayerScores | Phase::OpponentScores | Phase::Clash
                ) {
                    self.enter(Phase::Idle);
                }
            }
        }
    }

    // === Rounds ===

    /// Pair the player's lap result with one CPU turn and score it
    fn resolve_lap(&mut self, trigger: RoundTrigger, player: TurnOutcome) -> Option<RoundOutcome> {
        assert!(
            !self.lap_resolved,
            "lap {} resolved twice; score would be double-counted",
            self.dial.regen_count()
        );
        if !self.phase.accepts_input() {
            return None;
        }
        let difficulty = self.difficulty?;
        self.lap_resolved = true;

        let (cpu, next) = cpu_turn(self.cpu, difficulty, &mut self.rng);
        self.cpu = next;
        self.cpu_turns += 1;
        if let Some(color) = cpu.color {
            self.cpu_hit_colors.push(color);
            if self.cpu_hit_colors.len() > self.tuning.streak_len {
                let excess = self.cpu_hit_colors.len() - self.tuning.streak_len;
                self.cpu_hit_colors.drain(..excess);
            }
        }

        let (outcome, from) = self.score_round(player.points, cpu.points)?;
        log::debug!(
            "Round {} ({trigger:?}): player {} vs cpu {} -> score {}",
            self.rounds_played,
            player.points,
            cpu.points,
            outcome.score
        );
        self.publish(from, Some((trigger, player, cpu)), outcome);
        Some(outcome)
    }

    /// Score a round directly.
    ///
    /// No-op outside combat phases, including after the match has ended.
    pub fn resolve_round(&mut self, player_points: u32, cpu_points: u32) -> Option<RoundOutcome> {
        let (outcome, from) = self.score_round(player_points, cpu_points)?;
        self.publish(from, None, outcome);
        Some(outcome)
    }

    /// Score, then phase. Events are queued by `publish`.
    fn score_round(&mut self, player_points: u32, cpu_points: u32) -> Option<(RoundOutcome, Phase)> {
        if !self.phase.accepts_input() {
            return None;
        }
        let delta = i64::from(player_points) - i64::from(cpu_points);
        let delta = i32::try_from(delta).unwrap_or(if delta > 0 { i32::MAX } else { i32::MIN });
        let score = self.score.apply(delta);

        let phase = if self.score.is_decided() {
            if score > 0 { Phase::EndedWon } else { Phase::EndedLost }
        } else {
            Phase::for_delta(delta)
        };

        let from = self.phase;
        self.phase = phase;
        self.scheduler.cancel_all();

        if phase.is_terminal() {
            self.dial.stop();
            self.ended_elapsed = 0.0;
            log::info!(
                "Duel over: {} at {score} after {} rounds",
                phase.as_str(),
                self.rounds_played + 1
            );
        } else {
            let recover = if phase == Phase::Clash {
                self.tuning.clash_recover_secs
            } else {
                self.tuning.round_recover_secs
            };
            self.scheduler.schedule(recover, Cue::ReturnToIdle);
        }

        self.rounds_played += 1;
        let outcome = RoundOutcome { delta, score, phase };
        self.last_round = Some(outcome);
        Some((outcome, from))
    }

    fn publish(
        &mut self,
        from: Phase,
        turns: Option<(RoundTrigger, TurnOutcome, TurnOutcome)>,
        outcome: RoundOutcome,
    ) {
        if from != outcome.phase {
            self.events.push(GameEvent::PhaseChanged {
                from,
                to: outcome.phase,
            });
        }
        if let Some((trigger, player, cpu)) = turns {
            self.events.push(GameEvent::RoundResolved {
                trigger,
                player,
                cpu,
                outcome,
            });
        }
        if outcome.phase.is_terminal() {
            self.events.push(GameEvent::MatchEnded {
                player_won: outcome.phase == Phase::EndedWon,
                score: outcome.score,
            });
        }
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("Phase {} -> {}", self.phase.as_str(), phase.as_str());
            self.events.push(GameEvent::PhaseChanged {
                from: self.phase,
                to: phase,
            });
            self.phase = phase;
        }
    }

    // === Observables ===

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> i32 {
        self.score.value()
    }

    pub fn win_threshold(&self) -> i32 {
        self.score.limit()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Read-only view of the player's dial
    pub fn dial(&self) -> &DialEngine {
        &self.dial
    }

    pub fn cpu_zone_count(&self) -> u8 {
        self.cpu.zone_count
    }

    /// Recent CPU hit colors, oldest first
    pub fn cpu_hit_colors(&self) -> &[ZoneColor] {
        &self.cpu_hit_colors
    }

    pub fn cpu_turns(&self) -> u32 {
        self.cpu_turns
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn last_round(&self) -> Option<RoundOutcome> {
        self.last_round
    }

    /// Scheduled transitions not yet fired
    pub fn pending_transitions(&self) -> usize {
        self.scheduler.len()
    }

    /// "3", "2", "1" during the countdown, "FIGHT!" during the attack intro
    pub fn countdown_label(&self) -> Option<String> {
        match (self.phase, self.countdown) {
            (Phase::Countdown, Some(n)) => Some(n.to_string()),
            (Phase::AttackIntro, _) => Some("FIGHT!".to_string()),
            _ => None,
        }
    }

    /// Win/lose banner once the match is over
    pub fn banner(&self) -> Option<Banner> {
        let text = match self.phase {
            Phase::EndedWon => "YOU WIN",
            Phase::EndedLost => "YOU LOSE",
            _ => return None,
        };
        let fade = if self.tuning.banner_fade_secs > 0.0 {
            (self.ended_elapsed / self.tuning.banner_fade_secs).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Some(Banner { text, fade })
    }

    /// The player's last explicit tap; cleared on read
    pub fn take_last_attempt(&mut self) -> Option<TurnOutcome> {
        self.dial.take_last_attempt()
    }

    /// Whether a lap timed out since the last read
    pub fn take_auto_miss(&mut self) -> bool {
        self.dial.take_auto_miss()
    }

    /// Drain queued events in the order they happened
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
