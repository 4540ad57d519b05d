//! Whole-match behavior through the public API

use proptest::prelude::*;
use quick_duel::consts::SIM_DT;
use quick_duel::sim::{Difficulty, Duel, GameEvent, Phase, RoundTrigger, TickInput, tick};
use quick_duel::{DuelError, Settings, Tuning};

fn run_until<F: Fn(&Duel) -> bool>(duel: &mut Duel, input: &TickInput, done: F) {
    for _ in 0..60 * 600 {
        if done(duel) {
            return;
        }
        tick(duel, input, SIM_DT);
    }
    panic!("condition never met (phase {:?})", duel.phase());
}

#[test]
fn test_untouched_match_is_lost() {
    let mut duel = Duel::new(99);
    duel.start_game(Difficulty::Advanced);
    run_until(&mut duel, &TickInput::default(), |d| d.phase().is_terminal());

    assert_eq!(duel.phase(), Phase::EndedLost);
    assert_eq!(duel.score(), -duel.win_threshold());
    assert!(!duel.dial().is_active());

    let events = duel.drain_events();
    let rounds: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::RoundResolved { trigger, player, .. } => Some((*trigger, player.points)),
            _ => None,
        })
        .collect();
    assert!(!rounds.is_empty());
    assert!(rounds.iter().all(|&(t, p)| t == RoundTrigger::LapTimeout && p == 0));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::MatchEnded { player_won: false, .. }))
            .count(),
        1
    );

    // Nothing moves once the match is over
    let angle = duel.dial().angle();
    let turns = duel.cpu_turns();
    for _ in 0..300 {
        tick(&mut duel, &TickInput { attempt: true, ..Default::default() }, SIM_DT);
    }
    assert_eq!(duel.dial().angle(), angle);
    assert_eq!(duel.cpu_turns(), turns);
    assert_eq!(duel.banner().map(|b| b.fade), Some(1.0));
}

#[test]
fn test_play_again_after_demo_match() {
    let mut duel = Duel::new(5);
    assert!(matches!(duel.play_again(), Err(DuelError::NoDifficulty)));

    let demo = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    duel.start_game(Difficulty::Intermediate);
    run_until(&mut duel, &demo, |d| d.phase().is_terminal());

    duel.play_again().unwrap();
    assert_eq!(duel.phase(), Phase::Intro);
    assert_eq!(duel.score(), 0);
    assert_eq!(duel.difficulty(), Some(Difficulty::Intermediate));
    run_until(&mut duel, &demo, |d| d.phase() == Phase::Idle);
    assert!(duel.dial().is_active());
    assert_eq!(duel.dial().zone_count(), 4);
}

#[test]
fn test_settings_pick_difficulty() {
    let settings = Settings::from_json(r#"{"difficulty":"intermediate"}"#).unwrap();
    let mut duel = Duel::new(1);
    duel.start_game(settings.difficulty);
    assert_eq!(duel.difficulty(), Some(Difficulty::Intermediate));
}

#[test]
fn test_custom_tuning_threshold() {
    let tuning = Tuning::from_json(r#"{"win_threshold": 4}"#).unwrap();
    let mut duel = Duel::with_tuning(8, tuning).unwrap();
    duel.start_game(Difficulty::Beginner);
    run_until(&mut duel, &TickInput::default(), |d| d.phase() == Phase::Idle);

    let outcome = duel.resolve_round(4, 0).unwrap();
    assert_eq!(outcome.phase, Phase::EndedWon);
    assert_eq!(duel.score(), 4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_score_bounded_and_cpu_zones_in_range(
        seed in any::<u64>(),
        tier in 0usize..3,
        taps in prop::collection::vec(any::<bool>(), 200..800),
    ) {
        let mut duel = Duel::new(seed);
        duel.start_game(Difficulty::ALL[tier]);
        let limit = duel.win_threshold();

        for tap in taps.iter().cycle().take(taps.len() * 4) {
            let input = TickInput { attempt: *tap, ..Default::default() };
            tick(&mut duel, &input, SIM_DT);

            prop_assert!((-limit..=limit).contains(&duel.score()));
            prop_assert!((1..=4).contains(&duel.cpu_zone_count()));
            prop_assert!((1..=4).contains(&duel.dial().zone_count()));
            prop_assert!(duel.dial().zones().len() <= 4);
            if duel.phase().is_terminal() {
                prop_assert_eq!(duel.score().abs(), limit);
            }
        }
    }
}
