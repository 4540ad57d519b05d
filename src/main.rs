//! Quick Duel entry point
//!
//! The native build has no window; it runs one autopiloted match at a fixed
//! timestep and prints the rounds as they resolve.
//!
//! Usage: `quick-duel [difficulty] [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use quick_duel::consts::{MAX_SUBSTEPS, SIM_DT};
    use quick_duel::Settings;
    use quick_duel::sim::{Difficulty, Duel, GameEvent, TickInput, tick};

    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match args.get(2) {
        Some(path) => match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{path}: {e}");
                std::process::exit(2);
            }
        },
        None => Settings::default(),
    };
    let difficulty = match args.first().map(|s| s.parse::<Difficulty>()) {
        Some(Ok(d)) => d,
        Some(Err(e)) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
        None => settings.difficulty,
    };
    let seed = args.get(1).and_then(|s| s.parse::<u64>().ok()).unwrap_or(12345);

    log::info!("Quick Duel (native) starting: {difficulty}, seed {seed}");

    let mut duel = Duel::new(seed);
    duel.start_game(difficulty);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    // Pretend the host renders at 30 fps and catches up in substeps
    let frame_dt = 1.0 / 30.0;
    let mut accumulator = 0.0;
    let mut frames = 0u32;
    while !duel.phase().is_terminal() && frames < 30 * 600 {
        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut duel, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }
        frames += 1;

        for event in duel.drain_events() {
            match event {
                GameEvent::RoundResolved {
                    player, cpu, outcome, ..
                } => {
                    let glow = if player.hit && settings.effective_dial_effects() {
                        " *"
                    } else {
                        ""
                    };
                    println!(
                        "round {:>3}: you {}{glow} vs cpu {} -> score {:+} ({})",
                        duel.rounds_played(),
                        player.points,
                        cpu.points,
                        outcome.score,
                        outcome.phase.as_str()
                    );
                }
                GameEvent::MatchEnded { score, .. } => {
                    println!("final score {score:+}");
                }
                GameEvent::PhaseChanged { .. } => {}
            }
        }
    }

    if !duel.phase().is_terminal() {
        log::warn!("Match still undecided after {frames} frames");
        return;
    }

    // Hold on the banner until it is fully shown
    let mut hold = 0u32;
    while let Some(banner) = duel.banner() {
        if settings.effective_banner_fade(banner.fade) >= 1.0 {
            println!("{} (banner shown after {hold} frames)", banner.text);
            break;
        }
        tick(&mut duel, &TickInput::default(), SIM_DT);
        hold += 1;
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives the library directly
}
