//! Pixel Invaders - native headless runner
//!
//! Plays an attract-mode round (autopilot on player one) for the configured
//! number of ticks, then prints the final frame and a JSON summary.

#[cfg(not(target_arch = "wasm32"))]
fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pixel_invaders::audio::AudioManager;
    use pixel_invaders::consts::SIM_DT;
    use pixel_invaders::renderer::TextCanvas;
    use pixel_invaders::{FileHighScoreStore, Session, Settings};

    env_logger::init();
    log::info!("Pixel Invaders (native) starting...");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(time_seed);
    let demo_ticks = settings.demo_ticks;
    let store = FileHighScoreStore::new(&settings.high_score_path);
    log::info!("Demo round with seed: {}", seed);

    let mut session = Session::new(settings, seed, AudioManager::default(), Box::new(store));
    session.input.idle_mode = true;

    // One frame per tick; the demo isn't paced against the wall clock
    for _ in 0..demo_ticks {
        if session.is_over() {
            break;
        }
        session.update(SIM_DT);
    }

    let mut canvas = TextCanvas::new();
    session.render(&mut canvas);
    println!("{}", canvas);

    let signals = session.drain_signals();
    let state = session.state();
    let summary = serde_json::json!({
        "seed": seed,
        "ticks": state.time_ticks,
        "phase": state.phase,
        "scores": state.players.iter().map(|p| p.score).collect::<Vec<_>>(),
        "lives": state.players.iter().map(|p| p.lives).collect::<Vec<_>>(),
        "aliens_left": state.formation.alien_count(),
        "high_score": session.high_score(),
        "signals": signals,
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `Session` directly; there is no wasm binary entry point
}
