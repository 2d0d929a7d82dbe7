//! Frame driver
//!
//! Owns one round's world plus the ports around it. Wall-clock frame time is
//! accumulated into whole simulation ticks; after each tick the recorded
//! events are turned into audio cues, the high score is kept current and
//! round lifecycle signals are queued for the surrounding UI.

use serde::Serialize;

use crate::audio::AudioManager;
use crate::consts::*;
use crate::highscores::HighScoreStore;
use crate::renderer::{Canvas, draw_world};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, TickInput, tick};

/// Round lifecycle notifications for the menu/UI layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RoundSignal {
    GameOver {
        scores: Vec<u32>,
        high_score: u32,
        new_high_score: bool,
    },
    RoundReset {
        seed: u64,
    },
}

/// Game instance holding all state
pub struct Session {
    state: GameState,
    settings: Settings,
    audio: AudioManager,
    store: Box<dyn HighScoreStore>,
    /// Best known score, stored or current
    high_score: u32,
    /// High score when the round began
    round_start_high_score: u32,
    accumulator: f32,
    /// Input applied on the next tick; `pause` is cleared once consumed
    pub input: TickInput,
    signals: Vec<RoundSignal>,
}

impl Session {
    pub fn new(
        settings: Settings,
        seed: u64,
        mut audio: AudioManager,
        store: Box<dyn HighScoreStore>,
    ) -> Self {
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let high_score = store.read_high_score();
        log::info!("Session starting, high score {}", high_score);

        Self {
            state: GameState::new(seed, settings.two_player),
            settings,
            audio,
            store,
            high_score,
            round_start_high_score: high_score,
            accumulator: 0.0,
            input: TickInput::default(),
            signals: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    /// Run simulation ticks for `dt` seconds of wall-clock time. Returns the
    /// number of ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pause = false;
        }
        substeps
    }

    /// Exactly one simulation tick plus its side effects
    pub fn step(&mut self) {
        let was_over = self.is_over();
        tick(&mut self.state, &self.input);

        for event in self.state.drain_events() {
            log::debug!("{:?}", event);
            self.audio.play_event(&event);
        }

        let best = self.state.best_score();
        if best > self.high_score {
            self.high_score = best;
            self.store.write_high_score(best);
        }

        if !was_over && self.is_over() {
            // Another session may have stored a better score meanwhile
            self.high_score = self.high_score.max(self.store.read_high_score());
            let scores = self.state.players.iter().map(|p| p.score).collect();
            log::info!("Round over, high score {}", self.high_score);
            self.signals.push(RoundSignal::GameOver {
                scores,
                high_score: self.high_score,
                new_high_score: best > self.round_start_high_score,
            });
        }
    }

    /// Reset game state for a new round
    pub fn restart(&mut self, seed: u64) {
        self.state = GameState::new(seed, self.settings.two_player);
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.round_start_high_score = self.high_score;
        self.signals.push(RoundSignal::RoundReset { seed });
    }

    /// Take lifecycle signals queued since the last call
    pub fn drain_signals(&mut self) -> Vec<RoundSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Render the current frame
    pub fn render(&self, canvas: &mut impl Canvas) {
        draw_world(&self.state, canvas);
    }
}
