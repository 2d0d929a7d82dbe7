//! Pixel Invaders - a fixed-formation arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, walls, bullets, scoring)
//! - `renderer`: Render port and a text canvas for headless runs
//! - `audio`: Sound cue port with a global mute gate
//! - `highscores`: Persisted high score (bare integer)
//! - `error`: Storage errors (never fatal to a round)
//! - `settings`: Player-facing configuration
//! - `session`: Fixed-timestep frame driver tying the ports to the simulation

pub mod audio;
pub mod error;
pub mod highscores;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::StorageError;
pub use highscores::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
pub use session::{RoundSignal, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u64 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions (pixels)
    pub const FIELD_WIDTH: i32 = 800;
    pub const FIELD_HEIGHT: i32 = 800;

    /// Base grid unit; the game is drawn from 5px blocks
    pub const BLOCK_SIZE: i32 = 5;

    /// Starting lives for every player
    pub const STARTING_LIVES: u32 = 3;
}

/// Convert seconds of simulated time into ticks
#[inline]
pub const fn secs_to_ticks(secs: u64) -> u64 {
    secs * consts::TICKS_PER_SECOND
}
