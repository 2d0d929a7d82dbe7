//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (cadences count ticks, never wall-clock time)
//! - Seeded RNG only
//! - Stable iteration order (row-major aliens, player one before player two)
//! - No rendering, audio or storage dependencies

pub mod cadence;
pub mod collision;
pub mod formation;
pub mod mothership;
pub mod player;
pub mod powerup;
pub mod state;
pub mod tick;
pub mod wall;

pub use cadence::Cadence;
pub use collision::{HitTarget, resolve_player_bullets};
pub use formation::Formation;
pub use mothership::MotherShipController;
pub use powerup::PowerUpEconomy;
pub use state::{
    Alien, Bullet, BulletKind, GameEvent, GamePhase, GameState, Heading, MotherShip, Player,
    Position, PowerUp, PowerUpKind, SplitState,
};
pub use tick::{PlayerInput, TickInput, tick};
pub use wall::{Block, Section, SectionId, Wall};
