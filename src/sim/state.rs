//! Game state and core simulation types
//!
//! Entities are passive data here; the controllers in the sibling modules
//! add the behaviour. `GameState` is the single world object every
//! controller reads and mutates.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::formation::Formation;
use super::mothership::MotherShipController;
use super::powerup::PowerUpEconomy;
use super::wall::{self, SectionId, Wall};
use crate::consts::*;

/// Integer pixel position
pub type Position = IVec2;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// World frozen by the pause toggle
    Paused,
    /// Round ended; no further input is applied
    GameOver,
}

// === Aliens ===

/// Alien box edge length (the box is centred on the alien's position)
pub const ALIEN_SIZE: i32 = 40;

/// Kill score by tier
pub const TIER_SCORES: [u32; 3] = [30, 20, 10];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    /// 0 (top rows, most valuable) to 2
    pub tier: u8,
    pub pos: Position,
    /// Horizontal step per cadence tick; the sign is the direction of travel
    pub speed: i32,
    /// Alternate sprite pose (animation only)
    pub alt_pose: bool,
}

impl Alien {
    pub fn new(tier: u8, pos: Position, speed: i32) -> Self {
        Self {
            tier: tier.min(2),
            pos,
            speed,
            alt_pose: false,
        }
    }

    pub fn kill_score(&self) -> u32 {
        TIER_SCORES[self.tier as usize]
    }

    pub fn half_extent(&self) -> i32 {
        ALIEN_SIZE / 2
    }
}

// === Bullets ===

pub const BULLET_WIDTH: i32 = 5;
pub const BULLET_HEIGHT: i32 = 15;
pub const BULLET_SPEED: i32 = 11;

/// Which way a bullet travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    /// Fired by a player, moving up
    TowardAliens,
    /// Fired by an alien, moving down
    TowardPlayers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletKind {
    #[default]
    Normal,
    /// Half speed, destroys every alien around the one it hits
    Bomb,
}

/// Split-fire drift state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitState {
    #[default]
    NotSplit,
    SplitLeft,
    SplitRight,
    SplitCenter,
}

/// Altitude (y) above which split bullets start drifting sideways
pub const SPLIT_DRIFT_Y: i32 = FIELD_HEIGHT - 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub origin: Position,
    pub pos: Position,
    pub heading: Heading,
    pub kind: BulletKind,
    pub split: SplitState,
}

impl Bullet {
    pub fn new(origin: Position, heading: Heading, kind: BulletKind) -> Self {
        Self {
            origin,
            pos: origin,
            heading,
            kind,
            split: SplitState::NotSplit,
        }
    }

    pub fn from_player(origin: Position, kind: BulletKind) -> Self {
        Self::new(origin, Heading::TowardAliens, kind)
    }

    pub fn from_alien(origin: Position) -> Self {
        Self::new(origin, Heading::TowardPlayers, BulletKind::Normal)
    }

    pub fn with_split(mut self, split: SplitState) -> Self {
        self.split = split;
        self
    }

    pub fn is_bomb(&self) -> bool {
        self.kind == BulletKind::Bomb
    }

    /// Vertical pixels travelled per tick
    pub fn speed(&self) -> i32 {
        match self.kind {
            BulletKind::Normal => BULLET_SPEED,
            BulletKind::Bomb => BULLET_SPEED / 2,
        }
    }

    /// Top edge of the bullet (its leading edge when fired by a player)
    pub fn top(&self) -> i32 {
        self.pos.y - BULLET_HEIGHT / 2
    }

    /// True once the bullet has reached the top (player) or bottom (alien) of the field
    pub fn has_left_field(&self) -> bool {
        match self.heading {
            Heading::TowardAliens => self.pos.y - BULLET_WIDTH <= 0,
            Heading::TowardPlayers => self.pos.y + BULLET_WIDTH >= FIELD_HEIGHT - 50,
        }
    }

    /// Move one tick along the bullet's heading
    pub fn advance(&mut self) {
        let speed = self.speed();
        match self.heading {
            Heading::TowardAliens => {
                self.pos.y -= speed;
                if self.pos.y <= SPLIT_DRIFT_Y {
                    match self.split {
                        SplitState::SplitLeft => self.pos.x -= speed / 4,
                        SplitState::SplitRight => self.pos.x += speed / 4,
                        SplitState::NotSplit | SplitState::SplitCenter => {}
                    }
                }
            }
            Heading::TowardPlayers => self.pos.y += speed,
        }
    }
}

// === Mother ship ===

pub const MOTHERSHIP_SIZE: i32 = 60;
pub const MOTHERSHIP_SPEED: i32 = 5;
pub const MOTHERSHIP_Y: i32 = 40;
/// Bonus values a mother ship can be worth
pub const MOTHERSHIP_BONUSES: [u32; 3] = [150, 100, 50];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotherShip {
    /// Top-left corner of the ship's box
    pub pos: Position,
    pub moving_left: bool,
}

impl MotherShip {
    /// A ship just off-field on the side it enters from
    pub fn entering(moving_left: bool) -> Self {
        let x = if moving_left {
            FIELD_WIDTH + MOTHERSHIP_SIZE
        } else {
            -MOTHERSHIP_SIZE
        };
        Self {
            pos: IVec2::new(x, MOTHERSHIP_Y),
            moving_left,
        }
    }

    pub fn advance(&mut self) {
        self.pos.x += if self.moving_left {
            -MOTHERSHIP_SPEED
        } else {
            MOTHERSHIP_SPEED
        };
    }

    /// Fully past the far edge of the field
    pub fn has_escaped(&self) -> bool {
        if self.moving_left {
            self.pos.x + MOTHERSHIP_SIZE < 0
        } else {
            self.pos.x > FIELD_WIDTH
        }
    }

    pub fn size(&self) -> IVec2 {
        IVec2::splat(MOTHERSHIP_SIZE)
    }
}

// === Power-ups ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Bomb,
    ExtraLife,
    FastFire,
    SplitFire,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Bomb,
        PowerUpKind::ExtraLife,
        PowerUpKind::FastFire,
        PowerUpKind::SplitFire,
    ];
}

pub const POWERUP_WIDTH: i32 = 20;
pub const POWERUP_Y: i32 = FIELD_HEIGHT - 80;
const POWERUP_MIN_SIZE: f32 = 15.0;
const POWERUP_MAX_SIZE: f32 = 25.0;
const POWERUP_PULSE_STEP: f32 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    /// Centre of the pickup
    pub pos: Position,
    pub kind: PowerUpKind,
    /// Drawn size; pulses between 15 and 25 (animation only)
    pub size: f32,
    growing: bool,
}

impl PowerUp {
    pub fn new(x: i32, kind: PowerUpKind) -> Self {
        Self {
            pos: IVec2::new(x, POWERUP_Y),
            kind,
            size: 20.0,
            growing: true,
        }
    }

    pub fn pulse(&mut self) {
        self.size += if self.growing {
            POWERUP_PULSE_STEP
        } else {
            -POWERUP_PULSE_STEP
        };
        if self.size <= POWERUP_MIN_SIZE {
            self.growing = true;
        } else if self.size >= POWERUP_MAX_SIZE {
            self.growing = false;
        }
    }
}

// === Players ===

pub const PLAYER_WIDTH: i32 = 80;
pub const PLAYER_HEIGHT: i32 = 35;
pub const PLAYER_Y: i32 = FIELD_HEIGHT - 70;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// 0 for player one, 1 for player two
    pub index: usize,
    /// Top-left corner of the player's box
    pub pos: Position,
    /// X position restored after a hit
    pub start_x: i32,
    pub lives: u32,
    pub score: u32,
    /// Single held power-up, consumed by the next fire action
    pub power_up: Option<PowerUpKind>,
    /// Normal/bomb bullet slot
    pub shot: Option<Bullet>,
    /// Fast-fire and split-fire bullets, oldest first
    pub volley: Vec<Bullet>,
    /// Shots fired during the current fast-fire activation
    pub volley_shots: u32,
    pub dead: bool,
    /// Tick on which control returns after a hit
    pub control_resumes_at: Option<u64>,
}

impl Player {
    pub fn new(index: usize, start_x: i32) -> Self {
        Self {
            index,
            pos: IVec2::new(start_x, PLAYER_Y),
            start_x,
            lives: STARTING_LIVES,
            score: 0,
            power_up: None,
            shot: None,
            volley: Vec::new(),
            volley_shots: 0,
            dead: false,
            control_resumes_at: None,
        }
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Every bullet this player has in flight
    pub fn bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.shot.iter().chain(self.volley.iter())
    }
}

/// Starting x for each player
pub fn player_start_positions(two_player: bool) -> Vec<i32> {
    if two_player {
        vec![225, FIELD_WIDTH - 300]
    } else {
        vec![FIELD_WIDTH / 2 - BLOCK_SIZE * 5]
    }
}

// === Events ===

/// Things that happened during a tick, drained by the session each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { player: usize, bullets: u32 },
    AlienKilled { player: usize, tier: u8, score: u32, by_bomb: bool },
    BombDetonated { player: usize, at: Position, kills: u32 },
    WallHit { wall: usize, section: Option<SectionId> },
    PlayerHit { player: usize, lives_left: u32 },
    FormationStep { high_pitch: bool },
    FormationRebuilt,
    FormationLanded,
    AlienFired { at: Position },
    MotherShipSpawned { moving_left: bool },
    MotherShipHum,
    MotherShipHit { player: usize, bonus: u32 },
    MotherShipEscaped,
    PowerUpSpawned { kind: PowerUpKind, x: i32 },
    PowerUpCollected { player: usize, kind: PowerUpKind },
    GameOver,
}

// === World ===

/// Complete world state for one round
#[derive(Debug, Clone)]
pub struct GameState {
    /// Round seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub players: Vec<Player>,
    pub formation: Formation,
    pub walls: Vec<Wall>,
    pub mothership: MotherShipController,
    pub powerups: PowerUpEconomy,
    /// Events recorded since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a fresh round with the given seed
    pub fn new(seed: u64, two_player: bool) -> Self {
        let players = player_start_positions(two_player)
            .into_iter()
            .enumerate()
            .map(|(index, x)| Player::new(index, x))
            .collect();

        log::info!("New round: seed={} two_player={}", seed, two_player);

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            players,
            formation: Formation::new(0),
            walls: wall::build_walls(),
            mothership: MotherShipController::new(0),
            powerups: PowerUpEconomy::new(),
            events: Vec::new(),
        }
    }

    pub fn is_two_player(&self) -> bool {
        self.players.len() > 1
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Highest score among the players
    pub fn best_score(&self) -> u32 {
        self.players.iter().map(|p| p.score).max().unwrap_or(0)
    }
}
