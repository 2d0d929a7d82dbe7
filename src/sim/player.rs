//! Player controller: movement, the fire-mode state machine, lives and score

use glam::IVec2;

use super::state::{Bullet, BulletKind, Player, PowerUpKind, SplitState, PLAYER_WIDTH};
use crate::consts::*;
use crate::secs_to_ticks;

/// Pixels moved per tick while a direction is held
pub const MOVE_STEP: i32 = BLOCK_SIZE;
/// Moves toward an edge are ignored inside this margin
pub const EDGE_MARGIN: i32 = BLOCK_SIZE * 2;
/// Control is withheld this long after a non-fatal hit
pub const RESPAWN_DELAY: u64 = secs_to_ticks(2);
/// Shots per fast-fire activation
pub const FAST_FIRE_SHOTS: u32 = 10;
/// Distance the last fast-fire bullet must cover before the next may fire
pub const FAST_FIRE_SPACING: i32 = 100;

impl Player {
    /// Bullet spawn point
    pub fn muzzle(&self) -> IVec2 {
        IVec2::new(self.pos.x + BLOCK_SIZE * 7, FIELD_HEIGHT - 90)
    }

    /// Whether movement and fire input is applied this tick
    pub fn can_act(&self, now: u64) -> bool {
        !self.dead && self.lives > 0 && self.control_resumes_at.is_none_or(|t| now >= t)
    }

    /// Step one unit left or right. A step toward an edge the player is
    /// already at is dropped, not clamped.
    pub fn move_horizontal(&mut self, left: bool) {
        if left {
            if self.pos.x > EDGE_MARGIN {
                self.pos.x -= MOVE_STEP;
            }
        } else if self.pos.x < FIELD_WIDTH - PLAYER_WIDTH {
            self.pos.x += MOVE_STEP;
        }
    }

    /// Fire according to the held power-up. Returns the number of bullets
    /// created (0 when the current mode suppresses the shot).
    pub fn fire(&mut self) -> u32 {
        match self.power_up {
            Some(PowerUpKind::FastFire) => self.fire_fast(),
            Some(PowerUpKind::SplitFire) => self.fire_split(),
            Some(PowerUpKind::Bomb) => self.fire_single(BulletKind::Bomb),
            Some(PowerUpKind::ExtraLife) | None => self.fire_single(BulletKind::Normal),
        }
    }

    fn fire_single(&mut self, kind: BulletKind) -> u32 {
        if self.shot.is_some() {
            return 0;
        }
        self.shot = Some(Bullet::from_player(self.muzzle(), kind));
        self.power_up = None;
        1
    }

    fn fire_fast(&mut self) -> u32 {
        let spaced = self
            .volley
            .last()
            .is_none_or(|last| last.pos.y <= self.pos.y - FAST_FIRE_SPACING);
        if self.volley_shots >= FAST_FIRE_SHOTS || !spaced {
            return 0;
        }

        self.volley
            .push(Bullet::from_player(self.muzzle(), BulletKind::Normal));
        self.volley_shots += 1;
        if self.volley_shots == FAST_FIRE_SHOTS {
            self.power_up = None;
            self.volley_shots = 0;
        }
        1
    }

    fn fire_split(&mut self) -> u32 {
        if !self.volley.is_empty() {
            return 0;
        }
        let muzzle = self.muzzle();
        self.volley.extend(
            [SplitState::SplitLeft, SplitState::SplitCenter, SplitState::SplitRight]
                .map(|split| Bullet::from_player(muzzle, BulletKind::Normal).with_split(split)),
        );
        self.power_up = None;
        3
    }

    /// Box test against an alien bullet; a player without lives can't be hit
    pub fn has_been_hit(&self, bullet: &Bullet) -> bool {
        let size = self.size();
        self.lives > 0
            && bullet.pos.x >= self.pos.x
            && bullet.pos.x <= self.pos.x + size.x
            && bullet.pos.y >= self.pos.y
            && bullet.pos.y <= self.pos.y + size.y
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.dead = true;
        }
    }

    pub fn kill(&mut self) {
        self.lives = 0;
        self.dead = true;
    }

    /// Back to the start position with control withheld until the respawn delay passes
    pub fn reset(&mut self, now: u64) {
        self.pos.x = self.start_x;
        self.control_resumes_at = Some(now + RESPAWN_DELAY);
        if self.lives > 0 {
            self.dead = false;
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Apply a collected power-up: an extra life lands at once, the rest wait for the next shot
    pub fn pick_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::ExtraLife => self.lives += 1,
            _ => {
                self.power_up = Some(kind);
                self.volley_shots = 0;
            }
        }
    }
}
