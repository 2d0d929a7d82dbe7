//! Render port
//!
//! The core walks the world once per frame and hands every visible entity to
//! a `Canvas` as (sprite, top-left position, size). Pixel formats and
//! sprite art belong to the canvas.

pub mod text;

pub use text::TextCanvas;

use glam::IVec2;

use crate::consts::BLOCK_SIZE;
use crate::sim::state::{ALIEN_SIZE, BULLET_HEIGHT, BULLET_WIDTH, GameState, PowerUpKind};

/// What to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Alien { tier: u8, alt_pose: bool },
    PlayerBullet { bomb: bool },
    AlienBullet,
    WallBlock,
    Player { index: usize },
    MotherShip,
    PowerUp(PowerUpKind),
}

/// Render target
pub trait Canvas {
    fn draw(&mut self, sprite: Sprite, pos: IVec2, size: IVec2);
}

/// Draw every visible entity, back to front
pub fn draw_world(state: &GameState, canvas: &mut impl Canvas) {
    let block = IVec2::splat(BLOCK_SIZE);
    for wall in &state.walls {
        for b in wall.blocks() {
            canvas.draw(Sprite::WallBlock, b.pos - block / 2, block);
        }
    }

    let alien = IVec2::splat(ALIEN_SIZE);
    for a in state.formation.aliens() {
        canvas.draw(
            Sprite::Alien {
                tier: a.tier,
                alt_pose: a.alt_pose,
            },
            a.pos - alien / 2,
            alien,
        );
    }

    if let Some(ship) = state.mothership.ship() {
        canvas.draw(Sprite::MotherShip, ship.pos, ship.size());
    }

    if let Some(power_up) = state.powerups.current() {
        // Pulse only changes the drawn size
        let size = IVec2::splat(power_up.size.round() as i32);
        canvas.draw(Sprite::PowerUp(power_up.kind), power_up.pos - size / 2, size);
    }

    let bullet = IVec2::new(BULLET_WIDTH, BULLET_HEIGHT);
    for b in &state.formation.bullets {
        canvas.draw(Sprite::AlienBullet, b.pos, bullet);
    }

    for player in state.players.iter().filter(|p| !p.dead) {
        for b in player.bullets() {
            canvas.draw(Sprite::PlayerBullet { bomb: b.is_bomb() }, b.pos, bullet);
        }
        canvas.draw(Sprite::Player { index: player.index }, player.pos, player.size());
    }
}
