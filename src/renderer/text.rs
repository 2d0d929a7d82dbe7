//! Coarse character-grid canvas for headless runs

use std::fmt;

use glam::IVec2;

use super::{Canvas, Sprite};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::state::PowerUpKind;

/// Field pixels per character cell
pub const CELL_WIDTH: i32 = 10;
pub const CELL_HEIGHT: i32 = 20;

/// Each sprite becomes one character at the cell under its centre
pub struct TextCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
}

impl Default for TextCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCanvas {
    pub fn new() -> Self {
        let cols = (FIELD_WIDTH / CELL_WIDTH) as usize;
        let rows = (FIELD_HEIGHT / CELL_HEIGHT) as usize;
        Self {
            cols,
            rows,
            cells: vec![' '; cols * rows],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    pub fn glyph(sprite: Sprite) -> char {
        match sprite {
            Sprite::Alien { tier: 0, .. } => 'W',
            Sprite::Alien { tier: 1, .. } => 'M',
            Sprite::Alien { .. } => 'V',
            Sprite::PlayerBullet { bomb: true } => 'o',
            Sprite::PlayerBullet { bomb: false } => '|',
            Sprite::AlienBullet => '!',
            Sprite::WallBlock => '#',
            Sprite::Player { index: 0 } => 'A',
            Sprite::Player { .. } => 'B',
            Sprite::MotherShip => '@',
            Sprite::PowerUp(PowerUpKind::Bomb) => '*',
            Sprite::PowerUp(PowerUpKind::ExtraLife) => '+',
            Sprite::PowerUp(PowerUpKind::FastFire) => '>',
            Sprite::PowerUp(PowerUpKind::SplitFire) => '^',
        }
    }

    /// Character at a cell; `None` outside the grid
    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }
}

impl Canvas for TextCanvas {
    fn draw(&mut self, sprite: Sprite, pos: IVec2, size: IVec2) {
        let centre = pos + size / 2;
        // Off-field sprites (a mother ship still entering) are skipped
        if centre.x < 0 || centre.y < 0 {
            return;
        }
        let (col, row) = ((centre.x / CELL_WIDTH) as usize, (centre.y / CELL_HEIGHT) as usize);
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = Self::glyph(sprite);
        }
    }
}

impl fmt::Display for TextCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
