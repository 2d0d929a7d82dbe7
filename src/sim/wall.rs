//! Destructible walls
//!
//! Each wall owns six sections laid out as a 3x2 grid. A section is a bag of
//! 5px blocks plus a damage tier counting down from 4; the two always agree:
//! the bag is empty exactly when the tier is 0.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Bullet;
use crate::consts::*;

pub const WALL_COUNT: i32 = 4;
/// Wall width and height
pub const WALL_SIZE: i32 = 105;
/// Offset between neighbouring sections
pub const SECTION_STRIDE: i32 = 35;
pub const WALL_Y: i32 = FIELD_HEIGHT - 200;
pub const MAX_DAMAGE_TIER: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionId {
    TopLeft,
    TopMiddle,
    TopRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

impl SectionId {
    pub const ALL: [SectionId; 6] = [
        SectionId::TopLeft,
        SectionId::TopMiddle,
        SectionId::TopRight,
        SectionId::BottomLeft,
        SectionId::BottomMiddle,
        SectionId::BottomRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_top(self) -> bool {
        matches!(
            self,
            SectionId::TopLeft | SectionId::TopMiddle | SectionId::TopRight
        )
    }

    /// Horizontal third of the wall (0 = left)
    pub fn column(self) -> i32 {
        (self.index() % 3) as i32
    }

    fn top_of(column: usize) -> Self {
        Self::ALL[column]
    }

    fn bottom_of(column: usize) -> Self {
        Self::ALL[column + 3]
    }

    /// Section's top-left corner relative to the wall
    fn offset(self) -> IVec2 {
        let row = if self.is_top() { 0 } else { 1 };
        IVec2::new(self.column() * SECTION_STRIDE, row * SECTION_STRIDE)
    }

    /// Block rows as (x offset, block count). Corner sections taper toward
    /// their outer edge; bottom-middle is only two rows tall, leaving the arch.
    fn template(self) -> Vec<(i32, i32)> {
        let rows = if self == SectionId::BottomMiddle { 2 } else { 7 };
        (0..rows)
            .map(|i| match self {
                SectionId::TopRight if i < 4 => (0, 3 + i),
                SectionId::TopLeft if i < 4 => (BLOCK_SIZE * (4 - i), 3 + i),
                SectionId::BottomLeft if i > 1 => (0, if i < 5 { 9 - i } else { 5 }),
                SectionId::BottomRight if i > 1 => {
                    let count = 1 + if i < 5 { 9 - i } else { 5 };
                    (BLOCK_SIZE * (7 - count), count)
                }
                _ => (0, 7),
            })
            .collect()
    }
}

/// One 5x5 piece of a wall, centred on `pos`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub pos: IVec2,
    pub section: SectionId,
}

impl Block {
    /// Overlap test with half-extent 2.5. The bullet also counts when its
    /// position five pixels ahead on x lands on the block, so thin bullets
    /// don't slip between columns.
    pub fn is_hit_by(&self, bullet_pos: IVec2) -> bool {
        // Doubled coordinates keep the 2.5 half-extent exact in integers
        let within = |p: i32, c: i32| (2 * (p - c)).abs() <= BLOCK_SIZE;
        let within_x =
            within(bullet_pos.x + BLOCK_SIZE, self.pos.x) || within(bullet_pos.x, self.pos.x);
        within_x && within(bullet_pos.y, self.pos.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    /// 4 = intact, 0 = destroyed
    pub tier: u8,
    pub blocks: Vec<Block>,
}

impl Section {
    fn build(id: SectionId, origin: IVec2) -> Self {
        let mut blocks = Vec::new();
        for (row, (x_offset, count)) in id.template().into_iter().enumerate() {
            for col in 0..count {
                blocks.push(Block {
                    pos: origin + IVec2::new(x_offset + col * BLOCK_SIZE, row as i32 * BLOCK_SIZE),
                    section: id,
                });
            }
        }
        Self {
            id,
            tier: MAX_DAMAGE_TIER,
            blocks,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.tier == 0
    }

    /// Apply one hit. Bombs clear the section outright; a normal hit drops the
    /// tier by one and erodes a random subset of blocks (everything left goes
    /// on the hit that takes the tier from 1 to 0).
    pub fn damage(&mut self, is_bomb: bool, rng: &mut impl Rng) {
        if self.is_destroyed() {
            return;
        }

        if is_bomb || self.tier == 1 {
            self.blocks.clear();
            self.tier = 0;
            return;
        }

        let count = self.blocks.len().max(1);
        let mut index = 0usize;
        self.blocks.retain(|_| {
            let modulus = rng.random_range(1..=count);
            let remove = index % modulus == 0;
            index += 1;
            !remove
        });

        self.tier -= 1;
        if self.blocks.is_empty() {
            self.tier = 0;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    /// Top-left anchor
    pub pos: IVec2,
    sections: [Section; 6],
}

impl Wall {
    pub fn new(pos: IVec2) -> Self {
        let sections = SectionId::ALL.map(|id| Section::build(id, pos + id.offset()));
        Self { pos, sections }
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id.index()]
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }

    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }

    /// Damage the section a bullet at (x, y) lands on.
    ///
    /// The wall is split into thirds on x. Within a third the bottom section
    /// takes the hit unless y is in the top band or that bottom section is
    /// already gone. Returns `None` when x falls outside the wall.
    ///
    /// The chosen section may already be at tier 0 (a forward-tolerance hit
    /// past the last block); the hit is still reported and has no effect.
    pub fn damage(
        &mut self,
        bullet_x: i32,
        bullet_y: i32,
        is_bomb: bool,
        rng: &mut impl Rng,
    ) -> Option<SectionId> {
        let (x, y) = (self.pos.x, self.pos.y);
        let third = WALL_SIZE / 3;
        let in_top_band = bullet_y >= y && bullet_y <= y + WALL_SIZE / 4;

        let column = if bullet_x >= x && bullet_x <= x + third {
            0
        } else if bullet_x >= x + third && bullet_x <= x + third * 2 {
            1
        } else if bullet_x >= x + third * 2 && bullet_x <= x + WALL_SIZE {
            2
        } else {
            log::debug!("Wall hit at x={} outside every section", bullet_x);
            return None;
        };

        let bottom = SectionId::bottom_of(column);
        let target = if in_top_band || self.section(bottom).is_destroyed() {
            SectionId::top_of(column)
        } else {
            bottom
        };

        self.sections[target.index()].damage(is_bomb, rng);
        Some(target)
    }

    fn first_block_hit(&self, bullet_pos: IVec2) -> bool {
        self.blocks().any(|block| block.is_hit_by(bullet_pos))
    }
}

/// The four walls of a fresh round
pub fn build_walls() -> Vec<Wall> {
    (1..=WALL_COUNT)
        .map(|i| Wall::new(IVec2::new(200 * i - 100 - 47, WALL_Y)))
        .collect()
}

/// Outcome of a bullet reaching a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallHit {
    pub wall: usize,
    pub section: Option<SectionId>,
}

/// Scan walls, sections and blocks in order; the first block the bullet
/// overlaps damages its wall and stops the scan.
pub fn has_hit_wall(walls: &mut [Wall], bullet: &Bullet, rng: &mut impl Rng) -> Option<WallHit> {
    let wall_index = walls.iter().position(|w| w.first_block_hit(bullet.pos))?;
    let section = walls[wall_index].damage(bullet.pos.x, bullet.pos.y, bullet.is_bomb(), rng);
    Some(WallHit {
        wall: wall_index,
        section,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BulletKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_section_templates() {
        let wall = Wall::new(IVec2::new(53, 600));
        let counts: Vec<usize> = wall.sections().iter().map(|s| s.blocks.len()).collect();
        assert_eq!(counts, vec![39, 49, 39, 42, 14, 47]);
        assert!(wall.sections().iter().all(|s| s.tier == MAX_DAMAGE_TIER));
    }

    #[test]
    fn test_section_offsets() {
        let wall = Wall::new(IVec2::new(53, 600));
        let top_middle = wall.section(SectionId::TopMiddle);
        assert_eq!(top_middle.blocks[0].pos, IVec2::new(53 + 35, 600));
        let bottom_left = wall.section(SectionId::BottomLeft);
        assert_eq!(bottom_left.blocks[0].pos, IVec2::new(53, 635));
        // Top-left tapers on its outer (left) edge
        let top_left = wall.section(SectionId::TopLeft);
        assert_eq!(top_left.blocks[0].pos, IVec2::new(53 + 20, 600));
    }

    #[test]
    fn test_walls_positions() {
        let walls = build_walls();
        let xs: Vec<i32> = walls.iter().map(|w| w.pos.x).collect();
        assert_eq!(xs, vec![53, 253, 453, 653]);
        assert!(walls.iter().all(|w| w.pos.y == WALL_Y));
    }

    #[test]
    fn test_bomb_clears_section() {
        let mut wall = Wall::new(IVec2::new(53, 600));
        let hit = wall.damage(60, 680, true, &mut rng());
        assert_eq!(hit, Some(SectionId::BottomLeft));
        let section = wall.section(SectionId::BottomLeft);
        assert_eq!(section.tier, 0);
        assert!(section.blocks.is_empty());
    }

    #[test]
    fn test_bottom_first_then_top() {
        let mut wall = Wall::new(IVec2::new(53, 600));
        let mut rng = rng();
        assert_eq!(wall.damage(100, 680, true, &mut rng), Some(SectionId::BottomMiddle));
        // Bottom of the middle third gone: the same shot now erodes the top
        assert_eq!(wall.damage(100, 680, false, &mut rng), Some(SectionId::TopMiddle));
        assert_eq!(wall.section(SectionId::TopMiddle).tier, 3);
    }

    #[test]
    fn test_top_band_hits_top_section() {
        let mut wall = Wall::new(IVec2::new(53, 600));
        assert_eq!(wall.damage(150, 610, false, &mut rng()), Some(SectionId::TopRight));
        assert_eq!(wall.section(SectionId::BottomRight).tier, MAX_DAMAGE_TIER);
    }

    #[test]
    fn test_hit_on_destroyed_third_reported_without_effect() {
        let mut wall = Wall::new(IVec2::new(53, 600));
        let mut rng = rng();
        wall.damage(60, 680, true, &mut rng);
        assert_eq!(wall.damage(60, 680, true, &mut rng), Some(SectionId::TopLeft));
        let before = wall.block_count();

        assert_eq!(wall.damage(60, 680, false, &mut rng), Some(SectionId::TopLeft));
        assert_eq!(wall.section(SectionId::TopLeft).tier, 0);
        assert_eq!(wall.block_count(), before);
    }

    #[test]
    fn test_outside_wall_registers_no_section() {
        let mut wall = Wall::new(IVec2::new(53, 600));
        assert_eq!(wall.damage(40, 650, false, &mut rng()), None);
    }

    #[test]
    fn test_four_normal_hits_destroy_section() {
        let mut wall = Wall::new(IVec2::new(53, 600));
        let mut rng = rng();
        for _ in 0..4 {
            wall.damage(60, 610, false, &mut rng);
        }
        let section = wall.section(SectionId::TopLeft);
        assert_eq!(section.tier, 0);
        assert!(section.blocks.is_empty());
    }

    #[test]
    fn test_has_hit_wall_first_block() {
        let mut walls = build_walls();
        let target = walls[1].section(SectionId::BottomMiddle).blocks[3].pos;
        let bullet = Bullet::from_player(target, BulletKind::Normal);
        let hit = has_hit_wall(&mut walls, &bullet, &mut rng()).expect("bullet on a block");
        assert_eq!(hit.wall, 1);
        assert_eq!(hit.section, Some(SectionId::BottomMiddle));
        assert_eq!(walls[1].section(SectionId::BottomMiddle).tier, 3);
    }

    #[test]
    fn test_has_hit_wall_forward_tolerance() {
        let wall = Wall::new(IVec2::new(53, 600));
        let block = wall.section(SectionId::BottomMiddle).blocks[0];
        // Five pixels left of the block only counts via the forward offset
        assert!(block.is_hit_by(block.pos - IVec2::new(5, 0)));
        assert!(!block.is_hit_by(block.pos + IVec2::new(3, 0)));
        assert!(!block.is_hit_by(block.pos + IVec2::new(0, 3)));
    }

    #[test]
    fn test_miss_between_walls() {
        let mut walls = build_walls();
        let bullet = Bullet::from_player(IVec2::new(220, 640), BulletKind::Normal);
        assert!(has_hit_wall(&mut walls, &bullet, &mut rng()).is_none());
        assert!(walls.iter().all(|w| w.block_count() == 230));
    }

    proptest! {
        #[test]
        fn prop_tier_monotonic_and_matches_blocks(
            seed in any::<u64>(),
            hits in proptest::collection::vec((0i32..105, 0i32..105, prop::bool::weighted(0.1)), 1..40),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut wall = Wall::new(IVec2::new(53, 600));
            let mut tiers: Vec<u8> = wall.sections().iter().map(|s| s.tier).collect();

            for (dx, dy, bomb) in hits {
                wall.damage(53 + dx, 600 + dy, bomb, &mut rng);
                for (section, before) in wall.sections().iter().zip(tiers.iter_mut()) {
                    prop_assert!(section.tier <= *before);
                    prop_assert_eq!(section.tier == 0, section.blocks.is_empty());
                    *before = section.tier;
                }
            }
        }
    }
}
