//! Alien formation controller
//!
//! The formation is a list of rows, each an ordered list of aliens. Rows are
//! dropped as soon as their last alien dies, so a row index is only stable
//! until the next kill.

use glam::IVec2;
use rand::Rng;

use super::cadence::Cadence;
use super::state::{Alien, Bullet, GameEvent, Player};
use super::wall::{self, Wall};
use crate::consts::*;
use crate::secs_to_ticks;

pub const FORMATION_ROWS: usize = 5;
pub const FORMATION_COLUMNS: i32 = 10;
/// Horizontal step per move
pub const ALIEN_STEP: i32 = 40;
/// Extra vertical step on a boundary reversal
pub const ALIEN_DROP: i32 = 20;
/// An alien at or beyond this distance from either side is out of bounds
pub const SIDE_MARGIN: i32 = 40;
/// Aliens this low (or lower) have reached the players
pub const BASELINE_Y: i32 = FIELD_HEIGHT - 250;
/// Bomb blast half-extent on both axes (exclusive)
pub const BOMB_RADIUS: i32 = 50;

pub const MOVE_PERIOD: u64 = secs_to_ticks(1);
pub const FIRE_PERIOD: u64 = secs_to_ticks(2);

/// (tier, y) of each row in a fresh formation
const ROW_LAYOUT: [(u8, i32); FORMATION_ROWS] = [(0, 100), (1, 140), (1, 180), (2, 220), (2, 260)];

#[derive(Debug, Clone)]
pub struct Formation {
    rows: Vec<Vec<Alien>>,
    /// Alien bullets in flight, oldest first
    pub bullets: Vec<Bullet>,
    move_cadence: Cadence,
    fire_cadence: Cadence,
    /// Pitch of the next step cue
    high_pitch: bool,
}

fn starting_rows() -> Vec<Vec<Alien>> {
    ROW_LAYOUT
        .iter()
        .map(|&(tier, y)| {
            (0..FORMATION_COLUMNS)
                .map(|col| Alien::new(tier, IVec2::new(50 + ALIEN_STEP * col, y), ALIEN_STEP))
                .collect()
        })
        .collect()
}

impl Formation {
    /// Full starting formation; first move one period after `now`
    pub fn new(now: u64) -> Self {
        Self::with_rows(starting_rows(), now)
    }

    /// Formation from an explicit row layout
    pub fn with_rows(rows: Vec<Vec<Alien>>, now: u64) -> Self {
        let mut formation = Self {
            rows,
            bullets: Vec::new(),
            move_cadence: Cadence::new(MOVE_PERIOD, now),
            fire_cadence: Cadence::new(FIRE_PERIOD, now),
            high_pitch: false,
        };
        formation.prune_rows();
        formation
    }

    pub fn rows(&self) -> &[Vec<Alien>] {
        &self.rows
    }

    pub fn aliens(&self) -> impl Iterator<Item = &Alien> {
        self.rows.iter().flatten()
    }

    pub fn alien_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Advance one tick: bullets every tick, movement and fire on their cadences
    pub fn advance(&mut self, now: u64, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        if self.is_empty() {
            log::info!("Formation cleared, rebuilding");
            self.rows = starting_rows();
            self.resync(now);
            events.push(GameEvent::FormationRebuilt);
        }

        self.bullets.retain(|b| !b.has_left_field());
        for bullet in &mut self.bullets {
            bullet.advance();
        }

        if self.move_cadence.fire(now) {
            self.step();
            events.push(GameEvent::FormationStep {
                high_pitch: self.high_pitch,
            });
            self.high_pitch = !self.high_pitch;
        }

        if self.fire_cadence.fire(now) {
            self.fire(rng, events);
        }

        self.prune_rows();
    }

    /// One cadence step. If any alien's next position is out of bounds the
    /// whole formation reverses and drops instead; x is unchanged that tick.
    fn step(&mut self) {
        let out_of_bounds = self.aliens().any(|a| {
            let next_x = a.pos.x + a.speed;
            next_x <= SIDE_MARGIN || next_x >= FIELD_WIDTH - SIDE_MARGIN
        });

        for alien in self.rows.iter_mut().flatten() {
            if out_of_bounds {
                alien.speed = -alien.speed;
                alien.pos.y += ALIEN_DROP;
            } else {
                alien.pos.x += alien.speed;
            }
            alien.alt_pose = !alien.alt_pose;
        }
    }

    /// Uniform row, then uniform alien within that row
    fn fire(&mut self, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        if self.rows.is_empty() {
            return;
        }
        let row = &self.rows[rng.random_range(0..self.rows.len())];
        let shooter = &row[rng.random_range(0..row.len())];
        let muzzle = shooter.pos + IVec2::new(0, shooter.half_extent());
        self.bullets.push(Bullet::from_alien(muzzle));
        events.push(GameEvent::AlienFired { at: muzzle });
    }

    fn prune_rows(&mut self) {
        self.rows.retain(|row| !row.is_empty());
    }

    /// Restart both cadences from `now` so the tempo doesn't catch up after a pause
    pub fn resync(&mut self, now: u64) {
        self.move_cadence.resync(now);
        self.fire_cadence.resync(now);
    }

    /// True when the lowest alien has reached the players' baseline.
    /// An empty formation never has.
    pub fn closest_alien_crossed_baseline(&self) -> bool {
        self.aliens()
            .map(|a| a.pos.y)
            .max()
            .is_some_and(|y| y >= BASELINE_Y)
    }

    /// Test a player bullet against every alien in row-major order. The first
    /// alien whose box contains the bullet's top edge dies; a bomb also takes
    /// out every alien within the blast radius of that alien. Returns true on
    /// a hit, in which case the caller discards the bullet.
    pub fn check_bullet_hits_alien(
        &mut self,
        player: &mut Player,
        bullet: &Bullet,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let top = bullet.top();
        let hit = self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|a| {
                    let half = a.half_extent();
                    (bullet.pos.x - a.pos.x).abs() <= half
                        && top >= a.pos.y - half
                        && top <= a.pos.y + half
                })
                .map(|c| (r, c))
        });
        let Some((r, c)) = hit else {
            return false;
        };

        if bullet.is_bomb() {
            let centre = self.rows[r][c].pos;
            let mut kills = 0;
            for row in &mut self.rows {
                row.retain(|alien| {
                    let d = alien.pos - centre;
                    let caught = d.x.abs() < BOMB_RADIUS && d.y.abs() < BOMB_RADIUS;
                    if caught {
                        kills += 1;
                        award_kill(player, alien, true, events);
                    }
                    !caught
                });
            }
            log::debug!("Bomb at {:?} destroyed {} aliens", centre, kills);
            events.push(GameEvent::BombDetonated {
                player: player.index,
                at: centre,
                kills,
            });
        } else {
            let alien = self.rows[r].remove(c);
            award_kill(player, &alien, false, events);
        }

        self.prune_rows();
        true
    }

    /// Resolve alien bullets against walls and one player.
    ///
    /// A bullet touching a wall block is consumed there. Otherwise a bullet
    /// overlapping the player costs a life, starts the respawn delay and
    /// resyncs the formation's cadences. Returns true if the player was hit.
    pub fn player_hit(
        &mut self,
        player: &mut Player,
        walls: &mut [Wall],
        now: u64,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let mut hit = false;
        let mut i = 0;
        while i < self.bullets.len() {
            if let Some(wall_hit) = wall::has_hit_wall(walls, &self.bullets[i], rng) {
                events.push(GameEvent::WallHit {
                    wall: wall_hit.wall,
                    section: wall_hit.section,
                });
                self.bullets.remove(i);
                continue;
            }

            if !hit && !player.dead && player.has_been_hit(&self.bullets[i]) {
                self.bullets.remove(i);
                player.lose_life();
                log::info!("Player {} hit, {} lives left", player.index + 1, player.lives);
                events.push(GameEvent::PlayerHit {
                    player: player.index,
                    lives_left: player.lives,
                });
                player.reset(now);
                self.resync(now);
                hit = true;
                continue;
            }

            i += 1;
        }
        hit
    }
}

fn award_kill(player: &mut Player, alien: &Alien, by_bomb: bool, events: &mut Vec<GameEvent>) {
    let score = alien.kill_score();
    player.add_score(score);
    events.push(GameEvent::AlienKilled {
        player: player.index,
        tier: alien.tier,
        score,
        by_bomb,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BulletKind, PLAYER_Y};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(3)
    }

    fn bullet_at(x: i32, y: i32, kind: BulletKind) -> Bullet {
        Bullet::from_player(IVec2::new(x, y), kind)
    }

    #[test]
    fn test_starting_layout() {
        let formation = Formation::new(0);
        assert_eq!(formation.rows().len(), 5);
        assert_eq!(formation.alien_count(), 50);
        let first = &formation.rows()[0][0];
        assert_eq!((first.tier, first.pos), (0, IVec2::new(50, 100)));
        let last = &formation.rows()[4][9];
        assert_eq!((last.tier, last.pos), (2, IVec2::new(410, 260)));
    }

    #[test]
    fn test_moves_on_cadence_only() {
        let mut formation = Formation::new(0);
        let mut events = Vec::new();
        for t in 1..MOVE_PERIOD {
            formation.advance(t, &mut rng(), &mut events);
        }
        assert_eq!(formation.rows()[0][0].pos.x, 50);
        formation.advance(MOVE_PERIOD, &mut rng(), &mut events);
        assert_eq!(formation.rows()[0][0].pos.x, 90);
        assert!(formation.rows()[0][0].alt_pose);
        assert_eq!(
            events,
            vec![GameEvent::FormationStep { high_pitch: false }]
        );
    }

    #[test]
    fn test_step_cue_alternates_pitch() {
        let mut formation = Formation::new(0);
        let mut events = Vec::new();
        for t in 1..=MOVE_PERIOD * 3 {
            formation.advance(t, &mut rng(), &mut events);
        }
        let pitches: Vec<bool> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::FormationStep { high_pitch } => Some(*high_pitch),
                _ => None,
            })
            .collect();
        assert_eq!(pitches, vec![false, true, false]);
    }

    #[test]
    fn test_reverses_and_drops_at_edge() {
        let rows = vec![vec![Alien::new(0, IVec2::new(730, 100), ALIEN_STEP)]];
        let mut formation = Formation::with_rows(rows, 0);
        formation.step();
        let alien = &formation.rows()[0][0];
        assert_eq!(alien.pos, IVec2::new(730, 120));
        assert_eq!(alien.speed, -ALIEN_STEP);
        assert!(alien.alt_pose);

        // Next step heads back left at the usual stride
        formation.step();
        let alien = &formation.rows()[0][0];
        assert_eq!(alien.pos, IVec2::new(690, 120));
        assert!(!alien.alt_pose);
    }

    #[test]
    fn test_full_formation_first_reversal_is_pure_drop() {
        let mut formation = Formation::new(0);
        let mut events = Vec::new();
        let mut rng = rng();
        let rightmost = |f: &Formation| f.aliens().map(|a| a.pos).max_by_key(|p| p.x);

        let mut t = 0;
        let before = loop {
            let before = rightmost(&formation);
            t += 1;
            formation.advance(t, &mut rng, &mut events);
            if rightmost(&formation).map(|p| p.y) != before.map(|p| p.y) {
                break before;
            }
        };
        let after = rightmost(&formation);
        assert_eq!(before.map(|p| p.x), Some(730));
        assert_eq!(after, before.map(|p| p + IVec2::new(0, ALIEN_DROP)));
    }

    #[test]
    fn test_shooter_weighting_row_then_alien() {
        let lone = vec![Alien::new(0, IVec2::new(100, 100), ALIEN_STEP)];
        let crowded: Vec<Alien> = (0..9)
            .map(|i| Alien::new(1, IVec2::new(200 + i * ALIEN_STEP, 300), ALIEN_STEP))
            .collect();
        let mut formation = Formation::with_rows(vec![lone, crowded], 0);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut events = Vec::new();
        for _ in 0..1000 {
            formation.fire(&mut rng, &mut events);
        }

        let from_lone = events
            .iter()
            .filter(|e| matches!(e, GameEvent::AlienFired { at } if at.y < 200))
            .count();
        // Rows are picked evenly; a flat pick over aliens would give ~100
        assert!((420..=580).contains(&from_lone), "lone alien fired {}", from_lone);
    }

    #[test]
    fn test_fires_every_two_seconds() {
        let mut formation = Formation::new(0);
        let mut events = Vec::new();
        let mut rng = rng();
        for t in 1..=FIRE_PERIOD * 2 {
            formation.advance(t, &mut rng, &mut events);
        }
        let shots = events
            .iter()
            .filter(|e| matches!(e, GameEvent::AlienFired { .. }))
            .count();
        assert_eq!(shots, 2);
        // The first shot has long since left the field
        assert_eq!(formation.bullets.len(), 1);
    }

    #[test]
    fn test_alien_bullets_leave_field() {
        let mut formation = Formation::with_rows(Vec::new(), 0);
        formation.bullets.push(Bullet::from_alien(IVec2::new(100, FIELD_HEIGHT - 60)));
        let mut events = Vec::new();
        formation.advance(1, &mut rng(), &mut events);
        formation.advance(2, &mut rng(), &mut events);
        assert!(formation.bullets.is_empty());
    }

    #[test]
    fn test_normal_bullet_kills_one() {
        let mut formation = Formation::new(0);
        let mut player = Player::new(0, 375);
        let mut events = Vec::new();
        // Bottom-left alien sits at (50, 260); the bullet's top edge is inside its box
        let bullet = bullet_at(50, 270, BulletKind::Normal);
        assert!(formation.check_bullet_hits_alien(&mut player, &bullet, &mut events));
        assert_eq!(formation.alien_count(), 49);
        assert_eq!(player.score, 10);
        assert_eq!(formation.rows()[4].len(), 9);
        assert_eq!(formation.rows()[3].len(), 10);
    }

    #[test]
    fn test_row_major_first_match() {
        let mut formation = Formation::new(0);
        let mut player = Player::new(0, 375);
        let mut events = Vec::new();
        let bullet = bullet_at(50, 107, BulletKind::Normal);
        assert!(formation.check_bullet_hits_alien(&mut player, &bullet, &mut events));
        assert_eq!(player.score, 30);
        assert_eq!(formation.rows()[0].len(), 9);
        assert_eq!(
            events,
            vec![GameEvent::AlienKilled {
                player: 0,
                tier: 0,
                score: 30,
                by_bomb: false
            }]
        );
    }

    #[test]
    fn test_bomb_sums_scores() {
        let rows = vec![
            vec![
                Alien::new(1, IVec2::new(200, 180), ALIEN_STEP),
                Alien::new(1, IVec2::new(240, 180), ALIEN_STEP),
                Alien::new(1, IVec2::new(400, 180), ALIEN_STEP),
            ],
            vec![Alien::new(2, IVec2::new(200, 220), ALIEN_STEP)],
        ];
        let mut formation = Formation::with_rows(rows, 0);
        let mut player = Player::new(0, 375);
        let mut events = Vec::new();
        let bullet = bullet_at(200, 235, BulletKind::Bomb);
        assert!(formation.check_bullet_hits_alien(&mut player, &bullet, &mut events));
        assert_eq!(player.score, 10 + 20 + 20);
        assert_eq!(formation.alien_count(), 1);
        assert_eq!(formation.rows().len(), 1);
        assert!(events.contains(&GameEvent::BombDetonated {
            player: 0,
            at: IVec2::new(200, 220),
            kills: 3
        }));
    }

    #[test]
    fn test_miss_returns_false() {
        let mut formation = Formation::new(0);
        let mut player = Player::new(0, 375);
        let mut events = Vec::new();
        let bullet = bullet_at(700, 400, BulletKind::Normal);
        assert!(!formation.check_bullet_hits_alien(&mut player, &bullet, &mut events));
        assert_eq!(formation.alien_count(), 50);
        assert!(events.is_empty());
    }

    #[test]
    fn test_baseline_query() {
        assert!(!Formation::with_rows(Vec::new(), 0).closest_alien_crossed_baseline());
        assert!(!Formation::new(0).closest_alien_crossed_baseline());
        let rows = vec![vec![Alien::new(2, IVec2::new(300, BASELINE_Y), ALIEN_STEP)]];
        assert!(Formation::with_rows(rows, 0).closest_alien_crossed_baseline());
    }

    #[test]
    fn test_rebuilds_when_cleared() {
        let mut formation = Formation::with_rows(vec![Vec::new(), Vec::new()], 0);
        assert!(formation.is_empty());
        let mut events = Vec::new();
        formation.advance(1, &mut rng(), &mut events);
        assert_eq!(formation.alien_count(), 50);
        assert_eq!(events, vec![GameEvent::FormationRebuilt]);
    }

    #[test]
    fn test_player_hit_costs_life_and_resyncs() {
        let mut formation = Formation::with_rows(Vec::new(), 0);
        let mut player = Player::new(0, 375);
        let mut walls: Vec<Wall> = Vec::new();
        let mut events = Vec::new();
        formation.bullets.push(Bullet::from_alien(IVec2::new(400, PLAYER_Y + 10)));

        assert!(formation.player_hit(&mut player, &mut walls, 500, &mut rng(), &mut events));
        assert_eq!(player.lives, 2);
        assert!(formation.bullets.is_empty());
        assert_eq!(player.control_resumes_at, Some(500 + secs_to_ticks(2)));
        assert_eq!(formation.move_cadence.next_due, 500 + MOVE_PERIOD);
        assert_eq!(formation.fire_cadence.next_due, 500 + FIRE_PERIOD);
    }

    #[test]
    fn test_wall_absorbs_alien_bullet() {
        let mut formation = Formation::with_rows(Vec::new(), 0);
        let mut player = Player::new(0, 375);
        let mut walls = wall::build_walls();
        let target = walls[0].blocks().next().map(|b| b.pos).unwrap_or_default();
        let mut events = Vec::new();
        formation.bullets.push(Bullet::from_alien(target));

        assert!(!formation.player_hit(&mut player, &mut walls, 10, &mut rng(), &mut events));
        assert!(formation.bullets.is_empty());
        assert_eq!(player.lives, 3);
        assert!(matches!(events[0], GameEvent::WallHit { wall: 0, .. }));
    }

    proptest! {
        #[test]
        fn prop_advance_stays_in_bounds(seed in any::<u64>(), ticks in 1u64..3000) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut formation = Formation::new(0);
            let mut events = Vec::new();
            for t in 1..=ticks {
                formation.advance(t, &mut rng, &mut events);
                for alien in formation.aliens() {
                    prop_assert!(alien.pos.x > SIDE_MARGIN);
                    prop_assert!(alien.pos.x < FIELD_WIDTH - SIDE_MARGIN);
                }
            }
        }

        #[test]
        fn prop_bomb_radius_exact(col in 0usize..10, row in 0usize..5) {
            let mut formation = Formation::new(0);
            let centre = formation.rows()[row][col].pos;
            let expected: Vec<IVec2> = formation
                .aliens()
                .map(|a| a.pos)
                .filter(|p| (p.x - centre.x).abs() >= BOMB_RADIUS || (p.y - centre.y).abs() >= BOMB_RADIUS)
                .collect();

            let mut player = Player::new(0, 375);
            let mut events = Vec::new();
            // Top edge on the target's centre; the row above is 40px higher, out of reach
            let bullet = Bullet::from_player(centre + IVec2::new(0, 7), BulletKind::Bomb);
            prop_assert!(formation.check_bullet_hits_alien(&mut player, &bullet, &mut events));

            let survivors: Vec<IVec2> = formation.aliens().map(|a| a.pos).collect();
            prop_assert_eq!(survivors, expected);
        }
    }
}
