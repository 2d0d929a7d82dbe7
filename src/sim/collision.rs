//! Bullet resolution
//!
//! Every player bullet is checked once per tick in a fixed order: field edge,
//! aliens, walls, mother ship. The first check that reports a hit consumes the
//! bullet; bullets that survive all four move on.

use rand::Rng;

use super::formation::Formation;
use super::mothership::MotherShipController;
use super::state::{Bullet, GameEvent, Player};
use super::wall::{self, Wall};

/// What stopped a player bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    FieldEdge,
    Alien,
    Wall,
    MotherShip,
}

/// First target in check order that claims the bullet, if any
fn resolve_bullet(
    player: &mut Player,
    bullet: &Bullet,
    formation: &mut Formation,
    walls: &mut [Wall],
    mothership: &mut MotherShipController,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) -> Option<HitTarget> {
    if bullet.has_left_field() {
        return Some(HitTarget::FieldEdge);
    }
    if formation.check_bullet_hits_alien(player, bullet, events) {
        return Some(HitTarget::Alien);
    }
    if let Some(hit) = wall::has_hit_wall(walls, bullet, rng) {
        events.push(GameEvent::WallHit {
            wall: hit.wall,
            section: hit.section,
        });
        return Some(HitTarget::Wall);
    }
    if mothership.has_been_hit(player, bullet, rng, events) {
        return Some(HitTarget::MotherShip);
    }
    None
}

/// Resolve and advance every bullet the player has in flight.
///
/// Returns the targets that consumed bullets this tick, single shot first and
/// then the volley in firing order.
pub fn resolve_player_bullets(
    player: &mut Player,
    formation: &mut Formation,
    walls: &mut [Wall],
    mothership: &mut MotherShipController,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) -> Vec<HitTarget> {
    let mut hits = Vec::new();

    if let Some(mut bullet) = player.shot.take() {
        match resolve_bullet(player, &bullet, formation, walls, mothership, rng, events) {
            Some(target) => hits.push(target),
            None => {
                bullet.advance();
                player.shot = Some(bullet);
            }
        }
    }

    let volley = std::mem::take(&mut player.volley);
    for mut bullet in volley {
        match resolve_bullet(player, &bullet, formation, walls, mothership, rng, events) {
            Some(target) => hits.push(target),
            None => {
                bullet.advance();
                player.volley.push(bullet);
            }
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Alien, BulletKind, SplitState};
    use crate::sim::wall::{SectionId, build_walls};
    use glam::IVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct World {
        player: Player,
        formation: Formation,
        walls: Vec<Wall>,
        mothership: MotherShipController,
        rng: Pcg32,
        events: Vec<GameEvent>,
    }

    impl World {
        fn new(formation: Formation) -> Self {
            Self {
                player: Player::new(0, 375),
                formation,
                walls: build_walls(),
                mothership: MotherShipController::new(0),
                rng: Pcg32::seed_from_u64(17),
                events: Vec::new(),
            }
        }

        fn resolve(&mut self) -> Vec<HitTarget> {
            resolve_player_bullets(
                &mut self.player,
                &mut self.formation,
                &mut self.walls,
                &mut self.mothership,
                &mut self.rng,
                &mut self.events,
            )
        }
    }

    #[test]
    fn test_bullet_advances_when_clear() {
        let mut world = World::new(Formation::with_rows(Vec::new(), 0));
        world.player.shot = Some(Bullet::from_player(IVec2::new(220, 400), BulletKind::Normal));
        assert!(world.resolve().is_empty());
        assert_eq!(world.player.shot.as_ref().map(|b| b.pos.y), Some(389));
    }

    #[test]
    fn test_field_edge_consumes() {
        let mut world = World::new(Formation::new(0));
        world.player.shot = Some(Bullet::from_player(IVec2::new(50, 4), BulletKind::Normal));
        assert_eq!(world.resolve(), vec![HitTarget::FieldEdge]);
        assert!(world.player.shot.is_none());
    }

    #[test]
    fn test_alien_checked_before_wall() {
        // An alien sitting on a wall block: the alien takes the bullet
        let walls = build_walls();
        let block = walls[0].section(SectionId::TopMiddle).blocks[10].pos;
        let formation = Formation::with_rows(vec![vec![Alien::new(1, block, 40)]], 0);
        let mut world = World::new(formation);
        world.walls = walls;
        world.player.shot = Some(Bullet::from_player(block, BulletKind::Normal));

        assert_eq!(world.resolve(), vec![HitTarget::Alien]);
        assert_eq!(world.player.score, 20);
        assert_eq!(world.walls[0].block_count(), 230);
    }

    #[test]
    fn test_wall_consumes_player_bullet() {
        let mut world = World::new(Formation::with_rows(Vec::new(), 0));
        let block = world.walls[2].section(SectionId::BottomRight).blocks[20].pos;
        world.player.shot = Some(Bullet::from_player(block, BulletKind::Normal));
        assert_eq!(world.resolve(), vec![HitTarget::Wall]);
        assert!(world.walls[2].block_count() < 230);
    }

    #[test]
    fn test_volley_resolved_in_order() {
        let mut world = World::new(Formation::new(0));
        let muzzle = IVec2::new(90, 130);
        world.player.volley = [SplitState::SplitLeft, SplitState::SplitCenter, SplitState::SplitRight]
            .map(|s| Bullet::from_player(muzzle, BulletKind::Normal).with_split(s))
            .to_vec();
        world.player.volley[0].pos.x = 700;
        world.player.volley[2].pos.y = 3;

        let hits = world.resolve();
        assert_eq!(hits, vec![HitTarget::Alien, HitTarget::FieldEdge]);
        assert_eq!(world.player.volley.len(), 1);
        assert_eq!(world.player.volley[0].split, SplitState::SplitLeft);
    }
}
