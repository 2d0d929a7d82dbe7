//! Mother ship controller: idle until the spawn cadence fires, then one ship
//! crosses the field until it is shot down or escapes.

use rand::Rng;

use super::cadence::Cadence;
use super::state::{Bullet, GameEvent, MOTHERSHIP_BONUSES, MotherShip, Player};
use crate::secs_to_ticks;

pub const SPAWN_PERIOD: u64 = secs_to_ticks(30);
/// Ambient cue period while a ship is present (150 ms)
pub const HUM_PERIOD: u64 = 9;

#[derive(Debug, Clone)]
pub struct MotherShipController {
    ship: Option<MotherShip>,
    spawn: Cadence,
    hum: Cadence,
}

impl MotherShipController {
    pub fn new(now: u64) -> Self {
        Self {
            ship: None,
            spawn: Cadence::new(SPAWN_PERIOD, now),
            hum: Cadence::new(HUM_PERIOD, now),
        }
    }

    pub fn ship(&self) -> Option<&MotherShip> {
        self.ship.as_ref()
    }

    pub fn is_traveling(&self) -> bool {
        self.ship.is_some()
    }

    pub fn update(&mut self, now: u64, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        // The spawn clock keeps running while a ship is out; a firing then is skipped
        if self.spawn.fire(now) && self.ship.is_none() {
            let moving_left = rng.random_bool(0.5);
            log::info!("Mother ship spawned (moving_left={})", moving_left);
            self.ship = Some(MotherShip::entering(moving_left));
            self.hum = Cadence::starting_at(HUM_PERIOD, now);
            events.push(GameEvent::MotherShipSpawned { moving_left });
        }

        let Some(ship) = self.ship.as_mut() else {
            return;
        };

        if self.hum.fire(now) {
            events.push(GameEvent::MotherShipHum);
        }

        ship.advance();
        if ship.has_escaped() {
            log::debug!("Mother ship escaped");
            self.ship = None;
            events.push(GameEvent::MotherShipEscaped);
        }
    }

    /// Box test against a player bullet. A hit removes the ship and credits
    /// the player with a bonus drawn at hit time.
    pub fn has_been_hit(
        &mut self,
        player: &mut Player,
        bullet: &Bullet,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let Some(ship) = self.ship.as_ref() else {
            return false;
        };
        let (min, max) = (ship.pos, ship.pos + ship.size());
        let inside = bullet.pos.x >= min.x
            && bullet.pos.x <= max.x
            && bullet.pos.y >= min.y
            && bullet.pos.y <= max.y;
        if !inside {
            return false;
        }

        let bonus = MOTHERSHIP_BONUSES[rng.random_range(0..MOTHERSHIP_BONUSES.len())];
        player.add_score(bonus);
        self.ship = None;
        log::info!("Mother ship hit by player {} for {}", player.index + 1, bonus);
        events.push(GameEvent::MotherShipHit {
            player: player.index,
            bonus,
        });
        true
    }
}
