//! Power-up economy
//!
//! At most one power-up is on the field, shared by every player. A spawn is
//! earned when a score reaches the threshold; each spawn moves the threshold
//! to double the score that earned it.

use rand::Rng;

use super::state::{GameEvent, Player, PowerUp, PowerUpKind, PLAYER_WIDTH};
use crate::consts::*;

/// Score that earns the first power-up of a round
pub const FIRST_THRESHOLD: u32 = 90;

#[derive(Debug, Clone, Default)]
pub struct PowerUpEconomy {
    current: Option<PowerUp>,
    /// Score that triggered the most recent spawn
    last_trigger_score: Option<u32>,
}

impl PowerUpEconomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&PowerUp> {
        self.current.as_ref()
    }

    /// Lowest score that earns the next spawn
    pub fn next_threshold(&self) -> u32 {
        match self.last_trigger_score {
            None => FIRST_THRESHOLD,
            Some(score) => score.saturating_mul(2).saturating_add(1),
        }
    }

    fn earns_spawn(&self, score: u32) -> bool {
        score >= self.next_threshold()
    }

    /// Spawn check, pulse animation and pickup, once per tick
    pub fn update(&mut self, players: &mut [Player], rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        if let Some(score) = players.iter().map(|p| p.score).find(|&s| self.earns_spawn(s)) {
            let x = rng.random_range(10..FIELD_WIDTH - 40);
            let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
            log::info!("Power-up {:?} spawned at x={} (score {})", kind, x, score);
            self.current = Some(PowerUp::new(x, kind));
            self.last_trigger_score = Some(score);
            events.push(GameEvent::PowerUpSpawned { kind, x });
        }

        let Some(power_up) = self.current.as_mut() else {
            return;
        };
        power_up.pulse();

        let x = power_up.pos.x;
        if let Some(player) = players
            .iter_mut()
            .find(|p| !p.dead && x >= p.pos.x && x <= p.pos.x + PLAYER_WIDTH)
        {
            let kind = power_up.kind;
            player.pick_up(kind);
            log::debug!("Player {} collected {:?}", player.index + 1, kind);
            events.push(GameEvent::PowerUpCollected {
                player: player.index,
                kind,
            });
            self.current = None;
        }
    }
}
