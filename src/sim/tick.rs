//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically, one tick per
//! rendered frame.

use super::collision::resolve_player_bullets;
use super::player::MOVE_STEP;
use super::state::{GameEvent, GamePhase, GameState};

/// Per-player intents for one tick, decoupled from physical keys
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Player one, player two
    pub players: [PlayerInput; 2],
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot plays player one
    pub idle_mode: bool,
}

/// Autopilot: line up under the lowest alien (nearest one on ties) and fire
fn autopilot(state: &GameState) -> PlayerInput {
    let Some(player) = state.players.first() else {
        return PlayerInput::default();
    };
    let muzzle_x = player.muzzle().x;

    let target = state
        .formation
        .aliens()
        .min_by_key(|a| (std::cmp::Reverse(a.pos.y), (a.pos.x - muzzle_x).abs()));

    match target {
        Some(alien) => {
            let dx = alien.pos.x - muzzle_x;
            PlayerInput {
                left: dx < -2,
                right: dx > 2,
                fire: dx.abs() <= 2 * MOVE_STEP,
            }
        }
        None => PlayerInput::default(),
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at tick {}", state.time_ticks);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed at tick {}", state.time_ticks);
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        input.players[0] = autopilot(state);
    }

    state.time_ticks += 1;
    let now = state.time_ticks;

    // Movement and fire intents
    for (player, intent) in state.players.iter_mut().zip(input.players.iter()) {
        if !player.can_act(now) {
            continue;
        }
        if intent.left && !intent.right {
            player.move_horizontal(true);
        } else if intent.right && !intent.left {
            player.move_horizontal(false);
        }
        if intent.fire {
            let bullets = player.fire();
            if bullets > 0 {
                state.events.push(GameEvent::ShotFired {
                    player: player.index,
                    bullets,
                });
            }
        }
    }

    // Player bullets: edge, aliens, walls, mother ship
    for player in state.players.iter_mut().filter(|p| !p.dead) {
        resolve_player_bullets(
            player,
            &mut state.formation,
            &mut state.walls,
            &mut state.mothership,
            &mut state.rng,
            &mut state.events,
        );
    }

    // Formation reaching the baseline ends the round for everyone still alive
    if state.formation.closest_alien_crossed_baseline() {
        let mut landed = false;
        for player in state.players.iter_mut().filter(|p| !p.dead) {
            player.kill();
            landed = true;
        }
        if landed {
            log::info!("Formation reached the baseline");
            state.events.push(GameEvent::FormationLanded);
        }
    }

    state
        .formation
        .advance(now, &mut state.rng, &mut state.events);

    for player in state.players.iter_mut() {
        state.formation.player_hit(
            player,
            &mut state.walls,
            now,
            &mut state.rng,
            &mut state.events,
        );
    }

    state
        .mothership
        .update(now, &mut state.rng, &mut state.events);

    state
        .powerups
        .update(&mut state.players, &mut state.rng, &mut state.events);

    if state.players.iter().any(|p| p.lives == 0) {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over at tick {} (best score {})",
            now,
            state.best_score()
        );
        state.events.push(GameEvent::GameOver);
    }
}
