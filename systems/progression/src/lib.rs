#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level promotion.
//!
//! Levels are tracked per player, but the board configuration they unlock
//! (obstacles and tick cadence) is shared by everyone: whoever is promoted
//! last decides the board.

use log::info;
use neon_snake_core::{CommandError, Event, GameState, PlayerId};

/// Promotes the player by exactly one level when their score reaches the
/// requirement of the next catalog level, and reconfigures the shared board
/// from that level. Returns whether a promotion happened.
///
/// A score that already qualifies for several levels still advances a single
/// level per call.
///
/// # Errors
///
/// Returns [`CommandError::UnknownPlayer`] when nobody carries `id`.
pub fn check_level_up(
    state: &mut GameState,
    id: PlayerId,
    out: &mut Vec<Event>,
) -> Result<bool, CommandError> {
    let player = state.player(id).ok_or(CommandError::UnknownPlayer(id))?;
    let Some(next) = state.level(player.level.saturating_add(1)) else {
        return Ok(false);
    };
    if player.score < next.required_score {
        return Ok(false);
    }

    let level = next.number;
    let speed = next.speed_multiplier;
    let obstacles = next.obstacles.clone();

    if let Some(player) = state.player_mut(id) {
        player.level = level;
    }
    state.current_level = level;
    state.game_speed = speed;
    let obstacle_count = obstacles.len();
    state.obstacles = obstacles;

    info!("{id} reached level {level}, board speed now {speed}");
    out.push(Event::LevelAdvanced { player: id, level });
    out.push(Event::BoardLevelChanged {
        level,
        speed,
        obstacles: obstacle_count,
    });
    Ok(true)
}
