#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Roster management: admission, removal and elimination of players.
//!
//! Every seated player holds one fruit identity from the fixed pool, so the
//! pool size caps the roster. Functions mutate a working copy of the state
//! and report rejected requests through [`CommandError`] without touching it.

use log::{debug, info};
use neon_snake_core::{
    CommandError, Event, FruitType, GameState, GameStatus, Player, PlayerId, PlayerSeed,
};

/// First fruit identity, in pool order, that no seated player holds.
#[must_use]
pub fn next_free_fruit(state: &GameState) -> Option<FruitType> {
    FruitType::ALL.into_iter().find(|fruit| {
        state
            .players
            .iter()
            .all(|player| player.assigned_fruit != *fruit)
    })
}

/// Seats a new player and returns the fruit identity it was assigned.
///
/// # Errors
///
/// Rejects duplicate identifiers, bodies that are empty or leave the board,
/// and admissions once the fruit pool is exhausted.
pub fn admit(
    state: &mut GameState,
    seed: PlayerSeed,
    out: &mut Vec<Event>,
) -> Result<FruitType, CommandError> {
    if state.player(seed.id).is_some() {
        return Err(CommandError::DuplicatePlayer(seed.id));
    }
    if seed.snake.is_empty() || !seed.snake.iter().all(|cell| state.grid.contains(*cell)) {
        return Err(CommandError::InvalidSnake(seed.id));
    }
    let Some(fruit) = next_free_fruit(state) else {
        debug!("fruit pool exhausted, {} not seated", seed.id);
        return Err(CommandError::FruitPoolExhausted(FruitType::ALL.len()));
    };

    let player = Player::from_seed(seed, fruit);
    debug!("{} '{}' joined as {fruit}", player.id, player.name);
    out.push(Event::PlayerJoined {
        player: player.id,
        fruit,
    });
    state.players.push(player);
    Ok(fruit)
}

/// Removes a player from the roster. The match status is not recomputed.
///
/// # Errors
///
/// Returns [`CommandError::UnknownPlayer`] when nobody carries `id`.
pub fn remove(state: &mut GameState, id: PlayerId, out: &mut Vec<Event>) -> Result<(), CommandError> {
    let index = state
        .players
        .iter()
        .position(|player| player.id == id)
        .ok_or(CommandError::UnknownPlayer(id))?;
    let removed = state.players.remove(index);
    debug!("{} '{}' left, releasing {}", removed.id, removed.name, removed.assigned_fruit);
    out.push(Event::PlayerRemoved { player: id });
    Ok(())
}

/// Marks a player as eliminated and derives the match status.
///
/// The match ends when exactly one player is still alive afterwards. When none
/// or several remain the status is left as it was.
///
/// # Errors
///
/// Returns [`CommandError::UnknownPlayer`] when nobody carries `id`.
pub fn eliminate(
    state: &mut GameState,
    id: PlayerId,
    out: &mut Vec<Event>,
) -> Result<(), CommandError> {
    eliminate_all(state, &[id], out)
}

/// Eliminates several players at once, deriving the match status a single
/// time from the resulting roster.
///
/// # Errors
///
/// Returns [`CommandError::UnknownPlayer`] for the first id nobody carries;
/// the state is untouched in that case.
pub fn eliminate_all(
    state: &mut GameState,
    ids: &[PlayerId],
    out: &mut Vec<Event>,
) -> Result<(), CommandError> {
    if let Some(missing) = ids.iter().find(|id| state.player(**id).is_none()) {
        return Err(CommandError::UnknownPlayer(*missing));
    }

    for player in state.players.iter_mut() {
        if player.alive && ids.contains(&player.id) {
            player.alive = false;
            info!("{} '{}' eliminated", player.id, player.name);
            out.push(Event::PlayerEliminated { player: player.id });
        }
    }

    if state.alive_count() == 1 && state.status != GameStatus::GameOver {
        state.status = GameStatus::GameOver;
        info!("game over, one player left standing");
        out.push(Event::GameStatusChanged {
            status: GameStatus::GameOver,
        });
    }
    Ok(())
}

/// The last player standing once the match is over.
#[must_use]
pub fn winner(state: &GameState) -> Option<&Player> {
    if state.status != GameStatus::GameOver {
        return None;
    }
    let mut alive = state.players.iter().filter(|player| player.alive);
    match (alive.next(), alive.next()) {
        (Some(player), None) => Some(player),
        _ => None,
    }
}
