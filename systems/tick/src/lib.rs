#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick simulation step.
//!
//! Every live player is resolved against the same start-of-tick snapshot, so
//! roster order never decides who sees which fruit. Resolved moves are then
//! applied to a copy of the snapshot, consumed fruits are replaced,
//! eliminations are recorded together and scorers are checked for promotion. The copy
//! is only handed back when every step succeeded.
//!
//! Obstacles, power-ups and weather are carried in state but have no effect
//! on movement, and heads may overlap any snake body without consequence.

use std::collections::HashSet;

use log::debug;
use neon_snake_core::{
    CommandError, Event, Fruit, GameState, GameStatus, Player, PlayerId, Position,
};
use neon_snake_system_lifecycle as lifecycle;
use neon_snake_system_progression as progression;
use neon_snake_system_spawning::FruitSpawner;

/// Advances the whole board one discrete step at a time.
#[derive(Clone, Debug)]
pub struct TickEngine {
    spawner: FruitSpawner,
}

impl TickEngine {
    /// Creates an engine that replaces eaten fruits with `spawner`.
    #[must_use]
    pub fn new(spawner: FruitSpawner) -> Self {
        Self { spawner }
    }

    /// Computes the snapshot that follows `start`.
    ///
    /// Events are only appended to `out` when the step succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::GameNotRunning`] unless the match is playing,
    /// and [`CommandError::BoardFull`] when an eaten fruit cannot be
    /// replaced. The engine's random stream is left untouched on failure.
    pub fn advance(
        &mut self,
        start: &GameState,
        out: &mut Vec<Event>,
    ) -> Result<GameState, CommandError> {
        if start.status != GameStatus::Playing {
            return Err(CommandError::GameNotRunning(start.status));
        }

        let resolutions: Vec<(usize, Outcome)> = start
            .players
            .iter()
            .enumerate()
            .filter(|(_, player)| player.alive)
            .filter_map(|(index, player)| resolve(start, player).map(|outcome| (index, outcome)))
            .collect();

        let mut next = start.clone();
        let mut events = Vec::new();
        let mut consumed: Vec<usize> = Vec::new();
        let mut scorers: Vec<PlayerId> = Vec::new();
        let mut poisoned: Vec<PlayerId> = Vec::new();

        for (index, outcome) in resolutions {
            let player = &mut next.players[index];
            match outcome {
                Outcome::Moved(snake) => player.snake = snake,
                Outcome::Grew { snake, fruit_index } => {
                    let fruit = start.fruits[fruit_index];
                    player.snake = snake;
                    player.score = player.score.saturating_add(fruit.points);
                    player.color = fruit.kind.color();
                    events.push(Event::FruitEaten {
                        player: player.id,
                        fruit: fruit.kind,
                        position: fruit.position,
                        score: player.score,
                    });
                    scorers.push(player.id);
                    if !consumed.contains(&fruit_index) {
                        consumed.push(fruit_index);
                    }
                }
                Outcome::Poisoned => poisoned.push(player.id),
            }
        }

        let mut spawner = self.spawner.clone();
        replace_consumed(start, &mut next, &consumed, &mut spawner, &mut events)?;

        if !poisoned.is_empty() {
            lifecycle::eliminate_all(&mut next, &poisoned, &mut events)?;
        }
        for id in scorers {
            let _ = progression::check_level_up(&mut next, id, &mut events)?;
        }

        next.tick = start.tick.saturating_add(1);
        events.push(Event::TimeAdvanced { tick: next.tick });
        debug!(
            "tick {}: {} alive, {} fruit(s) eaten",
            next.tick,
            next.alive_count(),
            consumed.len()
        );

        self.spawner = spawner;
        out.extend(events);
        Ok(next)
    }
}

/// What a single player's move amounts to against the start-of-tick snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Outcome {
    /// Plain translation; length unchanged.
    Moved(Vec<Position>),
    /// The assigned fruit was eaten; the full old body is kept.
    Grew {
        snake: Vec<Position>,
        fruit_index: usize,
    },
    /// Someone else's fruit was eaten; the move is discarded.
    Poisoned,
}

fn resolve(start: &GameState, player: &Player) -> Option<Outcome> {
    let head = start.grid.step(player.head()?, player.direction);
    let Some(fruit_index) = start.fruits.iter().position(|fruit| fruit.position == head) else {
        let mut snake = Vec::with_capacity(player.snake.len());
        snake.push(head);
        snake.extend_from_slice(&player.snake[..player.snake.len() - 1]);
        return Some(Outcome::Moved(snake));
    };

    if start.fruits[fruit_index].kind != player.assigned_fruit {
        return Some(Outcome::Poisoned);
    }

    let mut snake = Vec::with_capacity(player.snake.len() + 1);
    snake.push(head);
    snake.extend_from_slice(&player.snake);
    Some(Outcome::Grew { snake, fruit_index })
}

fn replace_consumed(
    start: &GameState,
    next: &mut GameState,
    consumed: &[usize],
    spawner: &mut FruitSpawner,
    events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    if consumed.is_empty() {
        return Ok(());
    }

    let mut exclude: HashSet<Position> = start.occupied_cells();
    exclude.extend(next.occupied_cells());

    for &index in consumed {
        let kind = next.fruits[index].kind;
        let position = spawner.place_fruit(next.grid, &exclude)?;
        let _ = exclude.insert(position);
        next.fruits[index] = Fruit::new(kind, position);
        events.push(Event::FruitSpawned {
            fruit: kind,
            position,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_snake_core::{Direction, FruitType, GridGeometry, PlayerSeed};

    fn lone_player(snake: Vec<Position>, direction: Direction) -> GameState {
        let mut state = GameState::new(GridGeometry::STANDARD, Vec::new());
        let seed = PlayerSeed::new(PlayerId::new(0), "solo", snake, direction);
        state.players.push(Player::from_seed(seed, FruitType::Apple));
        state
    }

    #[test]
    fn single_segment_snake_translates() {
        let state = lone_player(vec![Position::new(0, 0)], Direction::Up);
        let outcome = resolve(&state, &state.players[0]);
        assert_eq!(outcome, Some(Outcome::Moved(vec![Position::new(0, 29)])));
    }

    #[test]
    fn empty_snake_is_skipped() {
        let mut state = lone_player(vec![Position::new(0, 0)], Direction::Up);
        state.players[0].snake.clear();
        assert_eq!(resolve(&state, &state.players[0]), None);
    }
}
