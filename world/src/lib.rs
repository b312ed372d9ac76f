#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state store for Neon Snake.
//!
//! The world owns the current [`GameState`] snapshot behind an [`Arc`]. Every
//! command is executed against a private copy which replaces the snapshot only
//! when the command succeeds, so readers holding an older `Arc` never observe a
//! partially applied step.

use std::sync::Arc;

use log::{debug, warn};
use neon_snake_core::{
    default_levels, Command, CommandError, Direction, Event, Fruit, FruitType, GameState,
    GameStatus, GridGeometry, Level, Player, PlayerId, PlayerSeed, Position,
};
use neon_snake_system_lifecycle as lifecycle;
use neon_snake_system_progression as progression;
use neon_snake_system_spawning::{Config as SpawnConfig, FruitSpawner};
use neon_snake_system_tick::TickEngine;

/// Seed used for fruit placement when none is supplied.
pub const DEFAULT_SEED: u64 = 0x6e65_6f6e_5f73_6e6b;

/// Identifier of the player seated at startup.
pub const LOCAL_PLAYER: PlayerId = PlayerId::new(0);

const LOCAL_PLAYER_NAME: &str = "Player 1";

/// Represents the authoritative Neon Snake world.
#[derive(Clone, Debug)]
pub struct World {
    state: Arc<GameState>,
    engine: TickEngine,
}

impl World {
    /// Creates a world in the startup configuration with the default seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a world in the startup configuration whose fruit placement is
    /// driven by `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_state(
            initial_state(default_levels(GridGeometry::STANDARD)),
            SpawnConfig::with_seed(seed),
        )
    }

    /// Wraps an arbitrary snapshot, placing fruits with the supplied spawner
    /// configuration.
    #[must_use]
    pub fn from_state(state: GameState, spawner: SpawnConfig) -> Self {
        Self {
            state: Arc::new(state),
            engine: TickEngine::new(FruitSpawner::new(spawner)),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the startup board: one local player heading right and three fruits
/// on row 15, on a standard grid configured from `levels`.
#[must_use]
pub fn initial_state(levels: Vec<Level>) -> GameState {
    let mut state = GameState::new(GridGeometry::STANDARD, levels);
    let seed = PlayerSeed::new(
        LOCAL_PLAYER,
        LOCAL_PLAYER_NAME,
        vec![
            Position::new(10, 10),
            Position::new(9, 10),
            Position::new(8, 10),
        ],
        Direction::Right,
    );
    state.players.push(Player::from_seed(seed, FruitType::Apple));
    state.fruits = vec![
        Fruit::new(FruitType::Apple, Position::new(15, 15)),
        Fruit::new(FruitType::Banana, Position::new(25, 15)),
        Fruit::new(FruitType::Orange, Position::new(35, 15)),
    ];
    state
}

/// Applies the provided command to the world.
///
/// Events are appended to `out_events` only when the command succeeds.
///
/// # Errors
///
/// Returns the [`CommandError`] describing why the command was rejected. The
/// snapshot is left untouched in every error case, including the fatal
/// [`CommandError::BoardFull`].
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    let mut events = Vec::new();
    match execute(world, command, &mut events) {
        Ok(next) => {
            world.state = Arc::new(next);
            out_events.extend(events);
            Ok(())
        }
        Err(error) => {
            if error.is_fatal() {
                warn!("simulation halted: {error}");
            } else {
                debug!("command rejected: {error}");
            }
            Err(error)
        }
    }
}

/// Computes the snapshot that follows `command` without committing it.
fn execute(
    world: &mut World,
    command: Command,
    out: &mut Vec<Event>,
) -> Result<GameState, CommandError> {
    let current = &world.state;
    match command {
        Command::Tick => world.engine.advance(current, out),
        Command::AddPlayer { seed } => edit(current, |state| {
            lifecycle::admit(state, seed, out).map(|_| ())
        }),
        Command::RemovePlayer { player } => {
            edit(current, |state| lifecycle::remove(state, player, out))
        }
        Command::SetDirection { player, direction } => edit(current, |state| {
            seated(state, player)?.direction = direction;
            out.push(Event::DirectionChanged { player, direction });
            Ok(())
        }),
        Command::SetScore { player, score } => edit(current, |state| {
            seated(state, player)?.score = score;
            out.push(Event::ScoreChanged { player, score });
            Ok(())
        }),
        Command::SetSnake { player, segments } => edit(current, |state| {
            let grid = state.grid;
            let target = seated(state, player)?;
            if segments.is_empty() || !segments.iter().all(|cell| grid.contains(*cell)) {
                return Err(CommandError::InvalidSnake(player));
            }
            let length = segments.len();
            target.snake = segments;
            out.push(Event::SnakeReplaced { player, length });
            Ok(())
        }),
        Command::AddPowerUp { player, power_up } => edit(current, |state| {
            if !seated(state, player)?.power_ups.insert(power_up) {
                return Err(CommandError::PowerUpAlreadyActive { player, power_up });
            }
            out.push(Event::PowerUpActivated { player, power_up });
            Ok(())
        }),
        Command::RemovePowerUp { player, power_up } => edit(current, |state| {
            if !seated(state, player)?.power_ups.remove(&power_up) {
                return Err(CommandError::PowerUpNotActive { player, power_up });
            }
            out.push(Event::PowerUpDeactivated { player, power_up });
            Ok(())
        }),
        Command::SetWeather { weather } => edit(current, |state| {
            state.weather = weather;
            out.push(Event::WeatherChanged { weather });
            Ok(())
        }),
        Command::SetGameSpeed { speed } => edit(current, |state| {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(CommandError::InvalidSpeed(speed));
            }
            state.game_speed = speed;
            out.push(Event::GameSpeedChanged { speed });
            Ok(())
        }),
        Command::CheckLevelUp { player } => edit(current, |state| {
            progression::check_level_up(state, player, out).map(|_| ())
        }),
        Command::Eliminate { player } => {
            edit(current, |state| lifecycle::eliminate(state, player, out))
        }
        Command::Pause => edit(current, |state| {
            if state.status != GameStatus::Playing {
                return Err(CommandError::GameNotRunning(state.status));
            }
            transition(state, GameStatus::Paused, out);
            Ok(())
        }),
        Command::Resume => edit(current, |state| {
            if state.status != GameStatus::Paused {
                return Err(CommandError::NotPaused(state.status));
            }
            transition(state, GameStatus::Playing, out);
            Ok(())
        }),
    }
}

/// Runs `change` against a private copy of `current`.
fn edit(
    current: &GameState,
    change: impl FnOnce(&mut GameState) -> Result<(), CommandError>,
) -> Result<GameState, CommandError> {
    let mut next = current.clone();
    change(&mut next)?;
    Ok(next)
}

fn seated(state: &mut GameState, player: PlayerId) -> Result<&mut Player, CommandError> {
    state
        .player_mut(player)
        .ok_or(CommandError::UnknownPlayer(player))
}

fn transition(state: &mut GameState, status: GameStatus, out: &mut Vec<Event>) {
    debug!("game status {:?} -> {status:?}", state.status);
    state.status = status;
    out.push(Event::GameStatusChanged { status });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::{collections::BTreeSet, sync::Arc};

    use super::World;
    use neon_snake_core::{
        Fruit, FruitType, GameState, GameStatus, Player, PlayerId, Position, Weather,
    };
    use neon_snake_system_lifecycle as lifecycle;

    /// Shares the current snapshot. The returned handle is never mutated.
    #[must_use]
    pub fn snapshot(world: &World) -> Arc<GameState> {
        Arc::clone(&world.state)
    }

    /// Looks up a seated player.
    #[must_use]
    pub fn player(world: &World, id: PlayerId) -> Option<&Player> {
        world.state.player(id)
    }

    /// Seated players in roster order.
    #[must_use]
    pub fn players(world: &World) -> &[Player] {
        &world.state.players
    }

    /// Fruits on the board in slot order.
    #[must_use]
    pub fn fruits(world: &World) -> &[Fruit] {
        &world.state.fruits
    }

    /// Phase of the match.
    #[must_use]
    pub fn game_status(world: &World) -> GameStatus {
        world.state.status
    }

    /// Shared tick cadence multiplier.
    #[must_use]
    pub fn game_speed(world: &World) -> f32 {
        world.state.game_speed
    }

    /// Shared board level.
    #[must_use]
    pub fn current_level(world: &World) -> u32 {
        world.state.current_level
    }

    /// Obstacles of the current board level.
    #[must_use]
    pub fn obstacles(world: &World) -> &BTreeSet<Position> {
        &world.state.obstacles
    }

    /// Board weather.
    #[must_use]
    pub fn weather(world: &World) -> Weather {
        world.state.weather
    }

    /// Number of committed ticks.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.state.tick
    }

    /// Ranks players by descending score. Ties keep roster order.
    #[must_use]
    pub fn leaderboard(world: &World) -> Vec<Standing> {
        let mut players: Vec<&Player> = world.state.players.iter().collect();
        players.sort_by(|left, right| right.score.cmp(&left.score));
        players
            .into_iter()
            .enumerate()
            .map(|(index, player)| Standing {
                rank: index + 1,
                player: player.id,
                name: player.name.clone(),
                fruit: player.assigned_fruit,
                score: player.score,
                level: player.level,
                alive: player.alive,
            })
            .collect()
    }

    /// The last player standing once the match is over.
    #[must_use]
    pub fn winner(world: &World) -> Option<&Player> {
        lifecycle::winner(&world.state)
    }

    /// One row of the leaderboard.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Standing {
        /// One-based position in the ranking.
        pub rank: usize,
        /// Ranked player.
        pub player: PlayerId,
        /// Display name.
        pub name: String,
        /// Fruit identity held by the player.
        pub fruit: FruitType,
        /// Current score.
        pub score: u32,
        /// Personal level.
        pub level: u32,
        /// Whether the player is still in the match.
        pub alive: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_snake_core::Weather;

    #[test]
    fn startup_board_matches_fixed_configuration() {
        let world = World::new();
        let player = query::player(&world, LOCAL_PLAYER).expect("local player");

        assert_eq!(player.name, "Player 1");
        assert_eq!(player.assigned_fruit, FruitType::Apple);
        assert_eq!(player.direction, Direction::Right);
        assert_eq!(player.snake.len(), 3);
        assert_eq!(query::fruits(&world).len(), 3);
        assert_eq!(query::game_status(&world), GameStatus::Playing);
        assert_eq!(query::current_level(&world), 1);
        assert_eq!(query::weather(&world), Weather::Clear);
        assert!((query::game_speed(&world) - 1.0).abs() < f32::EPSILON);
        assert!(query::obstacles(&world).is_empty());
        assert_eq!(query::tick(&world), 0);
    }

    #[test]
    fn only_ticks_advance_time() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetWeather {
                weather: Weather::Fog,
            },
            &mut events,
        )
        .expect("weather");
        assert_eq!(query::tick(&world), 0);

        apply(&mut world, Command::Tick, &mut events).expect("tick");
        assert_eq!(query::tick(&world), 1);
        assert_eq!(events.last(), Some(&Event::TimeAdvanced { tick: 1 }));
    }

    #[test]
    fn paused_tick_reports_the_paused_status() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::Pause, &mut events).expect("pause");

        assert_eq!(
            apply(&mut world, Command::Tick, &mut events),
            Err(CommandError::GameNotRunning(GameStatus::Paused))
        );
    }
}
