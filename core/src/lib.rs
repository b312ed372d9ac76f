#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Neon Snake engine.
//!
//! Adapters submit [`Command`] values describing desired mutations, the world
//! executes them through its `apply` entry point against a copy of the current
//! [`GameState`], commits the copy as the new snapshot, and broadcasts
//! [`Event`] values describing what changed. Rejected commands surface a
//! [`CommandError`] and leave the snapshot untouched.

mod catalog;
mod grid;
mod state;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{default_levels, Color, FruitType, Level, PowerUpType, Weather};
pub use grid::{Direction, GridGeometry, Position, BOARD_HEIGHT, BOARD_WIDTH};
pub use state::{
    Fruit, GameState, GameStatus, Player, PlayerId, PlayerSeed, PowerUpDrop,
};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Seats a new player, assigning the next free fruit identity.
    AddPlayer {
        /// Description of the joining player.
        seed: PlayerSeed,
    },
    /// Removes a player from the roster.
    RemovePlayer {
        /// Player to remove.
        player: PlayerId,
    },
    /// Sets the heading used by the player's next move.
    SetDirection {
        /// Player to steer.
        player: PlayerId,
        /// New heading.
        direction: Direction,
    },
    /// Overwrites a player's score without applying gameplay rules.
    SetScore {
        /// Player whose score is replaced.
        player: PlayerId,
        /// New score.
        score: u32,
    },
    /// Replaces a player's body without applying gameplay rules.
    SetSnake {
        /// Player whose snake is replaced.
        player: PlayerId,
        /// New body cells, head first.
        segments: Vec<Position>,
    },
    /// Adds a power-up to the player's active set.
    AddPowerUp {
        /// Player receiving the power-up.
        player: PlayerId,
        /// Power-up to activate.
        power_up: PowerUpType,
    },
    /// Removes a power-up from the player's active set.
    RemovePowerUp {
        /// Player losing the power-up.
        player: PlayerId,
        /// Power-up to deactivate.
        power_up: PowerUpType,
    },
    /// Changes the board weather.
    SetWeather {
        /// New weather.
        weather: Weather,
    },
    /// Changes the shared tick cadence multiplier.
    SetGameSpeed {
        /// New multiplier; must be finite and positive.
        speed: f32,
    },
    /// Advances every live player by one cell.
    Tick,
    /// Promotes the player by one level if their score qualifies.
    CheckLevelUp {
        /// Player to evaluate.
        player: PlayerId,
    },
    /// Marks the player as eliminated.
    Eliminate {
        /// Player to eliminate.
        player: PlayerId,
    },
    /// Suspends tick scheduling.
    Pause,
    /// Resumes tick scheduling after a pause.
    Resume,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A player was seated.
    PlayerJoined {
        /// Identifier of the new player.
        player: PlayerId,
        /// Fruit identity assigned from the pool.
        fruit: FruitType,
    },
    /// A player left the roster.
    PlayerRemoved {
        /// Identifier of the removed player.
        player: PlayerId,
    },
    /// A player's heading changed.
    DirectionChanged {
        /// Player that was steered.
        player: PlayerId,
        /// Heading now in effect.
        direction: Direction,
    },
    /// A player's score was overwritten.
    ScoreChanged {
        /// Player whose score changed.
        player: PlayerId,
        /// Score now in effect.
        score: u32,
    },
    /// A player's body was replaced.
    SnakeReplaced {
        /// Player whose snake changed.
        player: PlayerId,
        /// Length of the new body.
        length: usize,
    },
    /// A power-up became active for a player.
    PowerUpActivated {
        /// Player that gained the power-up.
        player: PlayerId,
        /// Power-up now active.
        power_up: PowerUpType,
    },
    /// A power-up stopped being active for a player.
    PowerUpDeactivated {
        /// Player that lost the power-up.
        player: PlayerId,
        /// Power-up no longer active.
        power_up: PowerUpType,
    },
    /// The board weather changed.
    WeatherChanged {
        /// Weather now in effect.
        weather: Weather,
    },
    /// The shared cadence multiplier changed outside of a level promotion.
    GameSpeedChanged {
        /// Multiplier now in effect.
        speed: f32,
    },
    /// A tick was committed.
    TimeAdvanced {
        /// Tick counter after the step.
        tick: u64,
    },
    /// A player ate their assigned fruit.
    FruitEaten {
        /// Player that ate.
        player: PlayerId,
        /// Identity of the eaten fruit.
        fruit: FruitType,
        /// Cell the fruit occupied.
        position: Position,
        /// Score after eating.
        score: u32,
    },
    /// A fruit was placed on the board.
    FruitSpawned {
        /// Identity of the new fruit.
        fruit: FruitType,
        /// Cell the fruit occupies.
        position: Position,
    },
    /// A player was eliminated.
    PlayerEliminated {
        /// Eliminated player.
        player: PlayerId,
    },
    /// A player was promoted to the next level.
    LevelAdvanced {
        /// Promoted player.
        player: PlayerId,
        /// Level reached.
        level: u32,
    },
    /// The shared board was reconfigured from a catalog level.
    BoardLevelChanged {
        /// Board level now in effect.
        level: u32,
        /// Cadence multiplier now in effect.
        speed: f32,
        /// Number of obstacles now on the board.
        obstacles: usize,
    },
    /// The match moved to a new phase.
    GameStatusChanged {
        /// Phase now in effect.
        status: GameStatus,
    },
}

/// Reasons a command may fail.
///
/// Every variant except [`CommandError::BoardFull`] is a rejection: the
/// command was ignored and the snapshot is unchanged.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CommandError {
    /// No seated player carries the identifier.
    #[error("no player with id {0}")]
    UnknownPlayer(PlayerId),
    /// A seated player already carries the identifier.
    #[error("a player with id {0} is already seated")]
    DuplicatePlayer(PlayerId),
    /// Every fruit identity is held by a seated player.
    #[error("fruit pool exhausted: all {0} identities are taken")]
    FruitPoolExhausted(usize),
    /// The supplied body is empty or leaves the board.
    #[error("snake for {0} is empty or leaves the board")]
    InvalidSnake(PlayerId),
    /// The cadence multiplier is not a positive finite number.
    #[error("game speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),
    /// The operation needs a different match phase.
    #[error("game is not running (status {0:?})")]
    GameNotRunning(GameStatus),
    /// Only a paused match can be resumed.
    #[error("game is not paused (status {0:?})")]
    NotPaused(GameStatus),
    /// The power-up is already in the player's active set.
    #[error("{player} already has {power_up:?} active")]
    PowerUpAlreadyActive {
        /// Player addressed by the command.
        player: PlayerId,
        /// Power-up that was already active.
        power_up: PowerUpType,
    },
    /// The power-up is not in the player's active set.
    #[error("{player} does not have {power_up:?} active")]
    PowerUpNotActive {
        /// Player addressed by the command.
        player: PlayerId,
        /// Power-up that was not active.
        power_up: PowerUpType,
    },
    /// No free cell is left for a fruit.
    #[error("board is full: no free cell among {cells} cells")]
    BoardFull {
        /// Number of cells on the board.
        cells: u64,
    },
}

impl CommandError {
    /// Reports whether the failure means the simulation cannot continue.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::BoardFull { .. })
    }
}
