//! Immutable game snapshot and the records it is made of.

use std::{
    collections::{BTreeSet, HashSet},
    fmt,
};

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Color, FruitType, Level, PowerUpType, Weather},
    grid::{Direction, GridGeometry, Position},
};

/// Unique identifier assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.get())
    }
}

/// Coarse phase of the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Ticks are being scheduled.
    #[default]
    Playing,
    /// Scheduling is suspended.
    Paused,
    /// The match has ended.
    GameOver,
}

/// A collectible fruit on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fruit {
    /// Cell the fruit occupies.
    pub position: Position,
    /// Identity of the fruit.
    pub kind: FruitType,
    /// Points awarded when eaten by its owner.
    pub points: u32,
}

impl Fruit {
    /// Creates a fruit worth the catalog points of `kind`.
    #[must_use]
    pub const fn new(kind: FruitType, position: Position) -> Self {
        Self {
            position,
            kind,
            points: kind.points(),
        }
    }
}

/// A power-up lying on the board. Carried for presentation only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PowerUpDrop {
    /// Identity of the power-up.
    pub kind: PowerUpType,
    /// Cell the drop occupies.
    pub position: Position,
    /// Ticks the effect would last once collected.
    pub duration: u32,
}

/// Caller-supplied description of a player joining the match.
///
/// Fruit assignment, color and liveness are derived on admission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSeed {
    /// Identifier the player will be addressed by.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Initial body, head first.
    pub snake: Vec<Position>,
    /// Initial heading.
    pub direction: Direction,
    /// Starting score.
    pub score: u32,
    /// Starting level.
    pub level: u32,
}

impl PlayerSeed {
    /// Creates a seed with zero score at level one.
    #[must_use]
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        snake: Vec<Position>,
        direction: Direction,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            snake,
            direction,
            score: 0,
            level: 1,
        }
    }

    /// Overrides the starting score.
    #[must_use]
    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    /// Overrides the starting level.
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }
}

/// A seated player and their snake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Body cells, head first. Never empty.
    pub snake: Vec<Position>,
    /// Heading used by the next tick.
    pub direction: Direction,
    /// Accumulated score.
    pub score: u32,
    /// The only fruit this player may eat; unique among seated players.
    pub assigned_fruit: FruitType,
    /// Current snake color.
    pub color: Color,
    /// Active power-ups. Inert.
    pub power_ups: BTreeSet<PowerUpType>,
    /// Level reached by this player.
    pub level: u32,
    /// Cleared once the player is eliminated.
    pub alive: bool,
}

impl Player {
    /// Builds a live player from a seed and the fruit it was assigned.
    #[must_use]
    pub fn from_seed(seed: PlayerSeed, assigned_fruit: FruitType) -> Self {
        Self {
            id: seed.id,
            name: seed.name,
            snake: seed.snake,
            direction: seed.direction,
            score: seed.score,
            assigned_fruit,
            color: assigned_fruit.color(),
            power_ups: BTreeSet::new(),
            level: seed.level.max(1),
            alive: true,
        }
    }

    /// Head cell of the snake.
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

/// Complete, self-contained state of one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Board dimensions.
    pub grid: GridGeometry,
    /// Number of ticks committed so far.
    pub tick: u64,
    /// Seated players in admission order.
    pub players: Vec<Player>,
    /// Active fruits.
    pub fruits: Vec<Fruit>,
    /// Power-ups lying on the board. Cosmetic.
    pub power_ups: Vec<PowerUpDrop>,
    /// Board-wide obstacles taken from the current level. Inert.
    pub obstacles: BTreeSet<Position>,
    /// Board-wide weather. Cosmetic.
    pub weather: Weather,
    /// Shared tick cadence multiplier.
    pub game_speed: f32,
    /// Shared board level.
    pub current_level: u32,
    /// Level catalog ordered by number.
    pub levels: Vec<Level>,
    /// Phase of the match.
    pub status: GameStatus,
}

impl GameState {
    /// Creates an empty, playing board configured from the first catalog level.
    #[must_use]
    pub fn new(grid: GridGeometry, mut levels: Vec<Level>) -> Self {
        levels.sort_by_key(|level| level.number);
        let (current_level, game_speed, obstacles) = levels
            .first()
            .map(|level| (level.number, level.speed_multiplier, level.obstacles.clone()))
            .unwrap_or((1, 1.0, BTreeSet::new()));
        Self {
            grid,
            tick: 0,
            players: Vec::new(),
            fruits: Vec::new(),
            power_ups: Vec::new(),
            obstacles,
            weather: Weather::Clear,
            game_speed,
            current_level,
            levels,
            status: GameStatus::Playing,
        }
    }

    /// Looks up a player by identifier.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Mutable lookup of a player by identifier.
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    /// Looks up a catalog level by number.
    #[must_use]
    pub fn level(&self, number: u32) -> Option<&Level> {
        self.levels.iter().find(|level| level.number == number)
    }

    /// Number of players that have not been eliminated.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|player| player.alive).count()
    }

    /// Every cell covered by a snake segment or a fruit.
    #[must_use]
    pub fn occupied_cells(&self) -> HashSet<Position> {
        self.players
            .iter()
            .flat_map(|player| player.snake.iter().copied())
            .chain(self.fruits.iter().map(|fruit| fruit.position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_levels;

    #[test]
    fn player_id_exposes_its_number() {
        let id = PlayerId::new(4);
        assert_eq!(id.get(), 4);
        assert_eq!(id.to_string(), "player#4");
    }

    #[test]
    fn new_state_takes_board_from_first_level() {
        let mut levels = default_levels(GridGeometry::STANDARD);
        levels.reverse();
        let state = GameState::new(GridGeometry::STANDARD, levels);
        assert_eq!(state.current_level, 1);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.levels[0].number, 1);
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn occupied_cells_cover_snakes_and_fruits() {
        let mut state = GameState::new(GridGeometry::STANDARD, Vec::new());
        let seed = PlayerSeed::new(
            PlayerId::new(3),
            "P",
            vec![Position::new(1, 1), Position::new(0, 1)],
            Direction::Right,
        );
        state.players.push(Player::from_seed(seed, FruitType::Grape));
        state.fruits.push(Fruit::new(FruitType::Apple, Position::new(5, 5)));

        let occupied = state.occupied_cells();
        assert_eq!(occupied.len(), 3);
        assert!(occupied.contains(&Position::new(0, 1)));
        assert!(occupied.contains(&Position::new(5, 5)));
    }

    #[test]
    fn seeded_player_takes_fruit_color() {
        let seed = PlayerSeed::new(PlayerId::new(1), "P", vec![Position::new(0, 0)], Direction::Up)
            .with_level(0);
        let player = Player::from_seed(seed, FruitType::Blueberry);
        assert_eq!(player.color, FruitType::Blueberry.color());
        assert_eq!(player.level, 1);
        assert!(player.alive);
    }
}
