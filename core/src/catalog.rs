//! Fixed fruit, power-up and level definitions.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::grid::{GridGeometry, Position};

/// Opaque RGB color attached to fruits and snakes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red(), self.green(), self.blue())
    }
}

/// Fruit identities. Each doubles as the identity token of the player
/// assigned to eat it, so the pool bounds the roster size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FruitType {
    /// Red, 10 points.
    Apple,
    /// Gold, 15 points.
    Banana,
    /// Orange, 20 points.
    Orange,
    /// Purple, 25 points.
    Grape,
    /// Blue, 30 points.
    Blueberry,
    /// Pink, 35 points.
    Strawberry,
}

impl FruitType {
    /// The fruit pool in assignment order.
    pub const ALL: [FruitType; 6] = [
        FruitType::Apple,
        FruitType::Banana,
        FruitType::Orange,
        FruitType::Grape,
        FruitType::Blueberry,
        FruitType::Strawberry,
    ];

    /// Color shared by the fruit and the snake that owns it.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Apple => Color::from_rgb(0xff, 0x00, 0x00),
            Self::Banana => Color::from_rgb(0xff, 0xd7, 0x00),
            Self::Orange => Color::from_rgb(0xff, 0xa5, 0x00),
            Self::Grape => Color::from_rgb(0x80, 0x00, 0x80),
            Self::Blueberry => Color::from_rgb(0x00, 0x00, 0xff),
            Self::Strawberry => Color::from_rgb(0xff, 0x69, 0xb4),
        }
    }

    /// Score awarded for eating the fruit.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::Apple => 10,
            Self::Banana => 15,
            Self::Orange => 20,
            Self::Grape => 25,
            Self::Blueberry => 30,
            Self::Strawberry => 35,
        }
    }
}

impl fmt::Display for FruitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Apple => "apple",
            Self::Banana => "banana",
            Self::Orange => "orange",
            Self::Grape => "grape",
            Self::Blueberry => "blueberry",
            Self::Strawberry => "strawberry",
        };
        f.write_str(name)
    }
}

/// Power-up identities. Tracked per player; no simulated effect yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpType {
    /// Movement boost.
    Speed,
    /// Body reduction.
    Shrink,
    /// Collision immunity.
    Invincible,
    /// Relocation.
    Teleport,
}

/// Board-wide weather. Cosmetic only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    /// No effect.
    #[default]
    Clear,
    /// Fog overlay.
    Fog,
    /// Rain overlay.
    Rain,
    /// Darkened board.
    Dark,
}

/// One entry of the level catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level number; the catalog is ordered by it.
    pub number: u32,
    /// Score a player needs to be promoted into this level.
    pub required_score: u32,
    /// Tick cadence multiplier applied to the whole board.
    pub speed_multiplier: f32,
    /// Cells marked as obstacles while this level is the board level.
    #[serde(default)]
    pub obstacles: BTreeSet<Position>,
}

impl Level {
    /// Creates a level definition.
    #[must_use]
    pub fn new(
        number: u32,
        required_score: u32,
        speed_multiplier: f32,
        obstacles: impl IntoIterator<Item = Position>,
    ) -> Self {
        Self {
            number,
            required_score,
            speed_multiplier,
            obstacles: obstacles.into_iter().collect(),
        }
    }
}

/// The five-level catalog shipped with the game, laid out on `grid`.
///
/// Obstacle coordinates that sit on the far edge are folded back onto the
/// board.
#[must_use]
pub fn default_levels(grid: GridGeometry) -> Vec<Level> {
    let at = |x: i64, y: i64| grid.wrap(x, y);
    vec![
        Level::new(1, 0, 1.0, []),
        Level::new(2, 100, 1.2, [at(10, 10), at(30, 20)]),
        Level::new(3, 250, 1.4, [at(15, 15), at(25, 25), at(35, 15)]),
        Level::new(
            4,
            500,
            1.6,
            [at(20, 10), at(20, 20), at(20, 30), at(10, 20), at(30, 20)],
        ),
        Level::new(
            5,
            1000,
            2.0,
            [at(10, 10), at(30, 10), at(10, 30), at(30, 30), at(20, 20)],
        ),
    ]
}
