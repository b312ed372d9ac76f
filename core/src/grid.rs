//! Wraparound coordinate arithmetic over the bounded playing field.

use serde::{Deserialize, Serialize};

/// Number of columns on the standard board.
pub const BOARD_WIDTH: u32 = 40;
/// Number of rows on the standard board.
pub const BOARD_HEIGHT: u32 = 30;

/// Location of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new position from column and row indices.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

/// Cardinal headings a snake may travel in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing row indices.
    Down,
    /// Toward decreasing column indices.
    Left,
    /// Toward increasing column indices.
    Right,
}

impl Direction {
    /// All headings in declaration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column and row delta applied by a single step.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Heading pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Dimensions of the toroidal board.
///
/// Coordinates never clamp: stepping off one edge re-enters from the opposite
/// edge. Dimensions are clamped to at least one cell so modular arithmetic is
/// always defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridGeometry {
    width: u32,
    height: u32,
}

impl GridGeometry {
    /// The 40×30 board used by regular games.
    pub const STANDARD: GridGeometry = GridGeometry::new(BOARD_WIDTH, BOARD_HEIGHT);

    /// Creates a grid with the provided dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        let width = if width == 0 { 1 } else { width };
        let height = if height == 0 { 1 } else { height };
        Self { width, height }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells on the board.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Reports whether the position lies on the board.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Folds arbitrary signed coordinates onto the board.
    #[must_use]
    pub fn wrap(&self, x: i64, y: i64) -> Position {
        let x = x.rem_euclid(i64::from(self.width));
        let y = y.rem_euclid(i64::from(self.height));
        Position::new(x as u32, y as u32)
    }

    /// Position reached by moving one cell from `from` in `direction`.
    #[must_use]
    pub fn step(&self, from: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        self.wrap(i64::from(from.x) + dx, i64::from(from.y) + dy)
    }

    /// Shortest signed displacement from `from` to `to` along each axis,
    /// taking the wrapped edges into account.
    #[must_use]
    pub fn displacement(&self, from: Position, to: Position) -> (i64, i64) {
        (
            wrapped_delta(from.x, to.x, self.width),
            wrapped_delta(from.y, to.y, self.height),
        )
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::STANDARD
    }
}

fn wrapped_delta(from: u32, to: u32, extent: u32) -> i64 {
    let extent = i64::from(extent);
    let raw = (i64::from(to) - i64::from(from)).rem_euclid(extent);
    if raw * 2 > extent {
        raw - extent
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_step_stays_on_the_standard_board() {
        let grid = GridGeometry::STANDARD;
        for from in grid.cells() {
            for direction in Direction::ALL {
                let to = grid.step(from, direction);
                assert!(to.x() < BOARD_WIDTH, "{from:?} {direction:?} -> {to:?}");
                assert!(to.y() < BOARD_HEIGHT, "{from:?} {direction:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn stepping_off_an_edge_re_enters_opposite() {
        let grid = GridGeometry::STANDARD;
        assert_eq!(grid.step(Position::new(0, 5), Direction::Left), Position::new(39, 5));
        assert_eq!(grid.step(Position::new(39, 5), Direction::Right), Position::new(0, 5));
        assert_eq!(grid.step(Position::new(7, 0), Direction::Up), Position::new(7, 29));
        assert_eq!(grid.step(Position::new(7, 29), Direction::Down), Position::new(7, 0));
    }

    #[test]
    fn opposite_steps_cancel() {
        let grid = GridGeometry::new(3, 2);
        for from in grid.cells() {
            for direction in Direction::ALL {
                let there = grid.step(from, direction);
                assert_eq!(grid.step(there, direction.opposite()), from);
            }
        }
    }

    #[test]
    fn displacement_prefers_the_wrapped_route() {
        let grid = GridGeometry::STANDARD;
        assert_eq!(grid.displacement(Position::new(1, 0), Position::new(38, 0)), (-3, 0));
        assert_eq!(grid.displacement(Position::new(5, 5), Position::new(8, 3)), (3, -2));
    }

    #[test]
    fn zero_dimensions_clamp_to_one_cell() {
        let grid = GridGeometry::new(0, 0);
        assert_eq!(grid.cell_count(), 1);
        assert_eq!(grid.step(Position::new(0, 0), Direction::Up), Position::new(0, 0));
    }

    #[test]
    fn cells_are_row_major() {
        let cells: Vec<Position> = GridGeometry::new(2, 2).cells().collect();
        assert_eq!(
            cells,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(0, 1),
                Position::new(1, 1),
            ]
        );
    }
}
