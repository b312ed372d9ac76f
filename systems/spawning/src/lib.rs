#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic fruit placement.
//!
//! Positions are drawn uniformly from a seeded stream. Sampling is bounded;
//! once the attempt budget is spent the spawner scans the board for free
//! cells and reports [`CommandError::BoardFull`] when none remain.

use std::collections::HashSet;

use log::{debug, warn};
use neon_snake_core::{CommandError, GridGeometry, Position};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Sampling attempts made before falling back to a full board scan.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// Configuration parameters required to construct the spawner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    max_attempts: u32,
}

impl Config {
    /// Creates a new configuration using the provided seed and attempt budget.
    #[must_use]
    pub const fn new(rng_seed: u64, max_attempts: u32) -> Self {
        Self {
            rng_seed,
            max_attempts,
        }
    }

    /// Creates a configuration with the default attempt budget.
    #[must_use]
    pub const fn with_seed(rng_seed: u64) -> Self {
        Self::new(rng_seed, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Places fruits on cells nobody occupies.
#[derive(Clone, Debug)]
pub struct FruitSpawner {
    rng: ChaCha8Rng,
    max_attempts: u32,
}

impl FruitSpawner {
    /// Creates a new spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            max_attempts: config.max_attempts,
        }
    }

    /// Picks a cell of `grid` that is not in `exclude`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::BoardFull`] when every cell is excluded.
    pub fn place_fruit(
        &mut self,
        grid: GridGeometry,
        exclude: &HashSet<Position>,
    ) -> Result<Position, CommandError> {
        let saturated = exclude.len() as u64 >= grid.cell_count();
        if !saturated {
            for _ in 0..self.max_attempts {
                let candidate = Position::new(
                    self.rng.gen_range(0..grid.width()),
                    self.rng.gen_range(0..grid.height()),
                );
                if !exclude.contains(&candidate) {
                    return Ok(candidate);
                }
            }
        }

        self.scan_free_cells(grid, exclude)
    }

    fn scan_free_cells(
        &mut self,
        grid: GridGeometry,
        exclude: &HashSet<Position>,
    ) -> Result<Position, CommandError> {
        let free: Vec<Position> = grid.cells().filter(|cell| !exclude.contains(cell)).collect();
        if free.is_empty() {
            warn!("no free cell left on a {}x{} board", grid.width(), grid.height());
            return Err(CommandError::BoardFull {
                cells: grid.cell_count(),
            });
        }

        debug!(
            "sampling budget exhausted, choosing among {} free cells",
            free.len()
        );
        let index = self.rng.gen_range(0..free.len());
        Ok(free[index])
    }
}
