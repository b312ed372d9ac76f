use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use neon_snake_core::{default_levels, GridGeometry, Level};
use neon_snake_system_pacing::DEFAULT_BASE_PERIOD;
use serde::Deserialize;

/// Optional overrides read from a TOML session file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SessionConfig {
    /// Seed for fruit placement.
    pub(crate) seed: Option<u64>,
    /// Tick period at a game speed of 1.0, in milliseconds.
    pub(crate) base_period_ms: Option<u64>,
    /// Names of additional autopiloted players.
    #[serde(default)]
    pub(crate) players: Vec<String>,
    /// Replacement level catalog.
    pub(crate) levels: Option<Vec<LevelEntry>>,
}

/// One `[[levels]]` table of the session file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelEntry {
    number: u32,
    required_score: u32,
    speed: f32,
    #[serde(default)]
    obstacles: Vec<[i64; 2]>,
}

impl SessionConfig {
    /// Reads and parses the session file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid session file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse session toml contents")?;
        if config.base_period_ms == Some(0) {
            bail!("base_period_ms must be positive");
        }
        Ok(config)
    }

    /// Tick period at a game speed of 1.0.
    pub(crate) fn base_period(&self) -> Duration {
        self.base_period_ms
            .map_or(DEFAULT_BASE_PERIOD, Duration::from_millis)
    }

    /// Level catalog for `grid`, falling back to the built-in catalog.
    pub(crate) fn levels(&self, grid: GridGeometry) -> Result<Vec<Level>> {
        let Some(entries) = &self.levels else {
            return Ok(default_levels(grid));
        };
        if entries.is_empty() {
            bail!("session file declares an empty level catalog");
        }

        let mut levels = Vec::with_capacity(entries.len());
        for entry in entries {
            if !entry.speed.is_finite() || entry.speed <= 0.0 {
                bail!(
                    "level {} has speed {}; expected a positive number",
                    entry.number,
                    entry.speed
                );
            }
            if levels.iter().any(|level: &Level| level.number == entry.number) {
                bail!("level {} is declared twice", entry.number);
            }
            let obstacles = entry.obstacles.iter().map(|[x, y]| grid.wrap(*x, *y));
            levels.push(Level::new(
                entry.number,
                entry.required_score,
                entry.speed,
                obstacles,
            ));
        }
        Ok(levels)
    }
}
