#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Neon Snake session.
//!
//! Every seated player is steered by a simple autopilot; ticks are scheduled by
//! the pacing system against a simulated frame clock, and the final standings
//! are printed once the tick budget is spent or the match ends.

mod autopilot;
mod session;

use std::{path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use neon_snake_core::{
    Command, CommandError, Direction, Event, GameStatus, GridGeometry, PlayerId, PlayerSeed,
    Position,
};
use neon_snake_system_pacing::{Config as PacingConfig, Pacing};
use neon_snake_system_spawning::Config as SpawnConfig;
use neon_snake_world::{apply, initial_state, query, World, DEFAULT_SEED};

use crate::session::SessionConfig;

const FRAME: Duration = Duration::from_millis(16);

/// Runs a headless Neon Snake match driven by autopiloted players.
#[derive(Debug, Parser)]
#[command(name = "neon-snake", version, about)]
struct Cli {
    /// Seed for fruit placement; overrides the session file.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks to simulate before stopping.
    #[arg(long, default_value_t = 200)]
    ticks: u64,
    /// Number of additional autopiloted players to seat.
    #[arg(long, default_value_t = 0)]
    players: u32,
    /// TOML session file with seed, pacing, player and level overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Sleep between frames instead of running as fast as possible.
    #[arg(long)]
    realtime: bool,
}

/// Entry point for the Neon Snake command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let session = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let seed = cli.seed.or(session.seed).unwrap_or(DEFAULT_SEED);
    let levels = session.levels(GridGeometry::STANDARD)?;
    let mut world = World::from_state(initial_state(levels), SpawnConfig::with_seed(seed));
    info!("session seeded with {seed}");

    let bots = (1..=cli.players).map(|index| format!("Bot {index}"));
    let names: Vec<String> = session.players.iter().cloned().chain(bots).collect();
    seat_players(&mut world, names)?;

    let mut pacing = Pacing::new(PacingConfig::new(session.base_period()));
    let mut pending: Vec<Event> = Vec::new();
    while query::tick(&world) < cli.ticks && query::game_status(&world) == GameStatus::Playing {
        let mut commands = Vec::new();
        pacing.handle(
            &pending,
            query::game_status(&world),
            query::game_speed(&world),
            FRAME,
            &mut commands,
        );
        pending.clear();

        for command in commands {
            steer_all(&mut world, &mut pending)?;
            apply(&mut world, command, &mut pending)
                .with_context(|| format!("tick {} failed", query::tick(&world) + 1))?;
        }
        pending.iter().for_each(report);

        if cli.realtime {
            thread::sleep(FRAME);
        }
    }

    print_standings(&world);
    Ok(())
}

fn seat_players(world: &mut World, names: Vec<String>) -> Result<()> {
    let mut events = Vec::new();
    for (offset, name) in (1_u32..).zip(names) {
        let row = (10 + offset * 4) % GridGeometry::STANDARD.height();
        let seed = PlayerSeed::new(
            PlayerId::new(offset),
            name,
            vec![
                Position::new(10, row),
                Position::new(9, row),
                Position::new(8, row),
            ],
            Direction::Right,
        );
        match apply(world, Command::AddPlayer { seed }, &mut events) {
            Ok(()) => {}
            Err(error @ CommandError::FruitPoolExhausted(_)) => {
                warn!("not seating further players: {error}");
                break;
            }
            Err(error) => return Err(error).context("failed to seat player"),
        }
    }
    events.iter().for_each(report);
    Ok(())
}

fn steer_all(world: &mut World, events: &mut Vec<Event>) -> Result<()> {
    let snapshot = query::snapshot(world);
    for player in &snapshot.players {
        if let Some(direction) = autopilot::steer(&snapshot, player.id) {
            apply(
                world,
                Command::SetDirection {
                    player: player.id,
                    direction,
                },
                events,
            )
            .with_context(|| format!("failed to steer {}", player.id))?;
        }
    }
    Ok(())
}

fn report(event: &Event) {
    match event {
        Event::PlayerJoined { player, fruit } => info!("{player} joined holding {fruit}"),
        Event::FruitEaten {
            player,
            fruit,
            score,
            ..
        } => info!("{player} ate {fruit}, score {score}"),
        Event::PlayerEliminated { player } => info!("{player} was eliminated"),
        Event::LevelAdvanced { player, level } => info!("{player} reached level {level}"),
        Event::GameStatusChanged { status } => info!("game status is now {status:?}"),
        other => debug!("{other:?}"),
    }
}

fn print_standings(world: &World) {
    println!("after {} ticks:", query::tick(world));
    for standing in query::leaderboard(world) {
        let state = if standing.alive { "alive" } else { "out" };
        println!(
            "{:>2}. {:<12} {:<10} {:>5} pts  level {}  {state}",
            standing.rank,
            standing.name,
            standing.fruit.to_string(),
            standing.score,
            standing.level,
        );
    }
    if let Some(winner) = query::winner(world) {
        println!("{} wins!", winner.name);
    }
}
