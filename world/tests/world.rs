use std::{sync::Arc, time::Duration};

use neon_snake_core::{
    Command, CommandError, Direction, Event, FruitType, GameStatus, PlayerId, PlayerSeed,
    Position, PowerUpType, Weather,
};
use neon_snake_system_pacing::{Config as PacingConfig, Pacing};
use neon_snake_world::{apply, query, World, LOCAL_PLAYER};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events).expect("command accepted");
    events
}

fn reject(world: &mut World, command: Command) -> CommandError {
    let before = query::snapshot(world);
    let mut events = Vec::new();
    let error = apply(world, command, &mut events).expect_err("command rejected");
    assert!(events.is_empty(), "rejections emit nothing");
    assert!(Arc::ptr_eq(&before, &query::snapshot(world)), "snapshot replaced");
    error
}

fn place_local_snake(world: &mut World, head: Position) {
    let segments = vec![
        head,
        Position::new(head.x() - 1, head.y()),
        Position::new(head.x() - 2, head.y()),
    ];
    let _ = run(
        world,
        Command::SetSnake {
            player: LOCAL_PLAYER,
            segments,
        },
    );
}

fn seat_rival(world: &mut World, id: u32) {
    let seed = PlayerSeed::new(
        PlayerId::new(id),
        format!("Rival {id}"),
        vec![Position::new(2, 2 + id)],
        Direction::Right,
    );
    let _ = run(world, Command::AddPlayer { seed });
}

#[test]
fn steering_onto_the_assigned_fruit_grows_the_snake() {
    let mut world = World::new();
    let _ = run(
        &mut world,
        Command::SetDirection {
            player: LOCAL_PLAYER,
            direction: Direction::Down,
        },
    );
    for _ in 0..5 {
        let _ = run(&mut world, Command::Tick);
    }
    let _ = run(
        &mut world,
        Command::SetDirection {
            player: LOCAL_PLAYER,
            direction: Direction::Right,
        },
    );
    let mut events = Vec::new();
    for _ in 0..5 {
        events = run(&mut world, Command::Tick);
    }

    let player = query::player(&world, LOCAL_PLAYER).expect("local player");
    assert_eq!(player.head(), Some(Position::new(15, 15)));
    assert_eq!(player.snake.len(), 4);
    assert_eq!(player.score, 10);
    assert!(events.contains(&Event::FruitEaten {
        player: LOCAL_PLAYER,
        fruit: FruitType::Apple,
        position: Position::new(15, 15),
        score: 10,
    }));

    let apple = query::fruits(&world)[0];
    assert_eq!(apple.kind, FruitType::Apple);
    assert!(!player.snake.contains(&apple.position));
    assert_eq!(query::tick(&world), 10);
}

#[test]
fn eating_a_rival_fruit_eliminates_and_ends_a_duel() {
    let mut world = World::new();
    seat_rival(&mut world, 1);
    place_local_snake(&mut world, Position::new(24, 15));
    let before = query::player(&world, LOCAL_PLAYER).expect("local").snake.clone();

    let events = run(&mut world, Command::Tick);

    let player = query::player(&world, LOCAL_PLAYER).expect("local");
    assert!(!player.alive);
    assert_eq!(player.snake, before);
    assert_eq!(player.score, 0);
    assert!(events.contains(&Event::PlayerEliminated {
        player: LOCAL_PLAYER
    }));
    assert_eq!(query::game_status(&world), GameStatus::GameOver);
    assert_eq!(
        query::winner(&world).map(|winner| winner.id),
        Some(PlayerId::new(1))
    );
}

#[test]
fn lone_player_poisoned_leaves_the_match_playing() {
    let mut world = World::new();
    place_local_snake(&mut world, Position::new(24, 15));

    let _ = run(&mut world, Command::Tick);

    assert!(!query::player(&world, LOCAL_PLAYER).expect("local").alive);
    assert_eq!(query::game_status(&world), GameStatus::Playing);
    assert!(query::winner(&world).is_none());
}

#[test]
fn scoring_past_the_threshold_promotes_the_board() {
    let mut world = World::new();
    let _ = run(
        &mut world,
        Command::SetScore {
            player: LOCAL_PLAYER,
            score: 95,
        },
    );
    place_local_snake(&mut world, Position::new(14, 15));

    let events = run(&mut world, Command::Tick);

    let player = query::player(&world, LOCAL_PLAYER).expect("local");
    assert_eq!(player.score, 105);
    assert_eq!(player.level, 2);
    assert_eq!(query::current_level(&world), 2);
    assert!((query::game_speed(&world) - 1.2).abs() < f32::EPSILON);
    let expected: Vec<Position> = vec![Position::new(10, 10), Position::new(30, 20)];
    assert_eq!(
        query::obstacles(&world).iter().copied().collect::<Vec<_>>(),
        expected
    );
    assert!(events.contains(&Event::LevelAdvanced {
        player: LOCAL_PLAYER,
        level: 2
    }));
}

#[test]
fn explicit_level_check_promotes_one_step() {
    let mut world = World::new();
    let _ = run(
        &mut world,
        Command::SetScore {
            player: LOCAL_PLAYER,
            score: 600,
        },
    );

    let _ = run(&mut world, Command::CheckLevelUp { player: LOCAL_PLAYER });
    assert_eq!(query::current_level(&world), 2);
    let _ = run(&mut world, Command::CheckLevelUp { player: LOCAL_PLAYER });
    assert_eq!(query::current_level(&world), 3);
}

#[test]
fn held_snapshots_never_change() {
    let mut world = World::new();
    let held = query::snapshot(&world);

    let _ = run(&mut world, Command::Tick);
    let _ = run(
        &mut world,
        Command::SetWeather {
            weather: Weather::Rain,
        },
    );

    assert_eq!(held.tick, 0);
    assert_eq!(held.weather, Weather::Clear);
    assert_eq!(held.players[0].head(), Some(Position::new(10, 10)));
    assert_eq!(query::tick(&world), 1);
    assert_eq!(query::weather(&world), Weather::Rain);
}

#[test]
fn rejected_commands_leave_the_world_untouched() {
    let mut world = World::new();
    let ghost = PlayerId::new(42);

    assert_eq!(
        reject(&mut world, Command::RemovePlayer { player: ghost }),
        CommandError::UnknownPlayer(ghost)
    );
    assert_eq!(
        reject(
            &mut world,
            Command::SetDirection {
                player: ghost,
                direction: Direction::Up
            }
        ),
        CommandError::UnknownPlayer(ghost)
    );
    assert_eq!(
        reject(
            &mut world,
            Command::SetSnake {
                player: LOCAL_PLAYER,
                segments: Vec::new()
            }
        ),
        CommandError::InvalidSnake(LOCAL_PLAYER)
    );
    assert_eq!(
        reject(
            &mut world,
            Command::SetSnake {
                player: LOCAL_PLAYER,
                segments: vec![Position::new(40, 0)]
            }
        ),
        CommandError::InvalidSnake(LOCAL_PLAYER)
    );
    assert_eq!(
        reject(&mut world, Command::SetGameSpeed { speed: 0.0 }),
        CommandError::InvalidSpeed(0.0)
    );
    assert!(matches!(
        reject(&mut world, Command::SetGameSpeed { speed: f32::NAN }),
        CommandError::InvalidSpeed(_)
    ));
    let duplicate = PlayerSeed::new(
        LOCAL_PLAYER,
        "Again",
        vec![Position::new(1, 1)],
        Direction::Up,
    );
    assert_eq!(
        reject(&mut world, Command::AddPlayer { seed: duplicate }),
        CommandError::DuplicatePlayer(LOCAL_PLAYER)
    );
    assert_eq!(
        reject(&mut world, Command::Eliminate { player: ghost }),
        CommandError::UnknownPlayer(ghost)
    );
}

#[test]
fn roster_is_capped_by_the_fruit_pool() {
    let mut world = World::new();
    for id in 1..6 {
        seat_rival(&mut world, id);
    }
    let fruits: Vec<FruitType> = query::players(&world)
        .iter()
        .map(|player| player.assigned_fruit)
        .collect();
    assert_eq!(fruits, FruitType::ALL.to_vec());

    let seventh = PlayerSeed::new(
        PlayerId::new(6),
        "Late",
        vec![Position::new(0, 0)],
        Direction::Up,
    );
    assert_eq!(
        reject(
            &mut world,
            Command::AddPlayer {
                seed: seventh.clone()
            }
        ),
        CommandError::FruitPoolExhausted(6)
    );

    let _ = run(
        &mut world,
        Command::RemovePlayer {
            player: PlayerId::new(2),
        },
    );
    let events = run(&mut world, Command::AddPlayer { seed: seventh });
    assert_eq!(
        events,
        vec![Event::PlayerJoined {
            player: PlayerId::new(6),
            fruit: FruitType::Orange,
        }]
    );
}

#[test]
fn power_ups_toggle_membership() {
    let mut world = World::new();
    let add = Command::AddPowerUp {
        player: LOCAL_PLAYER,
        power_up: PowerUpType::Invincible,
    };
    let remove = Command::RemovePowerUp {
        player: LOCAL_PLAYER,
        power_up: PowerUpType::Invincible,
    };

    let _ = run(&mut world, add.clone());
    assert!(query::player(&world, LOCAL_PLAYER)
        .expect("local")
        .power_ups
        .contains(&PowerUpType::Invincible));
    assert_eq!(
        reject(&mut world, add),
        CommandError::PowerUpAlreadyActive {
            player: LOCAL_PLAYER,
            power_up: PowerUpType::Invincible,
        }
    );

    let _ = run(&mut world, remove.clone());
    assert_eq!(
        reject(&mut world, remove),
        CommandError::PowerUpNotActive {
            player: LOCAL_PLAYER,
            power_up: PowerUpType::Invincible,
        }
    );
}

#[test]
fn pause_and_resume_gate_ticks() {
    let mut world = World::new();

    assert_eq!(
        run(&mut world, Command::Pause),
        vec![Event::GameStatusChanged {
            status: GameStatus::Paused
        }]
    );
    assert_eq!(
        reject(&mut world, Command::Tick),
        CommandError::GameNotRunning(GameStatus::Paused)
    );
    assert_eq!(
        reject(&mut world, Command::Pause),
        CommandError::GameNotRunning(GameStatus::Paused)
    );

    let _ = run(&mut world, Command::Resume);
    assert_eq!(query::game_status(&world), GameStatus::Playing);
    assert_eq!(
        reject(&mut world, Command::Resume),
        CommandError::NotPaused(GameStatus::Playing)
    );
    let _ = run(&mut world, Command::Tick);
}

#[test]
fn leaderboard_orders_by_score_and_keeps_ties_stable() {
    let mut world = World::new();
    seat_rival(&mut world, 1);
    seat_rival(&mut world, 2);
    for (id, score) in [(0, 20), (1, 45), (2, 20)] {
        let _ = run(
            &mut world,
            Command::SetScore {
                player: PlayerId::new(id),
                score,
            },
        );
    }

    let ranking: Vec<(usize, PlayerId, u32)> = query::leaderboard(&world)
        .into_iter()
        .map(|standing| (standing.rank, standing.player, standing.score))
        .collect();
    assert_eq!(
        ranking,
        vec![
            (1, PlayerId::new(1), 45),
            (2, PlayerId::new(0), 20),
            (3, PlayerId::new(2), 20),
        ]
    );
}

fn steer_towards_apple(world: &World) -> Option<Direction> {
    let snapshot = query::snapshot(world);
    let player = snapshot.player(LOCAL_PLAYER)?;
    let head = player.head()?;
    let apple = snapshot
        .fruits
        .iter()
        .find(|fruit| fruit.kind == player.assigned_fruit)?;
    let (dx, dy) = snapshot.grid.displacement(head, apple.position);
    let wanted = if dx > 0 {
        Direction::Right
    } else if dx < 0 {
        Direction::Left
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    };
    (wanted != player.direction.opposite()).then_some(wanted)
}

fn paced_session(seed: u64) -> (Arc<neon_snake_core::GameState>, Vec<Event>) {
    let mut world = World::with_seed(seed);
    let mut pacing = Pacing::new(PacingConfig::new(Duration::from_millis(150)));
    let mut log = Vec::new();
    let mut pending = Vec::new();

    for _ in 0..600 {
        let mut commands = Vec::new();
        pacing.handle(
            &pending,
            query::game_status(&world),
            query::game_speed(&world),
            Duration::from_millis(50),
            &mut commands,
        );
        pending.clear();
        for command in commands {
            if let Some(direction) = steer_towards_apple(&world) {
                apply(
                    &mut world,
                    Command::SetDirection {
                        player: LOCAL_PLAYER,
                        direction,
                    },
                    &mut pending,
                )
                .expect("steer");
            }
            apply(&mut world, command, &mut pending).expect("tick");
        }
        log.extend(pending.iter().cloned());
    }
    (query::snapshot(&world), log)
}

#[test]
fn same_seed_replays_identically() {
    let (first_state, first_log) = paced_session(7);
    let (second_state, second_log) = paced_session(7);

    assert_eq!(first_state, second_state);
    assert_eq!(first_log, second_log);
    assert!(first_state.tick >= 200);
    assert!(first_log
        .iter()
        .any(|event| matches!(event, Event::FruitEaten { .. })));
}
