//! End-to-end behavior of the round engine, driven purely through commands.

mod common;

use common::{arena, run_tick, run_ticks, tuning, world_with, D, E, W};
use maze_chase_core::{
    AudioCue, CellKind, Command, Direction, Event, GhostKind, GhostMode, MazeLayout,
    PlayerLifecycle, TileIndex,
};
use maze_chase_world::{apply, query, World};

#[test]
fn session_starts_ready_with_scattering_ghosts() {
    let world = world_with(arena());
    let player = query::player(&world);
    assert_eq!(player.lifecycle, PlayerLifecycle::Ready);
    assert_eq!(player.lives, 3);
    assert_eq!(query::score(&world), 0);
    for ghost in query::ghosts(&world).iter() {
        assert_eq!(ghost.mode, GhostMode::Scatter);
        assert_eq!(ghost.direction, Direction::Up);
    }
}

#[test]
fn round_starts_after_the_ready_countdown() {
    let mut world = world_with(arena());
    let spawn = query::player(&world).position;

    let events = run_ticks(&mut world, 2);
    assert!(!events.contains(&Event::RoundStarted));
    assert_eq!(query::player(&world).position, spawn);

    let events = run_tick(&mut world);
    assert!(events.contains(&Event::RoundStarted));
    assert_eq!(query::player(&world).lifecycle, PlayerLifecycle::Chase);
}

#[test]
fn walking_a_corridor_eats_its_dots() {
    let mut world = world_with(arena());
    let _ = run_ticks(&mut world, 3);

    // Crossing from the spawn at (5,1) to the corner at (5,5) covers five
    // dot tiles, the spawn tile included.
    let events = run_ticks(&mut world, 70);
    let eaten: Vec<TileIndex> = events
        .iter()
        .filter_map(|event| match event {
            Event::PelletEaten { tile, score: 10 } => Some(*tile),
            _ => None,
        })
        .collect();
    assert_eq!(
        eaten,
        (1..=5).map(|col| TileIndex::new(5, col)).collect::<Vec<_>>()
    );
    assert_eq!(query::score(&world), 50);
    let munches = events
        .iter()
        .filter(|event| matches!(event, Event::Audio { cue: AudioCue::Munch }))
        .count();
    assert_eq!(munches, 5);

    // The corner wall stops the player on the tile center.
    assert_eq!(query::player(&world).tile, TileIndex::new(5, 5));
}

#[test]
fn blocked_direction_command_resets_to_current_heading() {
    let mut world = world_with(arena());
    let _ = run_ticks(&mut world, 3);

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::SetPlayerDirection {
            direction: Direction::Down,
        },
        &mut events,
    );
    let _ = run_tick(&mut world);
    let player = query::player(&world);
    assert_eq!(player.direction, Direction::Right);
    assert_eq!(player.commanded, Direction::Right);
}

#[test]
fn power_pellet_frightens_and_reverses_every_ghost() {
    let mut layout = arena();
    layout.cells[5][1] = CellKind::PowerDot;
    let mut world = world_with(layout);
    let _ = run_ticks(&mut world, 3);

    let events = run_tick(&mut world);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PowerPelletEaten { score: 50, .. })));
    assert!(events.contains(&Event::Audio {
        cue: AudioCue::PowerPellet
    }));
    assert!(query::player(&world).powered);
    for ghost in query::ghosts(&world).iter() {
        assert_eq!(ghost.mode, GhostMode::Frightened);
        // Spawn heading is Up; the fright reversal flips it.
        assert_eq!(ghost.direction, Direction::Down);
    }
}

#[test]
fn power_up_expiry_forces_frightened_ghosts_to_chase() {
    let mut layout = arena();
    layout.cells[5][1] = CellKind::PowerDot;
    let mut world = world_with(layout);
    let _ = run_ticks(&mut world, 3);
    let _ = run_tick(&mut world);
    assert!(query::player(&world).powered);

    // The timer started at 100 on the pellet tick and counts down once per
    // chase tick.
    let events = run_ticks(&mut world, 100);
    assert!(events.contains(&Event::PowerUpExpired));
    let forced = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::GhostModeChanged {
                    mode: GhostMode::Chase,
                    ..
                }
            )
        })
        .count();
    assert_eq!(forced, 4);
    assert!(!query::player(&world).powered);
    for ghost in query::ghosts(&world).iter() {
        assert_eq!(ghost.mode, GhostMode::Chase);
        // The fright reversal flipped the spawn heading to Down; expiry keeps
        // whatever heading the ghost had instead of reversing a second time.
        assert_eq!(ghost.direction, Direction::Down);
    }
}

#[test]
fn power_up_expiry_returns_scattering_ghosts_to_chase() {
    // Vertical shaft under the corridor: the frightened ghost parks on the
    // dot above the gate, and once caught it retreats through the gate into
    // the house on its own heading, well away from the player.
    let g = CellKind::Gate;
    let p = CellKind::PowerDot;
    let rows = [
        [W, W, W, W, W],
        [W, p, D, D, W],
        [W, W, W, g, W],
        [W, W, W, E, W],
        [W, W, W, W, W],
    ];
    let layout = MazeLayout {
        cells: rows.iter().map(|row| row.to_vec()).collect(),
        player_spawn: TileIndex::new(1, 1),
        ghost_spawns: [
            TileIndex::new(1, 3),
            TileIndex::new(3, 3),
            TileIndex::new(3, 3),
            TileIndex::new(3, 3),
        ],
        home_corners: [TileIndex::new(1, 1); 4],
        house: maze_chase_core::TileRect::new(TileIndex::new(3, 3), TileIndex::new(3, 3)),
        house_entry: TileIndex::new(3, 3),
        house_exit: TileIndex::new(1, 3),
    };
    // Short chase phase, so the revived ghost flips to scatter while the
    // power-up is still running.
    let mut tuning = tuning();
    tuning.chase_duration = 3;
    let mut world = World::new(layout, tuning).expect("shaft layout must validate");
    let _ = run_ticks(&mut world, 3);

    let mut scattered_while_powered = false;
    for _ in 0..150 {
        let events = run_tick(&mut world);
        let blinky = *query::ghosts(&world).get(GhostKind::Blinky);
        if query::player(&world).powered && blinky.mode == GhostMode::Scatter {
            scattered_while_powered = true;
        }
        if events.contains(&Event::PowerUpExpired) {
            assert!(
                scattered_while_powered,
                "revived ghost should have hit its chase threshold while powered"
            );
            for ghost in query::ghosts(&world).iter() {
                assert_eq!(ghost.mode, GhostMode::Chase);
            }
            return;
        }
    }
    panic!("power-up never expired");
}

#[test]
fn power_up_expiry_restores_the_default_velocity() {
    let mut layout = arena();
    layout.cells[5][1] = CellKind::PowerDot;
    // A ghost free to roam the east corridor, so its speed shows up as
    // per-tick displacement.
    layout.ghost_spawns[GhostKind::Blinky.index()] = TileIndex::new(3, 5);
    let mut tuning = tuning();
    tuning.power_up_duration = 6;
    let mut world = World::new(layout, tuning).expect("fixture layout must validate");
    let _ = run_ticks(&mut world, 3);

    let _ = run_tick(&mut world);
    let blinky = *query::ghosts(&world).get(GhostKind::Blinky);
    assert_eq!(blinky.mode, GhostMode::Frightened);
    assert_eq!(blinky.direction, Direction::Down);
    let before = blinky.position;
    let _ = run_tick(&mut world);
    let after = query::ghosts(&world).get(GhostKind::Blinky).position;
    assert_eq!(after.y() - before.y(), 1.0);

    let mut expired = false;
    for _ in 0..10 {
        if run_tick(&mut world).contains(&Event::PowerUpExpired) {
            expired = true;
            break;
        }
    }
    assert!(expired, "power-up should expire within the timer window");

    let blinky = *query::ghosts(&world).get(GhostKind::Blinky);
    assert_eq!(blinky.mode, GhostMode::Chase);
    // Still descending: expiry does not reverse the heading again.
    assert_eq!(blinky.direction, Direction::Down);
    let before = blinky.position;
    let _ = run_tick(&mut world);
    let after = query::ghosts(&world).get(GhostKind::Blinky).position;
    assert_eq!(after.y() - before.y(), 2.0);
}

#[test]
fn mode_timers_oscillate_between_scatter_and_chase() {
    let mut tuning = tuning();
    tuning.scatter_duration = 5;
    tuning.chase_duration = 7;
    let mut world = World::new(arena(), tuning).expect("fixture layout must validate");
    let _ = run_ticks(&mut world, 3);

    let mut flips = Vec::new();
    for tick in 1..=25 {
        let events = run_tick(&mut world);
        for event in &events {
            if let Event::GhostModeChanged {
                ghost: GhostKind::Blinky,
                mode,
            } = event
            {
                flips.push((tick, *mode));
            }
        }
    }
    assert_eq!(
        flips,
        vec![
            (5, GhostMode::Chase),
            (12, GhostMode::Scatter),
            (17, GhostMode::Chase),
            (24, GhostMode::Scatter),
        ]
    );
}

#[test]
fn catching_a_frightened_ghost_scores_and_sends_it_home() {
    let mut layout = arena();
    layout.cells[5][1] = CellKind::PowerDot;
    layout.ghost_spawns[GhostKind::Blinky.index()] = TileIndex::new(5, 2);
    let mut world = world_with(layout);
    let _ = run_ticks(&mut world, 3);

    // Walk right into the frightened ghost parked one tile over.
    let mut caught = false;
    for _ in 0..20 {
        let events = run_tick(&mut world);
        if let Some(event) = events.iter().find_map(|event| match event {
            Event::GhostCaught {
                ghost,
                score,
                multiplier,
            } => Some((*ghost, *score, *multiplier)),
            _ => None,
        }) {
            assert_eq!(event, (GhostKind::Blinky, 50, 1));
            assert!(events.contains(&Event::Audio {
                cue: AudioCue::GhostEaten
            }));
            caught = true;
            break;
        }
    }
    assert!(caught, "frightened ghost should be caught");

    let blinky = *query::ghosts(&world).get(GhostKind::Blinky);
    assert_eq!(blinky.mode, GhostMode::Eaten);
    assert_eq!(query::player(&world).score_multiplier, 2);
    assert_eq!(query::score(&world), 100);

    // The retreat cue fires a fixed number of ticks after the catch.
    let mut fired_after = None;
    for since in 1..=10 {
        let events = run_tick(&mut world);
        if events.contains(&Event::Audio {
            cue: AudioCue::GhostRetreating,
        }) {
            fired_after = Some(since);
            break;
        }
    }
    assert_eq!(fired_after, Some(5));
}

#[test]
fn eaten_ghost_reaching_the_house_rejoins_the_chase() {
    let mut layout = arena();
    layout.cells[5][1] = CellKind::PowerDot;
    layout.ghost_spawns[GhostKind::Blinky.index()] = TileIndex::new(5, 2);
    // Declare the parked ghost's tile part of the house, so the eaten ghost
    // is already home on the tick after the catch.
    layout.house = maze_chase_core::TileRect::new(TileIndex::new(5, 2), TileIndex::new(5, 2));
    layout.house_entry = TileIndex::new(5, 2);
    let mut world = world_with(layout);
    let _ = run_ticks(&mut world, 3);

    let mut caught = false;
    for _ in 0..20 {
        let events = run_tick(&mut world);
        if !caught {
            caught = events
                .iter()
                .any(|event| matches!(event, Event::GhostCaught { .. }));
            continue;
        }
        assert!(events.contains(&Event::GhostModeChanged {
            ghost: GhostKind::Blinky,
            mode: GhostMode::Chase,
        }));
        assert_eq!(
            query::ghosts(&world).get(GhostKind::Blinky).mode,
            GhostMode::Chase
        );
        return;
    }
    panic!("ghost was never caught");
}

#[test]
fn hostile_ghost_contact_plays_out_the_death_sequence() {
    let mut layout = arena();
    layout.ghost_spawns[GhostKind::Blinky.index()] = TileIndex::new(5, 2);
    let mut world = world_with(layout);
    let spawn = query::player(&world).position;
    let _ = run_ticks(&mut world, 3);

    let mut events = Vec::new();
    for _ in 0..20 {
        events.extend(run_tick(&mut world));
        if query::player(&world).lifecycle == PlayerLifecycle::Eaten {
            break;
        }
    }
    assert!(events.contains(&Event::PlayerCaught {
        ghost: GhostKind::Blinky
    }));
    assert!(events.contains(&Event::Audio {
        cue: AudioCue::PlayerDeath
    }));

    // Four death-sequence ticks, then the round resets with one life less.
    let events = run_ticks(&mut world, 4);
    assert!(events.contains(&Event::PlayerDied { lives_left: 2 }));
    let player = query::player(&world);
    assert_eq!(player.lifecycle, PlayerLifecycle::Ready);
    assert_eq!(player.position, spawn);
    assert_eq!(player.lives, 2);
}

#[test]
fn running_out_of_lives_ends_the_game() {
    let mut layout = arena();
    layout.ghost_spawns[GhostKind::Blinky.index()] = TileIndex::new(5, 2);
    let mut world = world_with(layout);

    let events = run_ticks(&mut world, 200);
    let lives_seen: Vec<i32> = events
        .iter()
        .filter_map(|event| match event {
            Event::PlayerDied { lives_left } => Some(*lives_left),
            _ => None,
        })
        .collect();
    assert_eq!(lives_seen, vec![2, 1, 0, -1]);
    // The spawn dot and its neighbor are eaten on the first pass only.
    assert!(events.contains(&Event::GameOver { score: 20 }));
    assert_eq!(query::player(&world).lifecycle, PlayerLifecycle::GameOver);

    // A terminal session ignores further ticks entirely.
    assert!(run_ticks(&mut world, 10).is_empty());
}

#[test]
fn restart_is_honored_only_after_game_over() {
    let mut layout = arena();
    layout.ghost_spawns[GhostKind::Blinky.index()] = TileIndex::new(5, 2);
    let mut world = world_with(layout);

    let mut events = Vec::new();
    apply(&mut world, Command::Restart, &mut events);
    assert!(events.is_empty());

    let _ = run_ticks(&mut world, 200);
    assert_eq!(query::player(&world).lifecycle, PlayerLifecycle::GameOver);

    apply(&mut world, Command::Restart, &mut events);
    assert!(events.contains(&Event::SessionRestarted));
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::player(&world).lives, 3);
    assert_eq!(query::grid(&world).pellets_remaining(), 16);
}

#[test]
fn pause_freezes_time_until_toggled_back() {
    let mut world = world_with(arena());
    let mut events = Vec::new();
    apply(&mut world, Command::TogglePause, &mut events);
    assert_eq!(events, vec![Event::PauseToggled { paused: true }]);
    assert!(query::is_paused(&world));

    assert!(run_ticks(&mut world, 5).is_empty());
    assert_eq!(query::tick_index(&world), 0);

    apply(&mut world, Command::TogglePause, &mut events);
    assert!(!query::is_paused(&world));
    let events = run_tick(&mut world);
    assert!(events.contains(&Event::TimeAdvanced { tick: 1 }));
}

#[test]
fn tunnel_row_wraps_the_player_to_the_far_side() {
    let mut layout = arena();
    layout.cells[5][0] = E;
    layout.cells[5][6] = E;
    let mut world = world_with(layout);
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::SetPlayerDirection {
            direction: Direction::Left,
        },
        &mut events,
    );
    let _ = run_ticks(&mut world, 3);

    for _ in 0..40 {
        let _ = run_tick(&mut world);
        if query::player(&world).tile == TileIndex::new(5, 6) {
            return;
        }
    }
    panic!("player never wrapped through the tunnel");
}

#[test]
fn clearing_the_last_pellet_is_announced_once() {
    let mut layout = arena();
    // Leave dots only on the bottom corridor the player actually walks.
    for row in 1..5 {
        for cell in &mut layout.cells[row] {
            if *cell == D {
                *cell = E;
            }
        }
    }
    let mut world = world_with(layout);
    let _ = run_ticks(&mut world, 3);

    let events = run_ticks(&mut world, 70);
    let cleared = events
        .iter()
        .filter(|event| matches!(event, Event::MazeCleared))
        .count();
    assert_eq!(cleared, 1);
    assert_eq!(query::grid(&world).pellets_remaining(), 0);
    assert_eq!(query::score(&world), 50);
}
