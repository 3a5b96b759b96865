//! Shared fixtures for world integration tests.

// Each integration test binary compiles its own copy of this module and uses
// a different subset of the helpers.
#![allow(dead_code)]

use maze_chase_core::{CellKind, Command, Event, MazeLayout, TileIndex, TileRect, Tuning, WallKind};
use maze_chase_world::{apply, World};

pub const W: CellKind = CellKind::Wall(WallKind::Horizontal);
pub const D: CellKind = CellKind::Dot;
pub const E: CellKind = CellKind::Empty;

/// 7x7 walled arena: a ring corridor of dots around a sealed one-tile ghost
/// house in the middle. All four ghosts spawn inside the sealed house, so
/// they stay put unless a test moves their spawn into the corridor.
///
/// ```text
/// W W W W W W W
/// W D D D D D W
/// W D W W W D W
/// W D W E W D W
/// W D W W W D W
/// W D D D D D W
/// W W W W W W W
/// ```
pub fn arena() -> MazeLayout {
    let rows = [
        [W, W, W, W, W, W, W],
        [W, D, D, D, D, D, W],
        [W, D, W, W, W, D, W],
        [W, D, W, E, W, D, W],
        [W, D, W, W, W, D, W],
        [W, D, D, D, D, D, W],
        [W, W, W, W, W, W, W],
    ];
    MazeLayout {
        cells: rows.iter().map(|row| row.to_vec()).collect(),
        player_spawn: TileIndex::new(5, 1),
        ghost_spawns: [TileIndex::new(3, 3); 4],
        home_corners: [
            TileIndex::new(1, 5),
            TileIndex::new(1, 1),
            TileIndex::new(5, 5),
            TileIndex::new(5, 1),
        ],
        house: TileRect::new(TileIndex::new(3, 3), TileIndex::new(3, 3)),
        house_entry: TileIndex::new(3, 3),
        house_exit: TileIndex::new(1, 3),
    }
}

/// Tuning with short phase timers so tests stay fast, and mode timers long
/// enough that no scatter/chase flip interferes mid-test.
pub fn tuning() -> Tuning {
    Tuning {
        ready_duration: 3,
        death_sequence_duration: 4,
        power_up_duration: 100,
        scatter_duration: 1_000,
        chase_duration: 1_000,
        retreat_cue_delay: 5,
        ..Tuning::default()
    }
}

pub fn world_with(layout: MazeLayout) -> World {
    World::new(layout, tuning()).expect("fixture layout must validate")
}

/// Advances `count` ticks, collecting every emitted event.
pub fn run_ticks(world: &mut World, count: u32) -> Vec<Event> {
    let mut out = Vec::new();
    for _ in 0..count {
        apply(world, Command::Tick, &mut out);
    }
    out
}

/// Advances a single tick, returning just that tick's events.
pub fn run_tick(world: &mut World) -> Vec<Event> {
    run_ticks(world, 1)
}
