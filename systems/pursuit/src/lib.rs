//! Ghost steering policy.
//!
//! The pursuit system is a pure collaborator of the world: it reads
//! tick-boundary snapshots, picks a target point per ghost, and emits
//! [`Command::SteerGhost`] for the heading that gets closest to it. The
//! world remains the sole authority on whether a steer actually executes;
//! this system never mutates anything.
//!
//! Each ghost personality differs only in where it aims while hunting:
//! Blinky goes straight at the player, Pinky leads the player by four tiles,
//! Inky mirrors Blinky around a point ahead of the player, and Clyde gives
//! up the chase whenever it gets close.

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

use std::cmp::Reverse;

use maze_chase_core::{
    Command, Direction, Event, GhostKind, GhostMode, GhostSnapshot, GhostView, MazeChart,
    PlayerLifecycle, PlayerSnapshot, Position,
};

/// Squared tile distance beyond which Clyde hunts the player directly.
/// Closer than this it retreats to its home corner instead.
const CLYDE_RANGE_SQ: i64 = 64;

/// Number of tiles Pinky aims ahead of the player.
const PINKY_LEAD: i32 = 4;

/// Number of tiles ahead of the player used as Inky's reflection point.
const INKY_PIVOT_LEAD: i32 = 2;

/// Emits one steering command per ghost on every advanced tick.
#[derive(Debug, Default)]
pub struct Pursuit;

impl Pursuit {
    /// Creates the steering system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Inspects the events of the last tick and queues steering commands.
    ///
    /// Steering is only produced while the player is actively in the maze;
    /// during Ready, the death sequence, and after game over the ghosts are
    /// not moving and need no guidance.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        ghosts: &GhostView,
        chart: &MazeChart,
        out_commands: &mut Vec<Command>,
    ) {
        if player.lifecycle != PlayerLifecycle::Chase {
            return;
        }
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }
        for ghost in ghosts.iter() {
            let target = target_for(ghost, player, ghosts, chart);
            if let Some(direction) = choose_turn(ghost, target, chart) {
                out_commands.push(Command::SteerGhost {
                    ghost: ghost.kind,
                    direction,
                });
            }
        }
    }
}

/// Point `lead` tiles ahead of the player along its current heading.
///
/// When the player faces up the point is also pulled `lead` tiles to the
/// left, reproducing the classic ambusher overshoot.
fn lead_point(player: &PlayerSnapshot, lead: i32, chart: &MazeChart) -> Position {
    let dx = chart.tile_width * lead as f32;
    let dy = chart.tile_height * lead as f32;
    match player.direction {
        Direction::Left => player.position.offset(-dx, 0.0),
        Direction::Right => player.position.offset(dx, 0.0),
        Direction::Up => player.position.offset(-dx, -dy),
        Direction::Down => player.position.offset(0.0, dy),
    }
}

fn target_for(
    ghost: &GhostSnapshot,
    player: &PlayerSnapshot,
    ghosts: &GhostView,
    chart: &MazeChart,
) -> Position {
    // Leaving the house takes precedence over everything else; until the
    // ghost is out, any other target would steer it into the house walls.
    if chart.house.contains(ghost.tile) {
        return chart.house_exit;
    }
    match ghost.mode {
        GhostMode::Eaten => chart.house_entry,
        GhostMode::Scatter => chart.home_corners[ghost.kind.index()],
        GhostMode::Chase | GhostMode::Frightened => match ghost.kind {
            GhostKind::Blinky => player.position,
            GhostKind::Pinky => lead_point(player, PINKY_LEAD, chart),
            GhostKind::Inky => {
                let pivot = lead_point(player, INKY_PIVOT_LEAD, chart);
                let anchor = ghosts.get(GhostKind::Blinky).position;
                anchor.offset(
                    2.0 * (pivot.x() - anchor.x()),
                    2.0 * (pivot.y() - anchor.y()),
                )
            }
            GhostKind::Clyde => {
                if ghost.tile.distance_squared(player.tile) > CLYDE_RANGE_SQ {
                    player.position
                } else {
                    chart.home_corners[ghost.kind.index()]
                }
            }
        },
    }
}

/// Headings a ghost may consider, ordered by preference for its current
/// heading. Reversals are never candidates; ties in distance resolve to the
/// earlier entry.
const fn candidate_turns(direction: Direction) -> [Direction; 3] {
    match direction {
        Direction::Right => [Direction::Right, Direction::Up, Direction::Down],
        Direction::Left => [Direction::Left, Direction::Up, Direction::Down],
        Direction::Up => [Direction::Right, Direction::Left, Direction::Up],
        Direction::Down => [Direction::Right, Direction::Left, Direction::Down],
    }
}

/// Ranks the candidate headings by squared tile distance from the tile one
/// step ahead to the target tile, and picks the best one the grid permits.
///
/// Frightened ghosts rank in reverse, fleeing the target instead.
fn choose_turn(ghost: &GhostSnapshot, target: Position, chart: &MazeChart) -> Option<Direction> {
    let target_tile = target.tile(chart.tile_width, chart.tile_height);
    let mut ranked: Vec<(i64, Direction)> = candidate_turns(ghost.direction)
        .into_iter()
        .map(|direction| {
            let distance = ghost
                .tile
                .stepped(direction, 1)
                .distance_squared(target_tile);
            (distance, direction)
        })
        .collect();
    if ghost.mode == GhostMode::Frightened {
        ranked.sort_by_key(|&(distance, _)| Reverse(distance));
    } else {
        ranked.sort_by_key(|&(distance, _)| distance);
    }
    ranked
        .into_iter()
        .map(|(_, direction)| direction)
        .find(|&direction| ghost.turns.allows(direction))
}
