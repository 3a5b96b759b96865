//! Tile-aligned movement shared by the player and ghosts.
//!
//! Entities travel continuously but may only change heading when their
//! center sits close enough to a tile center, except for reversals which are
//! honored immediately. Lookahead probes are offset by the tuning's fudge
//! factor so a turn opens slightly before the entity reaches the junction.

use maze_chase_core::{CellKind, Direction, Position, TileIndex, Tuning, TurnPermissions};

use crate::grid::TileGrid;

/// Maximum distance from a tile center at which a turn may execute.
pub(crate) const CENTER_EPSILON: f32 = 2.0;

/// Who is asking for turn permissions; controls gate traversal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GatePolicy {
    /// The player never passes through the gate.
    Player,
    /// Ghosts pass upward through the gate; only eaten ghosts pass downward.
    Ghost {
        /// Whether the ghost is currently returning to the house.
        eaten: bool,
    },
}

/// Teleports a position that left the grid extent back in on the far side.
pub(crate) fn wrap_position(position: Position, grid: &TileGrid, tuning: &Tuning) -> Position {
    let extent_x = grid.width() as f32 * tuning.tile_width;
    let extent_y = grid.height() as f32 * tuning.tile_height;
    let mut x = position.x();
    let mut y = position.y();
    if x < 0.0 {
        x += extent_x;
    } else if x >= extent_x {
        x -= extent_x;
    }
    if y < 0.0 {
        y += extent_y;
    } else if y >= extent_y {
        y -= extent_y;
    }
    Position::new(x, y)
}

/// Computes which headings are legal from `position` this tick.
pub(crate) fn turn_permissions(
    position: Position,
    grid: &TileGrid,
    tuning: &Tuning,
    policy: GatePolicy,
) -> TurnPermissions {
    let fudge = tuning.fudge_factor;
    let (tile_w, tile_h) = (tuning.tile_width, tuning.tile_height);
    let row = (position.y() / tile_h).floor() as i32;
    let col = (position.x() / tile_w).floor() as i32;

    let left_probe = TileIndex::new(row, ((position.x() + fudge) / tile_w).floor() as i32 - 1);
    let right_probe = TileIndex::new(row, ((position.x() - fudge) / tile_w).floor() as i32 + 1);
    let up_probe = TileIndex::new(((position.y() + fudge) / tile_h).floor() as i32 - 1, col);
    let down_probe = TileIndex::new(((position.y() - fudge) / tile_h).floor() as i32 + 1, col);

    let ghost = matches!(policy, GatePolicy::Ghost { .. });
    let eaten = matches!(policy, GatePolicy::Ghost { eaten: true });

    let up_kind = grid.kind_wrapped(up_probe);
    let down_kind = grid.kind_wrapped(down_probe);
    TurnPermissions {
        left: grid.kind_wrapped(left_probe).is_passable(),
        right: grid.kind_wrapped(right_probe).is_passable(),
        up: up_kind.is_passable() || (ghost && up_kind == CellKind::Gate),
        down: down_kind.is_passable() || (eaten && down_kind == CellKind::Gate),
    }
}

/// Whether `position` sits close enough to a tile center to turn.
pub(crate) fn is_at_center(position: Position, tuning: &Tuning) -> bool {
    let dx = (position.x() - tuning.tile_width / 2.0).rem_euclid(tuning.tile_width);
    let dy = (position.y() - tuning.tile_height / 2.0).rem_euclid(tuning.tile_height);
    dx < CENTER_EPSILON && dy < CENTER_EPSILON
}

/// Applies a requested heading change if the grid allows it.
///
/// Returns `false` when the requested heading is blocked, in which case the
/// caller should stop re-requesting it. A permitted request is honored
/// immediately for reversals and otherwise deferred until the entity reaches
/// a tile center; either way the request counts as handled.
pub(crate) fn align(
    direction: &mut Direction,
    position: Position,
    turns: TurnPermissions,
    requested: Direction,
    tuning: &Tuning,
) -> bool {
    if !turns.allows(requested) {
        return false;
    }
    if requested == direction.opposite() || is_at_center(position, tuning) {
        *direction = requested;
    }
    true
}

/// Moves one step along `direction`, or snaps to the tile center when the
/// way ahead is blocked.
pub(crate) fn advance(
    position: Position,
    direction: Direction,
    velocity: f32,
    turns: TurnPermissions,
    tuning: &Tuning,
) -> Position {
    if turns.allows(direction) {
        let (dc, dr) = direction.delta();
        position.offset(dc as f32 * velocity, dr as f32 * velocity)
    } else {
        let tile = position.tile(tuning.tile_width, tuning.tile_height);
        Position::tile_center(tile, tuning.tile_width, tuning.tile_height)
    }
}
