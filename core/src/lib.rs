#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! adapters to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Cardinal movement directions available to maze entities.
///
/// Screen coordinates: row 0 is the top of the maze, so [`Direction::Up`]
/// decreases y and [`Direction::Down`] increases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// The exact reverse of this direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit tile offset of this direction as `(column delta, row delta)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discrete maze tile addressed by row and column.
///
/// Indices are signed so that lookahead arithmetic near the maze border can
/// produce out-of-range values; grid queries treat those as not passable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileIndex {
    row: i32,
    col: i32,
}

impl TileIndex {
    /// Creates a new tile index.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Tile reached by stepping `steps` tiles in `direction`.
    #[must_use]
    pub const fn stepped(self, direction: Direction, steps: i32) -> Self {
        let (dc, dr) = direction.delta();
        Self {
            row: self.row + dr * steps,
            col: self.col + dc * steps,
        }
    }

    /// Squared Euclidean distance to another tile, measured in tiles.
    #[must_use]
    pub fn distance_squared(self, other: TileIndex) -> i64 {
        let dr = i64::from(self.row - other.row);
        let dc = i64::from(self.col - other.col);
        dr * dr + dc * dc
    }
}

/// Continuous sub-tile location of an entity's center in screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from screen coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal screen coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical screen coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Position displaced by the provided screen-space deltas.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Tile containing this position for the provided tile dimensions.
    #[must_use]
    pub fn tile(self, tile_width: f32, tile_height: f32) -> TileIndex {
        TileIndex::new(
            (self.y / tile_height).floor() as i32,
            (self.x / tile_width).floor() as i32,
        )
    }

    /// Center of the provided tile for the provided tile dimensions.
    #[must_use]
    pub fn tile_center(tile: TileIndex, tile_width: f32, tile_height: f32) -> Self {
        Self {
            x: tile.col() as f32 * tile_width + tile_width / 2.0,
            y: tile.row() as f32 * tile_height + tile_height / 2.0,
        }
    }
}

/// Orientation or corner shape of a wall segment.
///
/// The distinction only matters to renderers; every wall kind blocks
/// traversal identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    /// Segment drawn along the vertical tile axis.
    Vertical,
    /// Segment drawn along the horizontal tile axis.
    Horizontal,
    /// Quarter arc opening toward the lower left.
    TopRight,
    /// Quarter arc opening toward the lower right.
    TopLeft,
    /// Quarter arc opening toward the upper right.
    BottomLeft,
    /// Quarter arc opening toward the upper left.
    BottomRight,
}

/// Kind of content occupying a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Traversable cell with nothing to collect.
    Empty,
    /// Traversable cell holding a regular pellet.
    Dot,
    /// Traversable cell holding a power pellet.
    PowerDot,
    /// Impassable wall segment.
    Wall(WallKind),
    /// Ghost-house door; passable only under the gate rules in the world.
    Gate,
}

impl CellKind {
    /// Whether entities may traverse this cell under the default rules.
    ///
    /// Gates are not passable here; the world layers the ghost-specific gate
    /// exceptions on top of this predicate.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Empty | Self::Dot | Self::PowerDot)
    }
}

/// The four ghost personalities, each with a distinct pursuit strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostKind {
    /// Direct chaser; targets the player's position.
    Blinky,
    /// Ambusher; targets four tiles ahead of the player.
    Pinky,
    /// Pincer; reflects Blinky through a point two tiles ahead of the player.
    Inky,
    /// Coward; chases from afar but retreats to its corner when close.
    Clyde,
}

impl GhostKind {
    /// All ghost kinds in their canonical order.
    pub const ALL: [Self; 4] = [Self::Blinky, Self::Pinky, Self::Inky, Self::Clyde];

    /// Stable index of this kind within [`GhostKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Blinky => 0,
            Self::Pinky => 1,
            Self::Inky => 2,
            Self::Clyde => 3,
        }
    }
}

/// Behavioral mode of a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GhostMode {
    /// Heading to its fixed home corner, temporarily non-aggressive.
    Scatter,
    /// Actively pursuing the player.
    Chase,
    /// Fleeing after a power pellet; vulnerable to being eaten.
    Frightened,
    /// Eaten while frightened; returning to the ghost house.
    Eaten,
}

/// Lifecycle state of the player within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerLifecycle {
    /// Held stationary before the round begins.
    Ready,
    /// Actively navigating the maze.
    Chase,
    /// Caught by a ghost; playing out the death sequence.
    Eaten,
    /// All lives spent; the session is terminal until restarted.
    GameOver,
}

/// Per-tick turn legality flags derived from grid lookahead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnPermissions {
    /// Whether a turn toward decreasing columns is currently legal.
    pub left: bool,
    /// Whether a turn toward increasing columns is currently legal.
    pub right: bool,
    /// Whether a turn toward decreasing rows is currently legal.
    pub up: bool,
    /// Whether a turn toward increasing rows is currently legal.
    pub down: bool,
}

impl TurnPermissions {
    /// Whether movement in the provided direction is currently legal.
    #[must_use]
    pub const fn allows(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by exactly one tick.
    Tick,
    /// Records the player's commanded direction for upcoming ticks.
    SetPlayerDirection {
        /// Direction the player wants to travel.
        direction: Direction,
    },
    /// Records the steering decision for one ghost for the upcoming tick.
    SteerGhost {
        /// Ghost the decision applies to.
        ghost: GhostKind,
        /// Direction the ghost should attempt to travel.
        direction: Direction,
    },
    /// Toggles the paused state of the session.
    TogglePause,
    /// Rebuilds the session from its pristine layout. Honored only while the
    /// session is at game over; a no-op otherwise.
    Restart,
}

/// Discrete sound triggers consumed by an external audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// A regular pellet was eaten.
    Munch,
    /// A power pellet was eaten.
    PowerPellet,
    /// A frightened ghost was caught by the player.
    GhostEaten,
    /// The player was caught by a hostile ghost.
    PlayerDeath,
    /// An eaten ghost is retreating to the house; fired on a cosmetic delay
    /// after [`AudioCue::GhostEaten`].
    GhostRetreating,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The simulation clock advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// The ready countdown elapsed and the round is live.
    RoundStarted,
    /// The player consumed a regular pellet.
    PelletEaten {
        /// Tile the pellet occupied.
        tile: TileIndex,
        /// Session score after the award.
        score: u32,
    },
    /// The player consumed a power pellet.
    PowerPelletEaten {
        /// Tile the pellet occupied.
        tile: TileIndex,
        /// Session score after the award.
        score: u32,
    },
    /// A ghost transitioned to a new behavioral mode.
    GhostModeChanged {
        /// Ghost whose mode changed.
        ghost: GhostKind,
        /// Mode that became active.
        mode: GhostMode,
    },
    /// A frightened ghost was caught by the player.
    GhostCaught {
        /// Ghost that was caught.
        ghost: GhostKind,
        /// Session score after the award.
        score: u32,
        /// Score multiplier that applied to this catch.
        multiplier: u32,
    },
    /// A hostile ghost caught the player.
    PlayerCaught {
        /// Ghost responsible for the catch.
        ghost: GhostKind,
    },
    /// The death sequence finished and a life was deducted.
    PlayerDied {
        /// Lives remaining after the deduction; `-1` means game over.
        lives_left: i32,
    },
    /// The session reached its terminal state.
    GameOver {
        /// Final session score.
        score: u32,
    },
    /// The power-up timer expired.
    PowerUpExpired,
    /// The last pellet was consumed.
    MazeCleared,
    /// The paused state of the session flipped.
    PauseToggled {
        /// Paused state after the toggle.
        paused: bool,
    },
    /// The session was rebuilt from its pristine layout.
    SessionRestarted,
    /// A sound trigger for the audio collaborator.
    Audio {
        /// Cue to play.
        cue: AudioCue,
    },
}

/// Tuning constants supplied by the level provider.
///
/// Durations are measured in ticks; velocities and dimensions in screen
/// units. The driver decides how ticks map to wall-clock time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Movement speed while in Scatter or Chase, units per tick.
    pub default_velocity: f32,
    /// Movement speed while Frightened, units per tick.
    pub slow_velocity: f32,
    /// Movement speed while Eaten, units per tick.
    pub fast_velocity: f32,
    /// Horizontal extent of a single tile.
    pub tile_width: f32,
    /// Vertical extent of a single tile.
    pub tile_height: f32,
    /// Ticks a ghost stays in Scatter before flipping to Chase.
    pub scatter_duration: u32,
    /// Ticks of accumulated Chase before flipping back to Scatter.
    pub chase_duration: u32,
    /// Ticks the power-up stays active after a power pellet.
    pub power_up_duration: u32,
    /// Remaining power-up ticks below which frightened ghosts blink.
    pub frightened_blink_threshold: u32,
    /// Sub-tile tolerance used for turn lookahead and collision proximity.
    pub fudge_factor: f32,
    /// Ticks the player is held in Ready before the round starts.
    pub ready_duration: u32,
    /// Ticks the death sequence plays before the player resets.
    pub death_sequence_duration: u32,
    /// Ticks between a ghost being eaten and its retreating cue.
    pub retreat_cue_delay: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            default_velocity: 2.0,
            slow_velocity: 1.0,
            fast_velocity: 5.0,
            tile_width: 30.0,
            tile_height: 30.0,
            scatter_duration: 300,
            chase_duration: 900,
            power_up_duration: 450,
            frightened_blink_threshold: 180,
            fudge_factor: 10.0,
            ready_duration: 90,
            death_sequence_duration: 150,
            retreat_cue_delay: 30,
        }
    }
}

/// Inclusive rectangular region of tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    min: TileIndex,
    max: TileIndex,
}

impl TileRect {
    /// Creates a rectangle spanning `min` through `max`, both inclusive.
    #[must_use]
    pub const fn new(min: TileIndex, max: TileIndex) -> Self {
        Self { min, max }
    }

    /// Upper-left corner of the region.
    #[must_use]
    pub const fn min(&self) -> TileIndex {
        self.min
    }

    /// Lower-right corner of the region.
    #[must_use]
    pub const fn max(&self) -> TileIndex {
        self.max
    }

    /// Whether the region contains the provided tile.
    #[must_use]
    pub const fn contains(&self, tile: TileIndex) -> bool {
        tile.row() >= self.min.row()
            && tile.row() <= self.max.row()
            && tile.col() >= self.min.col()
            && tile.col() <= self.max.col()
    }
}

/// Static maze description supplied by the level provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeLayout {
    /// Cell kinds in row-major order; every row must have equal length.
    pub cells: Vec<Vec<CellKind>>,
    /// Tile the player spawns on.
    pub player_spawn: TileIndex,
    /// Spawn tile per ghost, indexed by [`GhostKind::index`].
    pub ghost_spawns: [TileIndex; 4],
    /// Fixed scatter-target corner per ghost, indexed by [`GhostKind::index`].
    pub home_corners: [TileIndex; 4],
    /// Bounding region of the ghost house.
    pub house: TileRect,
    /// Tile eaten ghosts return to inside the house.
    pub house_entry: TileIndex,
    /// Tile ghosts head for when escaping the house.
    pub house_exit: TileIndex,
}

impl MazeLayout {
    /// Number of tile rows in the maze.
    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Number of tile columns in the maze.
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Checks the layout and tuning for construction-time defects.
    ///
    /// This is the only fallible entry point of the engine; every gameplay
    /// edge case past construction resolves deterministically in place.
    pub fn validate(&self, tuning: &Tuning) -> Result<(), ConfigError> {
        if self.cells.is_empty() || self.width() == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        let width = self.width();
        for (row, cells) in self.cells.iter().enumerate() {
            if cells.len() != width {
                return Err(ConfigError::RaggedGrid { row });
            }
        }

        self.check_tile("player spawn", self.player_spawn)?;
        self.check_tile("ghost house entry", self.house_entry)?;
        self.check_tile("ghost house exit", self.house_exit)?;
        self.check_tile("ghost house region", self.house.min())?;
        self.check_tile("ghost house region", self.house.max())?;
        for tile in self.ghost_spawns {
            self.check_tile("ghost spawn", tile)?;
        }
        for tile in self.home_corners {
            self.check_tile("home corner", tile)?;
        }

        for (field, value) in [
            ("default_velocity", tuning.default_velocity),
            ("slow_velocity", tuning.slow_velocity),
            ("fast_velocity", tuning.fast_velocity),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveVelocity { field });
            }
        }
        for (field, value) in [
            ("tile_width", tuning.tile_width),
            ("tile_height", tuning.tile_height),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveTileSize { field });
            }
        }
        for (field, value) in [
            ("scatter_duration", tuning.scatter_duration),
            ("chase_duration", tuning.chase_duration),
            ("power_up_duration", tuning.power_up_duration),
            ("ready_duration", tuning.ready_duration),
            ("death_sequence_duration", tuning.death_sequence_duration),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDuration { field });
            }
        }

        Ok(())
    }

    fn check_tile(&self, context: &'static str, tile: TileIndex) -> Result<(), ConfigError> {
        let in_bounds = tile.row() >= 0
            && tile.col() >= 0
            && (tile.row() as usize) < self.height()
            && (tile.col() as usize) < self.width();
        if in_bounds {
            Ok(())
        } else {
            Err(ConfigError::TileOutOfBounds { context, tile })
        }
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Continuous center position of the player.
    pub position: Position,
    /// Tile currently containing the player's center.
    pub tile: TileIndex,
    /// Direction the player is currently traveling.
    pub direction: Direction,
    /// Direction most recently commanded by the input source.
    pub commanded: Direction,
    /// Lifecycle state of the player.
    pub lifecycle: PlayerLifecycle,
    /// Lives remaining; `-1` once the session is over.
    pub lives: i32,
    /// Multiplier applied to the next frightened-ghost catch.
    pub score_multiplier: u32,
    /// Whether a power-up is currently active.
    pub powered: bool,
    /// Ticks of power-up remaining; zero when inactive.
    pub power_remaining: u32,
    /// Turn legality computed on the most recent tick.
    pub turns: TurnPermissions,
}

/// Immutable representation of a single ghost's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostSnapshot {
    /// Which of the four ghosts this is.
    pub kind: GhostKind,
    /// Continuous center position of the ghost.
    pub position: Position,
    /// Tile currently containing the ghost's center.
    pub tile: TileIndex,
    /// Direction the ghost is currently traveling.
    pub direction: Direction,
    /// Behavioral mode of the ghost.
    pub mode: GhostMode,
    /// Turn legality computed on the most recent tick.
    pub turns: TurnPermissions,
}

/// Read-only snapshot describing all four ghosts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostView {
    snapshots: [GhostSnapshot; 4],
}

impl GhostView {
    /// Creates a view from per-ghost snapshots ordered by [`GhostKind::index`].
    #[must_use]
    pub const fn new(snapshots: [GhostSnapshot; 4]) -> Self {
        Self { snapshots }
    }

    /// Snapshot of the requested ghost.
    #[must_use]
    pub const fn get(&self, kind: GhostKind) -> &GhostSnapshot {
        &self.snapshots[kind.index()]
    }

    /// Iterator over the snapshots in canonical ghost order.
    pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
        self.snapshots.iter()
    }
}

/// Read-only view into the maze cell grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [CellKind],
    width: usize,
    height: usize,
    pellets_remaining: usize,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided row-major cell slice.
    #[must_use]
    pub const fn new(
        cells: &'a [CellKind],
        width: usize,
        height: usize,
        pellets_remaining: usize,
    ) -> Self {
        Self {
            cells,
            width,
            height,
            pellets_remaining,
        }
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Pellets (regular and power) still waiting to be eaten.
    #[must_use]
    pub const fn pellets_remaining(&self) -> usize {
        self.pellets_remaining
    }

    /// Kind of the cell at the provided tile, if it lies within the grid.
    #[must_use]
    pub fn kind_at(&self, tile: TileIndex) -> Option<CellKind> {
        if tile.row() < 0 || tile.col() < 0 {
            return None;
        }
        let (row, col) = (tile.row() as usize, tile.col() as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    /// Whether the cell at the provided tile may be traversed.
    ///
    /// Out-of-bounds queries answer `false` (fail-closed) rather than
    /// propagating an error.
    #[must_use]
    pub fn passable(&self, tile: TileIndex) -> bool {
        self.kind_at(tile).is_some_and(CellKind::is_passable)
    }
}

/// Fixed navigation landmarks the pursuit system steers by.
///
/// Positions are continuous tile centers derived from the layout at session
/// construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MazeChart {
    /// Horizontal extent of a single tile.
    pub tile_width: f32,
    /// Vertical extent of a single tile.
    pub tile_height: f32,
    /// Scatter-target corner per ghost, indexed by [`GhostKind::index`].
    pub home_corners: [Position; 4],
    /// Bounding region of the ghost house.
    pub house: TileRect,
    /// Point eaten ghosts return to inside the house.
    pub house_entry: Position,
    /// Point ghosts head for when escaping the house.
    pub house_exit: Position,
}

/// Configuration defects detected while constructing a session.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The layout grid has no rows or no columns.
    EmptyGrid,
    /// A row's length differs from the first row's length.
    RaggedGrid {
        /// Index of the offending row.
        row: usize,
    },
    /// A fixed coordinate lies outside the grid.
    TileOutOfBounds {
        /// Which coordinate was out of range.
        context: &'static str,
        /// The offending tile.
        tile: TileIndex,
    },
    /// A velocity field is zero, negative, or not a number.
    NonPositiveVelocity {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A tile dimension is zero, negative, or not a number.
    NonPositiveTileSize {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A duration that must be at least one tick is zero.
    ZeroDuration {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "maze layout has no cells"),
            Self::RaggedGrid { row } => {
                write!(f, "maze row {row} differs in length from the first row")
            }
            Self::TileOutOfBounds { context, tile } => write!(
                f,
                "{context} ({}, {}) lies outside the maze",
                tile.row(),
                tile.col()
            ),
            Self::NonPositiveVelocity { field } => {
                write!(f, "tuning field {field} must be a positive velocity")
            }
            Self::NonPositiveTileSize { field } => {
                write!(f, "tuning field {field} must be a positive dimension")
            }
            Self::ZeroDuration { field } => {
                write!(f, "tuning field {field} must be at least one tick")
            }
        }
    }
}

impl Error for ConfigError {}
