//! Authoritative game state for a maze-chase session.
//!
//! The world owns every mutable fact about a running session: the cell grid,
//! the player, the four ghosts, the score, and all timers. External
//! collaborators never mutate it directly; they submit [`Command`] values
//! through [`apply`], observe the resulting [`Event`] stream, and read state
//! back through the [`query`] module. Steering decisions for ghosts arrive
//! as commands too, so the world stays free of pursuit policy.

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

use maze_chase_core::{
    AudioCue, Command, ConfigError, Direction, Event, GhostKind, GhostMode, MazeLayout,
    PlayerLifecycle, Position, TileIndex, Tuning, TurnPermissions,
};

mod grid;
mod motion;

use grid::{Consumed, TileGrid};
use motion::GatePolicy;

/// Points awarded for a regular dot.
const DOT_SCORE: u32 = 10;
/// Points awarded for a power dot.
const POWER_DOT_SCORE: u32 = 50;
/// Base points awarded for catching a frightened ghost, before the
/// multiplier is applied.
const GHOST_SCORE: u32 = 50;
/// Lives the player starts a session with.
const INITIAL_LIVES: i32 = 3;

const NO_TURNS: TurnPermissions = TurnPermissions {
    left: false,
    right: false,
    up: false,
    down: false,
};

#[derive(Clone, Debug)]
struct PlayerEntity {
    position: Position,
    spawn: Position,
    direction: Direction,
    commanded: Direction,
    turns: TurnPermissions,
    lifecycle: PlayerLifecycle,
    lives: i32,
    multiplier: u32,
    powered: bool,
    power_remaining: u32,
    death_counter: u32,
}

impl PlayerEntity {
    fn at_spawn(spawn: Position) -> Self {
        Self {
            position: spawn,
            spawn,
            direction: Direction::Right,
            commanded: Direction::Right,
            turns: NO_TURNS,
            lifecycle: PlayerLifecycle::Ready,
            lives: INITIAL_LIVES,
            multiplier: 1,
            powered: false,
            power_remaining: 0,
            death_counter: 0,
        }
    }

    /// Returns the player to its spawn for a fresh round, keeping lives and
    /// score-related session state intact.
    fn reset_for_round(&mut self) {
        self.position = self.spawn;
        self.direction = Direction::Right;
        self.commanded = Direction::Right;
        self.turns = NO_TURNS;
        self.lifecycle = PlayerLifecycle::Ready;
        self.multiplier = 1;
        self.powered = false;
        self.power_remaining = 0;
        self.death_counter = 0;
    }
}

#[derive(Clone, Debug)]
struct GhostEntity {
    kind: GhostKind,
    position: Position,
    spawn: Position,
    direction: Direction,
    requested: Option<Direction>,
    turns: TurnPermissions,
    mode: GhostMode,
    velocity: f32,
    scatter_counter: u32,
    chase_counter: u32,
}

impl GhostEntity {
    fn at_spawn(kind: GhostKind, spawn: Position, velocity: f32) -> Self {
        Self {
            kind,
            position: spawn,
            spawn,
            direction: Direction::Up,
            requested: None,
            turns: NO_TURNS,
            mode: GhostMode::Scatter,
            velocity,
            scatter_counter: 0,
            chase_counter: 0,
        }
    }

    fn reset_for_round(&mut self, velocity: f32) {
        self.position = self.spawn;
        self.direction = Direction::Up;
        self.requested = None;
        self.turns = NO_TURNS;
        self.mode = GhostMode::Scatter;
        self.velocity = velocity;
        self.scatter_counter = 0;
        self.chase_counter = 0;
    }
}

/// Audio cues scheduled to fire at a later tick.
#[derive(Clone, Debug, Default)]
struct CueScheduler {
    pending: Vec<(u64, AudioCue)>,
}

impl CueScheduler {
    fn schedule(&mut self, deadline_tick: u64, cue: AudioCue) {
        self.pending.push((deadline_tick, cue));
    }

    /// Removes and returns every cue whose deadline has been reached, in
    /// scheduling order.
    fn due(&mut self, tick: u64) -> Vec<AudioCue> {
        let mut fired = Vec::new();
        self.pending.retain(|&(deadline, cue)| {
            if deadline <= tick {
                fired.push(cue);
                false
            } else {
                true
            }
        });
        fired
    }
}

/// Complete state of one maze-chase session.
#[derive(Clone, Debug)]
pub struct World {
    layout: MazeLayout,
    tuning: Tuning,
    grid: TileGrid,
    player: PlayerEntity,
    ghosts: [GhostEntity; 4],
    score: u32,
    paused: bool,
    tick_index: u64,
    ready_counter: u32,
    cues: CueScheduler,
    maze_cleared: bool,
}

impl World {
    /// Validates the configuration and constructs a fresh session.
    ///
    /// This is the only fallible call in the engine; once a world exists,
    /// every command resolves deterministically without error.
    pub fn new(layout: MazeLayout, tuning: Tuning) -> Result<Self, ConfigError> {
        layout.validate(&tuning)?;
        Ok(Self::from_validated(layout, tuning))
    }

    fn from_validated(layout: MazeLayout, tuning: Tuning) -> Self {
        let grid = TileGrid::from_layout(&layout);
        let center = |tile: TileIndex| Position::tile_center(tile, tuning.tile_width, tuning.tile_height);
        let player = PlayerEntity::at_spawn(center(layout.player_spawn));
        let ghosts = GhostKind::ALL.map(|kind| {
            GhostEntity::at_spawn(
                kind,
                center(layout.ghost_spawns[kind.index()]),
                tuning.default_velocity,
            )
        });
        Self {
            layout,
            tuning,
            grid,
            player,
            ghosts,
            score: 0,
            paused: false,
            tick_index: 0,
            ready_counter: 0,
            cues: CueScheduler::default(),
            maze_cleared: false,
        }
    }

    fn tile_of(&self, position: Position) -> TileIndex {
        position.tile(self.tuning.tile_width, self.tuning.tile_height)
    }
}

/// Applies a single command to the world, appending resulting events.
///
/// Commands that make no sense in the current state (a restart mid-round, a
/// tick while paused) are ignored rather than treated as errors.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => tick(world, out_events),
        Command::SetPlayerDirection { direction } => {
            world.player.commanded = direction;
        }
        Command::SteerGhost { ghost, direction } => {
            world.ghosts[ghost.index()].requested = Some(direction);
        }
        Command::TogglePause => {
            if world.player.lifecycle != PlayerLifecycle::GameOver {
                world.paused = !world.paused;
                out_events.push(Event::PauseToggled {
                    paused: world.paused,
                });
            }
        }
        Command::Restart => {
            if world.player.lifecycle == PlayerLifecycle::GameOver {
                *world = World::from_validated(world.layout.clone(), world.tuning);
                out_events.push(Event::SessionRestarted);
            }
        }
    }
}

fn tick(world: &mut World, out: &mut Vec<Event>) {
    if world.paused || world.player.lifecycle == PlayerLifecycle::GameOver {
        return;
    }
    world.tick_index += 1;
    out.push(Event::TimeAdvanced {
        tick: world.tick_index,
    });
    for cue in world.cues.due(world.tick_index) {
        out.push(Event::Audio { cue });
    }
    match world.player.lifecycle {
        PlayerLifecycle::Ready => tick_ready(world, out),
        PlayerLifecycle::Chase => tick_chase(world, out),
        PlayerLifecycle::Eaten => tick_death(world, out),
        PlayerLifecycle::GameOver => {}
    }
}

fn tick_ready(world: &mut World, out: &mut Vec<Event>) {
    world.ready_counter += 1;
    if world.ready_counter >= world.tuning.ready_duration {
        world.ready_counter = 0;
        world.player.lifecycle = PlayerLifecycle::Chase;
        out.push(Event::RoundStarted);
    }
}

fn tick_chase(world: &mut World, out: &mut Vec<Event>) {
    tick_power_timer(world, out);
    move_player(world);
    eat(world, out);
    tick_ghosts(world, out);
    resolve_collisions(world, out);
}

fn tick_power_timer(world: &mut World, out: &mut Vec<Event>) {
    if !world.player.powered {
        return;
    }
    world.player.power_remaining -= 1;
    if world.player.power_remaining > 0 {
        return;
    }
    world.player.powered = false;
    world.player.multiplier = 1;
    out.push(Event::PowerUpExpired);
    for ghost in &mut world.ghosts {
        // Eaten ghosts keep retreating; everyone else rejoins the chase,
        // including ghosts whose mode timer flipped them to scatter while
        // the power-up was active.
        if ghost.mode == GhostMode::Eaten || ghost.mode == GhostMode::Chase {
            continue;
        }
        ghost.mode = GhostMode::Chase;
        ghost.velocity = world.tuning.default_velocity;
        out.push(Event::GhostModeChanged {
            ghost: ghost.kind,
            mode: GhostMode::Chase,
        });
    }
}

fn move_player(world: &mut World) {
    let World {
        tuning,
        grid,
        player,
        ..
    } = world;
    player.position = motion::wrap_position(player.position, grid, tuning);
    player.turns = motion::turn_permissions(player.position, grid, tuning, GatePolicy::Player);
    let turned = motion::align(
        &mut player.direction,
        player.position,
        player.turns,
        player.commanded,
        tuning,
    );
    if !turned {
        // The request is not executable here; stop re-asking for it.
        player.commanded = player.direction;
    }
    player.position = motion::advance(
        player.position,
        player.direction,
        tuning.default_velocity,
        player.turns,
        tuning,
    );
}

fn eat(world: &mut World, out: &mut Vec<Event>) {
    let tile = world.tile_of(world.player.position);
    match world.grid.consume_at(tile) {
        Consumed::Nothing => {}
        Consumed::Dot => {
            world.score += DOT_SCORE;
            out.push(Event::PelletEaten {
                tile,
                score: DOT_SCORE,
            });
            out.push(Event::Audio {
                cue: AudioCue::Munch,
            });
        }
        Consumed::PowerDot => {
            world.score += POWER_DOT_SCORE;
            out.push(Event::PowerPelletEaten {
                tile,
                score: POWER_DOT_SCORE,
            });
            out.push(Event::Audio {
                cue: AudioCue::PowerPellet,
            });
            world.player.powered = true;
            world.player.power_remaining = world.tuning.power_up_duration;
            frighten_ghosts(world, out);
        }
    }
    if world.grid.pellets_remaining() == 0 && !world.maze_cleared {
        world.maze_cleared = true;
        out.push(Event::MazeCleared);
    }
}

fn frighten_ghosts(world: &mut World, out: &mut Vec<Event>) {
    for ghost in &mut world.ghosts {
        if ghost.mode == GhostMode::Eaten {
            continue;
        }
        ghost.direction = ghost.direction.opposite();
        ghost.requested = None;
        ghost.mode = GhostMode::Frightened;
        ghost.velocity = world.tuning.slow_velocity;
        out.push(Event::GhostModeChanged {
            ghost: ghost.kind,
            mode: GhostMode::Frightened,
        });
    }
}

fn tick_ghosts(world: &mut World, out: &mut Vec<Event>) {
    let World {
        layout,
        tuning,
        grid,
        ghosts,
        ..
    } = world;
    for ghost in ghosts.iter_mut() {
        let tile = ghost
            .position
            .tile(tuning.tile_width, tuning.tile_height);
        if ghost.mode == GhostMode::Eaten && layout.house.contains(tile) {
            ghost.mode = GhostMode::Chase;
            ghost.velocity = tuning.default_velocity;
            out.push(Event::GhostModeChanged {
                ghost: ghost.kind,
                mode: GhostMode::Chase,
            });
        }
        match ghost.mode {
            GhostMode::Scatter => {
                ghost.scatter_counter += 1;
                if ghost.scatter_counter >= tuning.scatter_duration {
                    ghost.scatter_counter = 0;
                    ghost.mode = GhostMode::Chase;
                    ghost.velocity = tuning.default_velocity;
                    out.push(Event::GhostModeChanged {
                        ghost: ghost.kind,
                        mode: GhostMode::Chase,
                    });
                }
            }
            GhostMode::Chase => {
                ghost.chase_counter += 1;
                if ghost.chase_counter >= tuning.chase_duration {
                    ghost.chase_counter = 0;
                    ghost.mode = GhostMode::Scatter;
                    ghost.velocity = tuning.default_velocity;
                    out.push(Event::GhostModeChanged {
                        ghost: ghost.kind,
                        mode: GhostMode::Scatter,
                    });
                }
            }
            GhostMode::Frightened | GhostMode::Eaten => {}
        }

        ghost.position = motion::wrap_position(ghost.position, grid, tuning);
        ghost.turns = motion::turn_permissions(
            ghost.position,
            grid,
            tuning,
            GatePolicy::Ghost {
                eaten: ghost.mode == GhostMode::Eaten,
            },
        );
        if let Some(requested) = ghost.requested.take() {
            let _ = motion::align(
                &mut ghost.direction,
                ghost.position,
                ghost.turns,
                requested,
                tuning,
            );
        }
        ghost.position = motion::advance(
            ghost.position,
            ghost.direction,
            ghost.velocity,
            ghost.turns,
            tuning,
        );
    }
}

fn resolve_collisions(world: &mut World, out: &mut Vec<Event>) {
    let World {
        tuning,
        player,
        ghosts,
        score,
        cues,
        tick_index,
        ..
    } = world;
    let threshold = tuning.fudge_factor;
    for ghost in ghosts.iter_mut() {
        let dx = (ghost.position.x() - player.position.x()).abs();
        let dy = (ghost.position.y() - player.position.y()).abs();
        if dx >= threshold || dy >= threshold {
            continue;
        }
        match ghost.mode {
            GhostMode::Frightened => {
                let award = GHOST_SCORE * player.multiplier;
                *score += award;
                out.push(Event::GhostCaught {
                    ghost: ghost.kind,
                    score: award,
                    multiplier: player.multiplier,
                });
                player.multiplier += 1;
                ghost.mode = GhostMode::Eaten;
                ghost.velocity = tuning.fast_velocity;
                out.push(Event::GhostModeChanged {
                    ghost: ghost.kind,
                    mode: GhostMode::Eaten,
                });
                out.push(Event::Audio {
                    cue: AudioCue::GhostEaten,
                });
                cues.schedule(
                    *tick_index + u64::from(tuning.retreat_cue_delay),
                    AudioCue::GhostRetreating,
                );
            }
            GhostMode::Scatter | GhostMode::Chase => {
                if player.lifecycle == PlayerLifecycle::Chase {
                    player.lifecycle = PlayerLifecycle::Eaten;
                    out.push(Event::PlayerCaught { ghost: ghost.kind });
                    out.push(Event::Audio {
                        cue: AudioCue::PlayerDeath,
                    });
                }
            }
            GhostMode::Eaten => {}
        }
    }
}

fn tick_death(world: &mut World, out: &mut Vec<Event>) {
    world.player.death_counter += 1;
    if world.player.death_counter < world.tuning.death_sequence_duration {
        return;
    }
    world.player.death_counter = 0;
    world.player.lives -= 1;
    out.push(Event::PlayerDied {
        lives_left: world.player.lives,
    });
    if world.player.lives < 0 {
        world.player.lifecycle = PlayerLifecycle::GameOver;
        out.push(Event::GameOver { score: world.score });
    } else {
        world.player.reset_for_round();
        for ghost in &mut world.ghosts {
            ghost.reset_for_round(world.tuning.default_velocity);
        }
    }
}

/// Read-only access to world state for systems and adapters.
pub mod query {
    use maze_chase_core::{
        GhostKind, GhostSnapshot, GhostView, GridView, MazeChart, PlayerSnapshot, Position,
        Tuning,
    };

    use crate::World;

    /// Index of the most recently completed tick.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Session score accumulated so far.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Whether the session is currently paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Tuning parameters the session was built with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Snapshot of the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.position,
            tile: world.tile_of(player.position),
            direction: player.direction,
            commanded: player.commanded,
            lifecycle: player.lifecycle,
            lives: player.lives,
            score_multiplier: player.multiplier,
            powered: player.powered,
            power_remaining: player.power_remaining,
            turns: player.turns,
        }
    }

    /// Snapshot of all four ghosts in canonical order.
    #[must_use]
    pub fn ghosts(world: &World) -> GhostView {
        GhostView::new(GhostKind::ALL.map(|kind| {
            let ghost = &world.ghosts[kind.index()];
            GhostSnapshot {
                kind,
                position: ghost.position,
                tile: world.tile_of(ghost.position),
                direction: ghost.direction,
                mode: ghost.mode,
                turns: ghost.turns,
            }
        }))
    }

    /// View of the maze cells and remaining pellets.
    #[must_use]
    pub fn grid(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Fixed navigation landmarks derived from the layout.
    #[must_use]
    pub fn chart(world: &World) -> MazeChart {
        let tuning = &world.tuning;
        let center =
            |tile| Position::tile_center(tile, tuning.tile_width, tuning.tile_height);
        MazeChart {
            tile_width: tuning.tile_width,
            tile_height: tuning.tile_height,
            home_corners: world.layout.home_corners.map(center),
            house: world.layout.house,
            house_entry: center(world.layout.house_entry),
            house_exit: center(world.layout.house_exit),
        }
    }
}
