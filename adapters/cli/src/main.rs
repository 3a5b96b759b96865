#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Maze Chase sessions.
//!
//! The binary wires the pure pieces together the way a graphical frontend
//! would: ticks go into the world, the events that come back feed the
//! pursuit system and the audio sink, and steering commands flow back in
//! before the next tick.

mod layout;
mod layout_transfer;

use std::{error::Error, fmt};

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use maze_chase_bootstrap::{start_session, welcome_banner};
use maze_chase_core::{Command, Direction, Event, Tuning};
use maze_chase_pursuit::Pursuit;
use maze_chase_rendering::{
    dispatch_audio, Hud, Presentation, RecordingAudioSink, Scene, SpriteCategory,
};
use maze_chase_world::{apply, query, World};

/// Headless Maze Chase runner.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Runs a deterministic maze-chase session")]
struct Args {
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Encoded maze layout to play instead of the built-in maze.
    #[arg(long)]
    layout: Option<String>,
    /// Print the built-in maze as an encoded layout string and exit.
    #[arg(long)]
    export_layout: bool,
    /// Scripted player turns as comma-separated `tick:direction` pairs,
    /// applied just before the named tick.
    #[arg(long)]
    script: Option<String>,
    /// Print the final frame as ASCII art.
    #[arg(long)]
    show_frame: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let built_in = layout::default_layout().context("built-in maze failed to parse")?;
    if args.export_layout {
        println!("{}", layout_transfer::encode(&built_in));
        return Ok(());
    }
    let maze = match &args.layout {
        Some(encoded) => {
            layout_transfer::decode(encoded).context("could not decode --layout")?
        }
        None => built_in,
    };
    let script = match &args.script {
        Some(raw) => parse_script(raw).context("could not parse --script")?,
        None => Vec::new(),
    };

    let tuning = Tuning::default();
    let mut world =
        start_session(maze, tuning).context("the maze configuration was rejected")?;
    println!("{}", welcome_banner());

    let mut pursuit = Pursuit::new();
    let mut sink = RecordingAudioSink::new();
    let mut tally = EventTally::default();
    let mut script = script.into_iter().peekable();
    let mut scratch = Vec::new();
    for tick in 1..=args.ticks {
        while let Some((_, direction)) = script.next_if(|&(at, _)| at <= tick) {
            apply(
                &mut world,
                Command::SetPlayerDirection { direction },
                &mut scratch,
            );
        }

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        let mut commands = Vec::new();
        pursuit.handle(
            &events,
            &query::player(&world),
            &query::ghosts(&world),
            &query::chart(&world),
            &mut commands,
        );
        for command in commands {
            apply(&mut world, command, &mut events);
        }
        dispatch_audio(&events, &mut sink)?;
        tally.absorb(&events);
    }

    if args.show_frame {
        print!("{}", ascii_frame(&world));
    }
    print_summary(&world, &tally, &sink);
    Ok(())
}

/// Counts of the session's notable events.
#[derive(Debug, Default)]
struct EventTally {
    pellets: u32,
    power_pellets: u32,
    ghosts_caught: u32,
    deaths: u32,
    maze_cleared: bool,
    game_over: bool,
}

impl EventTally {
    fn absorb(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PelletEaten { .. } => self.pellets += 1,
                Event::PowerPelletEaten { .. } => self.power_pellets += 1,
                Event::GhostCaught { .. } => self.ghosts_caught += 1,
                Event::PlayerDied { .. } => self.deaths += 1,
                Event::MazeCleared => self.maze_cleared = true,
                Event::GameOver { .. } => self.game_over = true,
                _ => {}
            }
        }
    }
}

fn print_summary(world: &World, tally: &EventTally, sink: &RecordingAudioSink) {
    println!("ticks simulated: {}", query::tick_index(world));
    println!("score: {}", query::score(world));
    println!("lives: {}", query::player(world).lives);
    println!(
        "pellets eaten: {} regular, {} power ({} remaining)",
        tally.pellets,
        tally.power_pellets,
        query::grid(world).pellets_remaining()
    );
    println!("ghosts caught: {}", tally.ghosts_caught);
    println!("deaths: {}", tally.deaths);
    println!("audio cues: {}", sink.cues().len());
    if tally.maze_cleared {
        println!("maze cleared");
    }
    if tally.game_over {
        println!("game over");
    }
}

/// Draws the current frame as one character per tile.
fn ascii_frame(world: &World) -> String {
    let tuning = query::tuning(world);
    let presentation = Presentation::new(Vec2::new(tuning.tile_width, tuning.tile_height));
    let scene = presentation.compose(
        &query::grid(world),
        &query::player(world),
        &query::ghosts(world),
        tuning,
        Hud {
            score: query::score(world),
            lives: query::player(world).lives,
        },
    );
    render_scene(&scene, tuning)
}

fn render_scene(scene: &Scene, tuning: &Tuning) -> String {
    let columns = 1 + scene
        .tiles
        .iter()
        .map(|sprite| sprite.tile.col())
        .max()
        .unwrap_or(0) as usize;
    let rows = 1 + scene
        .tiles
        .iter()
        .map(|sprite| sprite.tile.row())
        .max()
        .unwrap_or(0) as usize;
    let mut canvas = vec![vec![' '; columns]; rows];
    for sprite in &scene.tiles {
        canvas[sprite.tile.row() as usize][sprite.tile.col() as usize] = layout::glyph(sprite.kind);
    }
    for entity in &scene.entities {
        let center_x = entity.top_left.x + tuning.tile_width / 2.0;
        let center_y = entity.top_left.y + tuning.tile_height / 2.0;
        let col = (center_x / tuning.tile_width).floor() as i32;
        let row = (center_y / tuning.tile_height).floor() as i32;
        if row >= 0 && col >= 0 && (row as usize) < rows && (col as usize) < columns {
            canvas[row as usize][col as usize] = entity_glyph(entity.category);
        }
    }

    let mut frame = String::new();
    for row in canvas {
        frame.extend(row);
        frame.push('\n');
    }
    frame.push_str(&format!(
        "score {} | lives {}\n",
        scene.hud.score, scene.hud.lives
    ));
    frame
}

const fn entity_glyph(category: SpriteCategory) -> char {
    match category {
        SpriteCategory::Player => 'C',
        SpriteCategory::PlayerDeath => 'x',
        SpriteCategory::Ghost(kind) => match kind {
            maze_chase_core::GhostKind::Blinky => 'B',
            maze_chase_core::GhostKind::Pinky => 'P',
            maze_chase_core::GhostKind::Inky => 'I',
            maze_chase_core::GhostKind::Clyde => 'K',
        },
        SpriteCategory::Frightened => 'f',
        SpriteCategory::FrightenedBlink => 'F',
        SpriteCategory::Eyes => '"',
    }
}

/// Parses the `--script` argument into tick-ordered direction changes.
fn parse_script(raw: &str) -> Result<Vec<(u64, Direction)>, ScriptError> {
    let mut entries = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (tick, direction) = part
            .split_once(':')
            .ok_or_else(|| ScriptError::InvalidEntry(part.to_owned()))?;
        let tick: u64 = tick
            .trim()
            .parse()
            .map_err(|_| ScriptError::InvalidTick(tick.to_owned()))?;
        let direction = match direction.trim().to_ascii_lowercase().as_str() {
            "up" => Direction::Up,
            "down" => Direction::Down,
            "left" => Direction::Left,
            "right" => Direction::Right,
            other => return Err(ScriptError::InvalidDirection(other.to_owned())),
        };
        if let Some(&(previous, _)) = entries.last() {
            if tick < previous {
                return Err(ScriptError::OutOfOrder(tick));
            }
        }
        entries.push((tick, direction));
    }
    Ok(entries)
}

/// Errors that can occur while parsing the `--script` argument.
#[derive(Debug, PartialEq, Eq)]
enum ScriptError {
    /// An entry was not of the form `tick:direction`.
    InvalidEntry(String),
    /// The tick portion of an entry was not a number.
    InvalidTick(String),
    /// The direction portion of an entry was not a cardinal direction.
    InvalidDirection(String),
    /// An entry's tick was earlier than its predecessor's.
    OutOfOrder(u64),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEntry(entry) => {
                write!(f, "script entry '{entry}' is not of the form tick:direction")
            }
            Self::InvalidTick(tick) => write!(f, "script tick '{tick}' is not a number"),
            Self::InvalidDirection(direction) => {
                write!(f, "script direction '{direction}' is not up, down, left or right")
            }
            Self::OutOfOrder(tick) => {
                write!(f, "script entry for tick {tick} is out of order")
            }
        }
    }
}

impl Error for ScriptError {}
