#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Maze Chase adapters.
//!
//! Frontends never read the world directly; they hand tick-boundary
//! snapshots to [`Presentation::compose`] and draw the resulting [`Scene`].
//! Audio goes the same way: adapters implement [`AudioSink`] and feed it the
//! cues carried by the event stream.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_chase_core::{
    AudioCue, CellKind, Direction, Event, GhostKind, GhostMode, GhostView, GridView,
    PlayerLifecycle, PlayerSnapshot, TileIndex, Tuning,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Visual identity of an entity sprite within a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteCategory {
    /// The player while alive.
    Player,
    /// The player during the death sequence.
    PlayerDeath,
    /// A ghost in its regular colors.
    Ghost(GhostKind),
    /// A frightened ghost in its vulnerable colors.
    Frightened,
    /// A frightened ghost in the warning flash near power-up expiry.
    FrightenedBlink,
    /// The disembodied eyes of an eaten ghost heading home.
    Eyes,
}

impl SpriteCategory {
    /// Base fill color frontends use for this category.
    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Self::Player | Self::PlayerDeath => Color::from_rgb_u8(255, 255, 0),
            Self::Ghost(GhostKind::Blinky) => Color::from_rgb_u8(255, 0, 0),
            Self::Ghost(GhostKind::Pinky) => Color::from_rgb_u8(255, 184, 255),
            Self::Ghost(GhostKind::Inky) => Color::from_rgb_u8(0, 255, 255),
            Self::Ghost(GhostKind::Clyde) => Color::from_rgb_u8(255, 184, 82),
            Self::Frightened => Color::from_rgb_u8(33, 33, 255),
            Self::FrightenedBlink => Color::from_rgb_u8(33, 33, 255).lighten(0.8),
            Self::Eyes => Color::from_rgb_u8(255, 255, 255),
        }
    }
}

/// One positioned, animated sprite within a composed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySprite {
    /// What the sprite depicts.
    pub category: SpriteCategory,
    /// Heading the sprite faces.
    pub facing: Direction,
    /// Animation frame to present.
    pub frame_index: u32,
    /// Upper-left corner of the sprite in screen units.
    pub top_left: Vec2,
}

/// One static maze cell within a composed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSprite {
    /// Tile the cell occupies.
    pub tile: TileIndex,
    /// What occupies the cell; never [`CellKind::Empty`].
    pub kind: CellKind,
}

/// Session numbers frontends print alongside the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Score accumulated so far.
    pub score: u32,
    /// Lives remaining.
    pub lives: i32,
}

/// A fully composed frame ready for a frontend to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Static maze content, excluding empty cells.
    pub tiles: Vec<TileSprite>,
    /// Player and ghost sprites in draw order.
    pub entities: Vec<EntitySprite>,
    /// Score and lives readout.
    pub hud: Hud,
}

/// Ticks of animation per sprite frame.
const FRAME_PERIOD: u64 = 6;
/// Frames in the player's chomp cycle.
const PLAYER_FRAMES: u64 = 4;
/// Frames in a ghost's wave cycle.
const GHOST_FRAMES: u64 = 2;
/// Ticks per on/off phase of the frightened warning flash.
const BLINK_PERIOD: u64 = 10;

/// Stateful frame composer.
///
/// Owns only animation state; everything about the session arrives as
/// snapshots on every [`Presentation::compose`] call.
#[derive(Clone, Debug)]
pub struct Presentation {
    sprite_size: Vec2,
    frame_counter: u64,
}

impl Presentation {
    /// Creates a composer drawing sprites of the given screen size.
    #[must_use]
    pub const fn new(sprite_size: Vec2) -> Self {
        Self {
            sprite_size,
            frame_counter: 0,
        }
    }

    /// Advances animation by one presented frame.
    pub fn advance(&mut self) {
        self.frame_counter += 1;
    }

    /// Composes a frame from tick-boundary snapshots.
    pub fn compose(
        &self,
        grid: &GridView<'_>,
        player: &PlayerSnapshot,
        ghosts: &GhostView,
        tuning: &Tuning,
        hud: Hud,
    ) -> Scene {
        let (columns, rows) = grid.dimensions();
        let mut tiles = Vec::new();
        for row in 0..rows as i32 {
            for col in 0..columns as i32 {
                let tile = TileIndex::new(row, col);
                match grid.kind_at(tile) {
                    None | Some(CellKind::Empty) => {}
                    Some(kind) => tiles.push(TileSprite { tile, kind }),
                }
            }
        }

        let mut entities = Vec::new();
        for ghost in ghosts.iter() {
            entities.push(EntitySprite {
                category: self.ghost_category(ghost.mode, ghost.kind, player, tuning),
                facing: ghost.direction,
                frame_index: (self.frame_counter / FRAME_PERIOD % GHOST_FRAMES) as u32,
                top_left: self.top_left(ghost.position.x(), ghost.position.y()),
            });
        }
        entities.push(EntitySprite {
            category: if player.lifecycle == PlayerLifecycle::Eaten {
                SpriteCategory::PlayerDeath
            } else {
                SpriteCategory::Player
            },
            facing: player.direction,
            frame_index: (self.frame_counter / FRAME_PERIOD % PLAYER_FRAMES) as u32,
            top_left: self.top_left(player.position.x(), player.position.y()),
        });

        Scene {
            tiles,
            entities,
            hud,
        }
    }

    fn ghost_category(
        &self,
        mode: GhostMode,
        kind: GhostKind,
        player: &PlayerSnapshot,
        tuning: &Tuning,
    ) -> SpriteCategory {
        match mode {
            GhostMode::Eaten => SpriteCategory::Eyes,
            GhostMode::Frightened => {
                // Flash as a warning once the power-up is close to expiry.
                let expiring = player.power_remaining <= tuning.frightened_blink_threshold;
                if expiring && (self.frame_counter / BLINK_PERIOD) % 2 == 0 {
                    SpriteCategory::FrightenedBlink
                } else {
                    SpriteCategory::Frightened
                }
            }
            GhostMode::Scatter | GhostMode::Chase => SpriteCategory::Ghost(kind),
        }
    }

    fn top_left(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) - self.sprite_size * 0.5
    }
}

/// Receives audio cues carried by the event stream.
pub trait AudioSink {
    /// Plays or records one cue.
    fn play(&mut self, cue: AudioCue) -> AnyResult<()>;
}

/// Sink that remembers every cue in arrival order; useful for headless runs
/// and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingAudioSink {
    cues: Vec<AudioCue>,
}

impl RecordingAudioSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { cues: Vec::new() }
    }

    /// Cues recorded so far, oldest first.
    #[must_use]
    pub fn cues(&self) -> &[AudioCue] {
        &self.cues
    }
}

impl AudioSink for RecordingAudioSink {
    fn play(&mut self, cue: AudioCue) -> AnyResult<()> {
        self.cues.push(cue);
        Ok(())
    }
}

/// Forwards every audio cue in `events` to the sink, preserving order.
pub fn dispatch_audio(events: &[Event], sink: &mut dyn AudioSink) -> AnyResult<()> {
    for event in events {
        if let Event::Audio { cue } = event {
            sink.play(*cue)?;
        }
    }
    Ok(())
}
