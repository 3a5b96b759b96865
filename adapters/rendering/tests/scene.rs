//! Frame composition from world snapshots.

use glam::Vec2;
use maze_chase_core::{
    AudioCue, CellKind, Direction, Event, GhostKind, GhostMode, GhostSnapshot, GhostView,
    GridView, PlayerLifecycle, PlayerSnapshot, Position, TileIndex, Tuning, TurnPermissions,
    WallKind,
};
use maze_chase_rendering::{
    dispatch_audio, AudioSink, EntitySprite, Hud, Presentation, RecordingAudioSink, Scene,
    SpriteCategory,
};

const SPRITE: Vec2 = Vec2::new(30.0, 30.0);

fn player(lifecycle: PlayerLifecycle, power_remaining: u32) -> PlayerSnapshot {
    PlayerSnapshot {
        position: Position::new(45.0, 45.0),
        tile: TileIndex::new(1, 1),
        direction: Direction::Right,
        commanded: Direction::Right,
        lifecycle,
        lives: 3,
        score_multiplier: 1,
        powered: power_remaining > 0,
        power_remaining,
        turns: TurnPermissions::default(),
    }
}

fn ghosts(mode: GhostMode) -> GhostView {
    GhostView::new(GhostKind::ALL.map(|kind| GhostSnapshot {
        kind,
        position: Position::new(75.0, 45.0),
        tile: TileIndex::new(1, 2),
        direction: Direction::Up,
        mode,
        turns: TurnPermissions::default(),
    }))
}

fn compose(presentation: &Presentation, mode: GhostMode, power_remaining: u32) -> Scene {
    let cells = vec![
        CellKind::Wall(WallKind::Horizontal),
        CellKind::Dot,
        CellKind::Empty,
        CellKind::PowerDot,
    ];
    let grid = GridView::new(&cells, 2, 2, 2);
    presentation.compose(
        &grid,
        &player(PlayerLifecycle::Chase, power_remaining),
        &ghosts(mode),
        &Tuning::default(),
        Hud { score: 120, lives: 3 },
    )
}

fn ghost_categories(scene: &Scene) -> Vec<SpriteCategory> {
    scene
        .entities
        .iter()
        .take(4)
        .map(|sprite| sprite.category)
        .collect()
}

#[test]
fn empty_cells_are_not_drawn() {
    let scene = compose(&Presentation::new(SPRITE), GhostMode::Scatter, 0);
    let kinds: Vec<CellKind> = scene.tiles.iter().map(|tile| tile.kind).collect();
    assert_eq!(
        kinds,
        vec![
            CellKind::Wall(WallKind::Horizontal),
            CellKind::Dot,
            CellKind::PowerDot,
        ]
    );
    assert_eq!(scene.tiles[2].tile, TileIndex::new(1, 1));
}

#[test]
fn sprites_are_centered_on_entity_positions() {
    let scene = compose(&Presentation::new(SPRITE), GhostMode::Scatter, 0);
    let player_sprite: &EntitySprite = scene.entities.last().expect("player sprite");
    assert_eq!(player_sprite.category, SpriteCategory::Player);
    assert_eq!(player_sprite.top_left, Vec2::new(30.0, 30.0));
    assert_eq!(scene.hud, Hud { score: 120, lives: 3 });
}

#[test]
fn dying_player_switches_to_the_death_sprite() {
    let presentation = Presentation::new(SPRITE);
    let cells = vec![CellKind::Empty];
    let grid = GridView::new(&cells, 1, 1, 0);
    let scene = presentation.compose(
        &grid,
        &player(PlayerLifecycle::Eaten, 0),
        &ghosts(GhostMode::Chase),
        &Tuning::default(),
        Hud { score: 0, lives: 2 },
    );
    let player_sprite = scene.entities.last().expect("player sprite");
    assert_eq!(player_sprite.category, SpriteCategory::PlayerDeath);
}

#[test]
fn ghost_category_follows_mode() {
    let presentation = Presentation::new(SPRITE);
    let scene = compose(&presentation, GhostMode::Chase, 0);
    assert_eq!(
        ghost_categories(&scene),
        GhostKind::ALL.map(SpriteCategory::Ghost).to_vec()
    );
    let scene = compose(&presentation, GhostMode::Eaten, 0);
    assert!(ghost_categories(&scene)
        .iter()
        .all(|category| *category == SpriteCategory::Eyes));
}

#[test]
fn frightened_ghosts_flash_only_near_expiry() {
    let mut presentation = Presentation::new(SPRITE);
    // Plenty of power-up left: steady frightened colors.
    let scene = compose(&presentation, GhostMode::Frightened, 400);
    assert!(ghost_categories(&scene)
        .iter()
        .all(|category| *category == SpriteCategory::Frightened));

    // Close to expiry the flash alternates with the animation clock.
    let scene = compose(&presentation, GhostMode::Frightened, 20);
    assert!(ghost_categories(&scene)
        .iter()
        .all(|category| *category == SpriteCategory::FrightenedBlink));
    for _ in 0..10 {
        presentation.advance();
    }
    let scene = compose(&presentation, GhostMode::Frightened, 20);
    assert!(ghost_categories(&scene)
        .iter()
        .all(|category| *category == SpriteCategory::Frightened));
}

#[test]
fn blink_color_is_lighter_than_the_frightened_color() {
    let steady = SpriteCategory::Frightened.color();
    let flash = SpriteCategory::FrightenedBlink.color();
    assert!(flash.red > steady.red);
    assert!(flash.green > steady.green);
}

#[test]
fn recording_sink_captures_cues_in_event_order() {
    let events = [
        Event::TimeAdvanced { tick: 1 },
        Event::Audio {
            cue: AudioCue::Munch,
        },
        Event::PelletEaten {
            tile: TileIndex::new(1, 1),
            score: 10,
        },
        Event::Audio {
            cue: AudioCue::PowerPellet,
        },
    ];
    let mut sink = RecordingAudioSink::new();
    dispatch_audio(&events, &mut sink).expect("recording sink never fails");
    assert_eq!(sink.cues(), &[AudioCue::Munch, AudioCue::PowerPellet]);
    sink.play(AudioCue::GhostEaten).expect("recording sink never fails");
    assert_eq!(sink.cues().len(), 3);
}
