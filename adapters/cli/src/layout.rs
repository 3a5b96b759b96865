//! The built-in maze and the ASCII maze notation.

use std::{error::Error, fmt};

use maze_chase_core::{CellKind, MazeLayout, TileIndex, TileRect, WallKind};

/// The maze shipped with the binary: a 19x15 grid with a central gated
/// ghost house, four corner power dots, and a wrap-around tunnel row.
const DEFAULT_MAZE: &str = "\
r-----------------7
|o.......|.......o|
|.-7.---.|.---.r-.|
|.................|
|...|.........|...|
|.-.|..r-=-7..|.-.|
|......|   |......|
 ......|   |...... 
|......L---J......|
|.-.|.........|.-.|
|...|....-....|...|
|.---.|.....|.---.|
|.................|
|o....|..-..|....o|
L-----------------J";

/// Builds the built-in maze together with its fixed landmarks.
pub(crate) fn default_layout() -> Result<MazeLayout, LayoutParseError> {
    Ok(MazeLayout {
        cells: parse_cells(DEFAULT_MAZE)?,
        player_spawn: TileIndex::new(12, 9),
        ghost_spawns: [
            TileIndex::new(4, 9),
            TileIndex::new(7, 8),
            TileIndex::new(7, 9),
            TileIndex::new(7, 10),
        ],
        home_corners: [
            TileIndex::new(0, 18),
            TileIndex::new(0, 0),
            TileIndex::new(14, 18),
            TileIndex::new(14, 0),
        ],
        house: TileRect::new(TileIndex::new(6, 8), TileIndex::new(7, 10)),
        house_entry: TileIndex::new(6, 9),
        house_exit: TileIndex::new(4, 9),
    })
}

/// Parses ASCII maze art into row-major cells.
///
/// Every line must have the same length; see [`glyph`] for the notation.
pub(crate) fn parse_cells(art: &str) -> Result<Vec<Vec<CellKind>>, LayoutParseError> {
    let mut rows: Vec<Vec<CellKind>> = Vec::new();
    for (row, line) in art.lines().enumerate() {
        let mut cells = Vec::new();
        for (col, symbol) in line.chars().enumerate() {
            let kind = match symbol {
                ' ' => CellKind::Empty,
                '.' => CellKind::Dot,
                'o' => CellKind::PowerDot,
                '=' => CellKind::Gate,
                '|' => CellKind::Wall(WallKind::Vertical),
                '-' => CellKind::Wall(WallKind::Horizontal),
                'r' => CellKind::Wall(WallKind::TopLeft),
                '7' => CellKind::Wall(WallKind::TopRight),
                'L' => CellKind::Wall(WallKind::BottomLeft),
                'J' => CellKind::Wall(WallKind::BottomRight),
                _ => return Err(LayoutParseError::UnknownGlyph { row, col, symbol }),
            };
            cells.push(kind);
        }
        if let Some(first) = rows.first() {
            if cells.len() != first.len() {
                return Err(LayoutParseError::RaggedRow { row });
            }
        }
        rows.push(cells);
    }
    if rows.is_empty() {
        return Err(LayoutParseError::EmptyArt);
    }
    Ok(rows)
}

/// Character the frame printer uses for a maze cell.
pub(crate) const fn glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Empty => ' ',
        CellKind::Dot => '.',
        CellKind::PowerDot => 'o',
        CellKind::Gate => '=',
        CellKind::Wall(WallKind::Vertical) => '|',
        CellKind::Wall(WallKind::Horizontal) => '-',
        CellKind::Wall(WallKind::TopLeft) => 'r',
        CellKind::Wall(WallKind::TopRight) => '7',
        CellKind::Wall(WallKind::BottomLeft) => 'L',
        CellKind::Wall(WallKind::BottomRight) => 'J',
    }
}

/// Errors that can occur while parsing ASCII maze art.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LayoutParseError {
    /// The art contained no lines at all.
    EmptyArt,
    /// A line's length differed from the first line's.
    RaggedRow {
        /// Zero-based index of the offending line.
        row: usize,
    },
    /// A character outside the maze notation was encountered.
    UnknownGlyph {
        /// Zero-based index of the offending line.
        row: usize,
        /// Zero-based column of the offending character.
        col: usize,
        /// The character itself.
        symbol: char,
    },
}

impl fmt::Display for LayoutParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyArt => write!(f, "maze art is empty"),
            Self::RaggedRow { row } => {
                write!(f, "maze art row {row} differs in length from the first row")
            }
            Self::UnknownGlyph { row, col, symbol } => {
                write!(f, "maze art contains unknown glyph '{symbol}' at {row}:{col}")
            }
        }
    }
}

impl Error for LayoutParseError {}
