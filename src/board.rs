//! Core Quantik values: shapes, sizes, players, pieces, cells, moves, and the
//! 4×4 board with its twelve winning/blocking groups (rows, columns, zones).

use std::fmt;

/// One of the four piece shapes.
///
/// Shapes are what the win condition and the blocking rule look at; size and
/// owner are ignored when comparing shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    /// ●
    Circle,
    /// ■
    Square,
    /// ▲
    Triangle,
    /// ♦
    Diamond,
}

impl Shape {
    /// All four shapes, in a fixed order.
    pub const ALL: [Shape; 4] = [Shape::Circle, Shape::Square, Shape::Triangle, Shape::Diamond];

    /// Display glyph for this shape.
    pub fn glyph(self) -> char {
        match self {
            Shape::Circle => '●',
            Shape::Square => '■',
            Shape::Triangle => '▲',
            Shape::Diamond => '♦',
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Piece size. Purely a supply distinction: each player owns one small and one
/// large piece of every shape, and neither blocking nor winning looks at size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size {
    /// The small piece of a shape.
    Small,
    /// The large piece of a shape.
    Large,
}

impl Size {
    /// Both sizes.
    pub const ALL: [Size; 2] = [Size::Small, Size::Large];
}

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// First player (moves first in a fresh game).
    One,
    /// Second player.
    Two,
}

impl Player {
    /// The other player.
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Seat index (0 or 1), used for per-player arrays.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// A piece: shape, size, and owner. Immutable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// The shape, relevant to blocking and winning.
    pub shape: Shape,
    /// The size, relevant only to supply accounting.
    pub size: Size,
    /// The player this piece belongs to.
    pub owner: Player,
}

/// A board coordinate. Only constructible inside the 4×4 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    /// Builds a cell, returning `None` when the coordinate is off the board.
    pub fn new(row: u8, col: u8) -> Option<Cell> {
        if row < 4 && col < 4 {
            Some(Cell { row, col })
        } else {
            None
        }
    }

    /// Row index, in `0..4`.
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column index, in `0..4`.
    pub fn col(self) -> u8 {
        self.col
    }

    /// Index of the 2×2 zone containing this cell, in `0..4`.
    pub fn zone(self) -> usize {
        ((self.row / 2) * 2 + self.col / 2) as usize
    }

    /// Iterates over all sixteen cells, row-major.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..4u8).flat_map(|row| (0..4u8).map(move |col| Cell { row, col }))
    }

    fn index(self) -> usize {
        (self.row * 4 + self.col) as usize
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A candidate placement: which piece goes on which cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// The piece to place. Its owner must be the player to move.
    pub piece: Piece,
    /// The destination cell.
    pub cell: Cell,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.piece.owner, self.piece.shape, self.cell)
    }
}

/// The kind of group a win was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// One of the four rows.
    Row,
    /// One of the four columns.
    Column,
    /// One of the four non-overlapping 2×2 zones.
    Zone,
}

/// One of the twelve cell groups checked for wins and zone blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    /// Row, column, or zone.
    pub kind: GroupKind,
    /// Index of the group within its kind, in `0..4`.
    pub index: usize,
    /// The four member cells.
    pub cells: [Cell; 4],
}

const fn cell(row: u8, col: u8) -> Cell {
    Cell { row, col }
}

// Zone layout: top-left, top-right, bottom-left, bottom-right.
pub(crate) const ZONES: [[Cell; 4]; 4] = [
    [cell(0, 0), cell(0, 1), cell(1, 0), cell(1, 1)],
    [cell(0, 2), cell(0, 3), cell(1, 2), cell(1, 3)],
    [cell(2, 0), cell(2, 1), cell(3, 0), cell(3, 1)],
    [cell(2, 2), cell(2, 3), cell(3, 2), cell(3, 3)],
];

/// Returns the twelve groups: rows 0–3, columns 0–3, zones 0–3.
pub fn groups() -> impl Iterator<Item = Group> {
    let rows = (0..4).map(|r| Group {
        kind: GroupKind::Row,
        index: r,
        cells: [
            cell(r as u8, 0),
            cell(r as u8, 1),
            cell(r as u8, 2),
            cell(r as u8, 3),
        ],
    });
    let cols = (0..4).map(|c| Group {
        kind: GroupKind::Column,
        index: c,
        cells: [
            cell(0, c as u8),
            cell(1, c as u8),
            cell(2, c as u8),
            cell(3, c as u8),
        ],
    });
    let zones = (0..4).map(|z| Group {
        kind: GroupKind::Zone,
        index: z,
        cells: ZONES[z],
    });
    rows.chain(cols).chain(zones)
}

/// The 4×4 grid. Each cell holds at most one piece.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Option<Piece>; 16],
}

impl Board {
    /// An empty board.
    pub fn empty() -> Board {
        Board::default()
    }

    /// The piece on `cell`, if any.
    pub fn get(&self, cell: Cell) -> Option<Piece> {
        self.cells[cell.index()]
    }

    /// True when `cell` holds no piece.
    pub fn is_empty(&self, cell: Cell) -> bool {
        self.cells[cell.index()].is_none()
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when all sixteen cells are filled.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub(crate) fn put(&mut self, cell: Cell, piece: Piece) {
        debug_assert!(self.is_empty(cell));
        self.cells[cell.index()] = Some(piece);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4u8 {
            for col in 0..4u8 {
                let c = Cell { row, col };
                match self.get(c) {
                    Some(p) => {
                        let seat = p.owner.index() + 1;
                        write!(f, "{seat}{} ", p.shape)?;
                    }
                    None => write!(f, " . ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
