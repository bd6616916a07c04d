//! Game state: board, per-player supplies, turn, and move history.
//!
//! A [`GameState`] is a value. [`GameState::apply`] never mutates in place; it
//! returns a fresh state with the move recorded. Rule checking lives in
//! [`crate::rules`]; `apply` only guards the internal invariants so a bug
//! upstream cannot corrupt a state.

use thiserror::Error;

use crate::board::{Board, Cell, Move, Player, Shape, Size};

/// Internal consistency failure surfaced by [`GameState::apply`].
///
/// These are never expected during normal play (the match runner validates
/// moves first); seeing one means a caller skipped validation or a strategy
/// fabricated a piece it does not own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The destination cell already holds a piece.
    #[error("cell {0} is already occupied")]
    CellOccupied(Cell),
    /// The mover has no remaining piece of that shape and size.
    #[error("{player} has no {shape} ({size:?}) left")]
    SupplyExhausted {
        /// The player attempting the placement.
        player: Player,
        /// Shape of the missing piece.
        shape: Shape,
        /// Size of the missing piece.
        size: Size,
    },
    /// The piece belongs to the player not on turn.
    #[error("it is not {0}'s turn")]
    NotOnTurn(Player),
}

/// Per-player piece supply: one piece per (shape, size), eight in total.
type Supply = [[u8; 2]; 4];

const FULL_SUPPLY: Supply = [[1; 2]; 4];

/// A full Quantik position: grid, supplies, player to move, and history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    supplies: [Supply; 2],
    to_move: Player,
    history: Vec<Move>,
}

impl GameState {
    /// The legal starting position: empty board, full supplies, player 1 to move.
    pub fn initial() -> GameState {
        GameState {
            board: Board::empty(),
            supplies: [FULL_SUPPLY; 2],
            to_move: Player::One,
            history: Vec::new(),
        }
    }

    /// Returns a new state with `mv` applied and the turn passed.
    ///
    /// Assumes the move was already validated with
    /// [`rules::is_legal`](crate::rules::is_legal); the blocking rule is *not*
    /// re-checked here. The grid/supply/turn invariants are, and violating one
    /// returns a [`StateError`] leaving `self` untouched.
    pub fn apply(&self, mv: Move) -> Result<GameState, StateError> {
        let piece = mv.piece;
        if piece.owner != self.to_move {
            return Err(StateError::NotOnTurn(piece.owner));
        }
        if !self.board.is_empty(mv.cell) {
            return Err(StateError::CellOccupied(mv.cell));
        }
        if self.supply_remaining(piece.owner, piece.shape, piece.size) == 0 {
            return Err(StateError::SupplyExhausted {
                player: piece.owner,
                shape: piece.shape,
                size: piece.size,
            });
        }

        let mut next = self.clone();
        next.board.put(mv.cell, piece);
        next.supplies[piece.owner.index()][shape_index(piece.shape)][size_index(piece.size)] -= 1;
        next.history.push(mv);
        next.to_move = self.to_move.opponent();
        Ok(next)
    }

    /// The grid.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player whose turn it is.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Remaining pieces of the given shape and size for `player` (0 or 1).
    pub fn supply_remaining(&self, player: Player, shape: Shape, size: Size) -> u8 {
        self.supplies[player.index()][shape_index(shape)][size_index(size)]
    }

    /// Total pieces `player` has placed so far.
    pub fn pieces_placed(&self, player: Player) -> usize {
        self.history
            .iter()
            .filter(|mv| mv.piece.owner == player)
            .count()
    }

    /// The ordered placement history.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The last move played, if any.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// All currently empty cells.
    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        Cell::all().filter(|c| self.board.is_empty(*c))
    }
}

fn shape_index(shape: Shape) -> usize {
    match shape {
        Shape::Circle => 0,
        Shape::Square => 1,
        Shape::Triangle => 2,
        Shape::Diamond => 3,
    }
}

fn size_index(size: Size) -> usize {
    match size {
        Size::Small => 0,
        Size::Large => 1,
    }
}
