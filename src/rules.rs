//! The Quantik rules engine: move legality, move generation, and terminal
//! detection.
//!
//! The defining constraint: a player may not place a shape in a row, column,
//! or 2×2 zone where the *opponent* already has that shape. Repeating one's
//! own shape is unrestricted. A row, column, or zone holding four distinct
//! shapes (owners and sizes ignored) wins the game for whoever completed it.

use thiserror::Error;

use crate::board::{Board, Cell, Group, Move, Piece, Player, Shape, Size, ZONES};
use crate::state::GameState;

/// Why a candidate move is illegal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// The piece belongs to the player not on turn.
    #[error("it is not {0}'s turn")]
    NotYourTurn(Player),
    /// The destination cell already holds a piece.
    #[error("cell {0} is occupied")]
    OccupiedCell(Cell),
    /// The mover already placed their piece of that shape and size.
    #[error("no {shape} ({size:?}) left in supply")]
    OutOfPieces {
        /// Shape of the exhausted piece.
        shape: Shape,
        /// Size of the exhausted piece.
        size: Size,
    },
    /// The opponent already has this shape in the target's row, column, or zone.
    #[error("{shape} is blocked at {cell} by an opponent piece")]
    ShapeBlocked {
        /// The shape being placed.
        shape: Shape,
        /// The attempted destination.
        cell: Cell,
    },
}

/// Result of inspecting a state for termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The game continues.
    Ongoing,
    /// The given player has won.
    Win(Player),
    /// Full board, no winning group.
    Draw,
}

/// Checks a candidate move against the full rule set.
pub fn is_legal(state: &GameState, mv: &Move) -> Result<(), RulesError> {
    let piece = mv.piece;
    if piece.owner != state.to_move() {
        return Err(RulesError::NotYourTurn(piece.owner));
    }
    if !state.board().is_empty(mv.cell) {
        return Err(RulesError::OccupiedCell(mv.cell));
    }
    if state.supply_remaining(piece.owner, piece.shape, piece.size) == 0 {
        return Err(RulesError::OutOfPieces {
            shape: piece.shape,
            size: piece.size,
        });
    }
    if blocked_by_opponent(state.board(), mv.cell, piece.shape, piece.owner) {
        return Err(RulesError::ShapeBlocked {
            shape: piece.shape,
            cell: mv.cell,
        });
    }
    Ok(())
}

// An opponent piece of the same shape anywhere in the cell's row, column, or
// zone blocks the placement. Own pieces never block.
fn blocked_by_opponent(board: &Board, cell: Cell, shape: Shape, me: Player) -> bool {
    let blocks = |p: Piece| p.shape == shape && p.owner != me;
    for col in 0..4 {
        let c = Cell::new(cell.row(), col).expect("row scan in bounds");
        if board.get(c).is_some_and(blocks) {
            return true;
        }
    }
    for row in 0..4 {
        let c = Cell::new(row, cell.col()).expect("column scan in bounds");
        if board.get(c).is_some_and(blocks) {
            return true;
        }
    }
    for c in ZONES[cell.zone()] {
        if board.get(c).is_some_and(blocks) {
            return true;
        }
    }
    false
}

/// All legal moves for the player on turn.
///
/// The small and large piece of a shape yield distinct moves when both are
/// still in supply.
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    let me = state.to_move();
    let mut moves = Vec::new();
    for cell in state.empty_cells() {
        for shape in Shape::ALL {
            if blocked_by_opponent(state.board(), cell, shape, me) {
                continue;
            }
            for size in Size::ALL {
                if state.supply_remaining(me, shape, size) > 0 {
                    moves.push(Move {
                        piece: Piece {
                            shape,
                            size,
                            owner: me,
                        },
                        cell,
                    });
                }
            }
        }
    }
    moves
}

/// Number of (cell, shape) placements open to `player`, were it their turn.
///
/// Sizes are not distinguished; this is the mobility measure used by the
/// search strategies.
pub fn move_count(state: &GameState, player: Player) -> usize {
    let mut count = 0;
    for cell in state.empty_cells() {
        for shape in Shape::ALL {
            let in_supply = Size::ALL
                .iter()
                .any(|&size| state.supply_remaining(player, shape, size) > 0);
            if in_supply && !blocked_by_opponent(state.board(), cell, shape, player) {
                count += 1;
            }
        }
    }
    count
}

/// True when `player` could place at least one piece, were it their turn.
pub fn has_legal_move(state: &GameState, player: Player) -> bool {
    for cell in state.empty_cells() {
        for shape in Shape::ALL {
            let in_supply = Size::ALL
                .iter()
                .any(|&size| state.supply_remaining(player, shape, size) > 0);
            if in_supply && !blocked_by_opponent(state.board(), cell, shape, player) {
                return true;
            }
        }
    }
    false
}

/// The first row, column, or zone filled with four distinct shapes, if any.
pub fn winning_group(state: &GameState) -> Option<Group> {
    crate::board::groups().find(|g| {
        let mut shapes = [false; 4];
        for c in g.cells {
            match state.board().get(c) {
                Some(p) => shapes[p.shape as usize] = true,
                None => return false,
            }
        }
        shapes.iter().all(|&s| s)
    })
}

/// Evaluates a state for termination. Pure: inspecting a state never changes it,
/// and evaluating twice gives the same answer.
///
/// A winning group credits the player who placed the last piece. A full board
/// without one is a draw. A player on turn with no legal move and pieces
/// remaining loses (win for the opponent).
pub fn outcome(state: &GameState) -> Outcome {
    if winning_group(state).is_some() {
        if let Some(mv) = state.last_move() {
            return Outcome::Win(mv.piece.owner);
        }
    }
    if state.board().is_full() {
        return Outcome::Draw;
    }
    if !state.history().is_empty() && !has_legal_move(state, state.to_move()) {
        return Outcome::Win(state.to_move().opponent());
    }
    Outcome::Ongoing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(owner: Player, shape: Shape, size: Size, row: u8, col: u8) -> Move {
        Move {
            piece: Piece { shape, size, owner },
            cell: Cell::new(row, col).unwrap(),
        }
    }

    fn play(moves: &[Move]) -> GameState {
        let mut state = GameState::initial();
        for &m in moves {
            state = state.apply(m).unwrap();
        }
        state
    }

    // The full synthetic game used for the draw and stalemate tests: shapes
    // grouped in 2×2 blocks so no row, column, or zone ever holds four
    // distinct shapes.
    fn blocked_out_game() -> Vec<Move> {
        use Player::{One, Two};
        use Shape::{Circle, Diamond, Square, Triangle};
        use Size::{Large, Small};
        vec![
            mv(One, Circle, Small, 0, 0),
            mv(Two, Circle, Small, 0, 1),
            mv(One, Circle, Large, 1, 0),
            mv(Two, Circle, Large, 1, 1),
            mv(One, Square, Small, 0, 2),
            mv(Two, Square, Small, 0, 3),
            mv(One, Square, Large, 1, 2),
            mv(Two, Square, Large, 1, 3),
            mv(One, Triangle, Small, 2, 0),
            mv(Two, Triangle, Small, 2, 1),
            mv(One, Triangle, Large, 3, 0),
            mv(Two, Triangle, Large, 3, 1),
            mv(One, Diamond, Small, 2, 2),
            mv(Two, Diamond, Small, 2, 3),
            mv(One, Diamond, Large, 3, 2),
            mv(Two, Diamond, Large, 3, 3),
        ]
    }

    #[test]
    fn first_move_anywhere_is_legal() {
        let state = GameState::initial();
        let m = mv(Player::One, Shape::Circle, Size::Small, 0, 0);
        assert_eq!(is_legal(&state, &m), Ok(()));
        let next = state.apply(m).unwrap();
        assert!(!next.board().is_empty(m.cell));
        assert_eq!(outcome(&next), Outcome::Ongoing);
    }

    #[test]
    fn occupied_cell_is_always_illegal() {
        let state = play(&[mv(Player::One, Shape::Circle, Size::Small, 0, 0)]);
        for shape in Shape::ALL {
            let m = mv(Player::Two, shape, Size::Large, 0, 0);
            assert!(matches!(
                is_legal(&state, &m),
                Err(RulesError::OccupiedCell(_))
            ));
        }
    }

    #[test]
    fn opponent_shape_blocks_row_column_and_zone() {
        let state = play(&[mv(Player::One, Shape::Circle, Size::Small, 0, 0)]);
        // Same zone, either size.
        for size in Size::ALL {
            let m = mv(Player::Two, Shape::Circle, size, 1, 1);
            assert!(matches!(
                is_legal(&state, &m),
                Err(RulesError::ShapeBlocked { .. })
            ));
        }
        // Same row.
        let m = mv(Player::Two, Shape::Circle, Size::Small, 0, 3);
        assert!(matches!(
            is_legal(&state, &m),
            Err(RulesError::ShapeBlocked { .. })
        ));
        // Same column.
        let m = mv(Player::Two, Shape::Circle, Size::Small, 3, 0);
        assert!(matches!(
            is_legal(&state, &m),
            Err(RulesError::ShapeBlocked { .. })
        ));
        // Different shape in the same zone is fine.
        let m = mv(Player::Two, Shape::Square, Size::Small, 1, 1);
        assert_eq!(is_legal(&state, &m), Ok(()));
    }

    #[test]
    fn own_shape_never_blocks() {
        let state = play(&[
            mv(Player::One, Shape::Circle, Size::Small, 0, 0),
            mv(Player::Two, Shape::Diamond, Size::Small, 3, 3),
        ]);
        // Player 1 repeats their own circle in the same row and zone.
        let m = mv(Player::One, Shape::Circle, Size::Large, 0, 1);
        assert_eq!(is_legal(&state, &m), Ok(()));
    }

    #[test]
    fn out_of_turn_piece_is_illegal() {
        let state = GameState::initial();
        let m = mv(Player::Two, Shape::Circle, Size::Small, 0, 0);
        assert_eq!(is_legal(&state, &m), Err(RulesError::NotYourTurn(Player::Two)));
    }

    #[test]
    fn exhausted_supply_is_illegal() {
        let state = play(&[
            mv(Player::One, Shape::Circle, Size::Small, 0, 0),
            mv(Player::Two, Shape::Square, Size::Small, 3, 3),
        ]);
        let m = mv(Player::One, Shape::Circle, Size::Small, 2, 1);
        assert!(matches!(is_legal(&state, &m), Err(RulesError::OutOfPieces { .. })));
    }

    #[test]
    fn completing_four_distinct_shapes_wins_for_the_placer() {
        // Mixed owners along row 0; player 2 places the fourth distinct shape.
        let state = play(&[
            mv(Player::One, Shape::Circle, Size::Small, 0, 0),
            mv(Player::Two, Shape::Square, Size::Small, 0, 1),
            mv(Player::One, Shape::Triangle, Size::Small, 0, 2),
            mv(Player::Two, Shape::Diamond, Size::Small, 0, 3),
        ]);
        assert_eq!(outcome(&state), Outcome::Win(Player::Two));
        let group = winning_group(&state).unwrap();
        assert_eq!(group.kind, crate::board::GroupKind::Row);
        assert_eq!(group.index, 0);
    }

    #[test]
    fn a_zone_win_is_detected() {
        let state = play(&[
            mv(Player::One, Shape::Circle, Size::Small, 0, 0),
            mv(Player::Two, Shape::Square, Size::Small, 0, 1),
            mv(Player::One, Shape::Triangle, Size::Small, 1, 0),
            mv(Player::Two, Shape::Diamond, Size::Small, 1, 1),
        ]);
        assert_eq!(outcome(&state), Outcome::Win(Player::Two));
        assert_eq!(
            winning_group(&state).unwrap().kind,
            crate::board::GroupKind::Zone
        );
    }

    #[test]
    fn full_board_without_winning_group_is_a_draw() {
        let state = play(&blocked_out_game());
        assert!(state.board().is_full());
        assert_eq!(outcome(&state), Outcome::Draw);
    }

    #[test]
    fn stuck_player_with_pieces_remaining_loses() {
        // One move short of the draw game: player 2's last diamond is blocked
        // everywhere that is still empty.
        let moves = blocked_out_game();
        let state = play(&moves[..15]);
        assert_eq!(state.to_move(), Player::Two);
        assert!(!state.board().is_full());
        assert!(!has_legal_move(&state, Player::Two));
        assert_eq!(outcome(&state), Outcome::Win(Player::One));
    }

    #[test]
    fn outcome_is_idempotent() {
        let state = play(&[
            mv(Player::One, Shape::Circle, Size::Small, 0, 0),
            mv(Player::Two, Shape::Square, Size::Small, 0, 1),
            mv(Player::One, Shape::Triangle, Size::Small, 0, 2),
            mv(Player::Two, Shape::Diamond, Size::Small, 0, 3),
        ]);
        let first = outcome(&state);
        let second = outcome(&state);
        assert_eq!(first, second);
        assert_eq!(first, Outcome::Win(Player::Two));
    }

    #[test]
    fn legal_moves_match_is_legal() {
        let state = play(&[
            mv(Player::One, Shape::Circle, Size::Small, 0, 0),
            mv(Player::Two, Shape::Square, Size::Small, 2, 2),
        ]);
        let moves = legal_moves(&state);
        assert!(!moves.is_empty());
        for m in &moves {
            assert_eq!(is_legal(&state, m), Ok(()), "{m}");
        }
        // Exhaustive cross-check: everything not generated must be illegal.
        let generated: std::collections::HashSet<_> = moves
            .iter()
            .map(|m| (m.cell, m.piece.shape, m.piece.size))
            .collect();
        for cell in Cell::all() {
            for shape in Shape::ALL {
                for size in Size::ALL {
                    if generated.contains(&(cell, shape, size)) {
                        continue;
                    }
                    let m = Move {
                        piece: Piece {
                            shape,
                            size,
                            owner: state.to_move(),
                        },
                        cell,
                    };
                    assert!(is_legal(&state, &m).is_err(), "{m}");
                }
            }
        }
    }

    // The eight symmetries of the square, as cell maps. Rows map to rows or
    // columns and zones map to zones, so a win must survive all of them.
    fn symmetries() -> Vec<fn(u8, u8) -> (u8, u8)> {
        vec![
            |r, c| (r, c),
            |r, c| (c, 3 - r),
            |r, c| (3 - r, 3 - c),
            |r, c| (3 - c, r),
            |r, c| (r, 3 - c),
            |r, c| (3 - r, c),
            |r, c| (c, r),
            |r, c| (3 - c, 3 - r),
        ]
    }

    #[test]
    fn win_detection_survives_board_symmetries() {
        let base = vec![
            mv(Player::One, Shape::Circle, Size::Small, 0, 0),
            mv(Player::Two, Shape::Square, Size::Small, 0, 1),
            mv(Player::One, Shape::Triangle, Size::Small, 0, 2),
            mv(Player::Two, Shape::Diamond, Size::Small, 0, 3),
        ];
        for (i, sym) in symmetries().into_iter().enumerate() {
            let transformed: Vec<Move> = base
                .iter()
                .map(|m| {
                    let (r, c) = sym(m.cell.row(), m.cell.col());
                    Move {
                        piece: m.piece,
                        cell: Cell::new(r, c).unwrap(),
                    }
                })
                .collect();
            let state = play(&transformed);
            assert_eq!(outcome(&state), Outcome::Win(Player::Two), "symmetry {i}");
        }
    }
}
