//////////////////////////
// legal.rs
//////////////////////////
//
// Legality by simulate-then-verify. Every candidate is tried on a scratch
// copy of the board, and the enumerators below are plain brute force: each
// origin is tested against all 64 destinations, and each test rescans the
// whole board for attackers. That is fine on a fixed 8x8 board and nothing
// more; this is not a move generator to build search on.

use crate::board::Board;
use crate::check::king_in_check;
use crate::rules::is_pseudo_legal;
use crate::types::*;

/// Pseudo-legal and does not leave the mover's own king in check.
pub fn is_legal(board: &Board, from: Position, to: Position) -> bool {
    let mover = match board.piece_at(from) {
        Some(p) => p.color,
        None => return false,
    };
    if !is_pseudo_legal(board, from, to) {
        return false;
    }
    let simulated = board.simulate(from, to);
    king_in_check(&simulated, mover).is_none()
}

/// Legal destinations for the piece on `from`, row-major.
pub fn legal_destinations(board: &Board, from: Position) -> Vec<Position> {
    Position::all().filter(|&to| is_legal(board, from, to)).collect()
}

/// Stops at the first legal move found. Worst case is 64 x 64 legality tests.
pub fn has_any_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|(from, _)| Position::all().any(|to| is_legal(board, from, to)))
}

/// Every legal move for `color`. Pawn moves onto the far rank carry a queen
/// promotion.
pub fn all_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from, piece) in board.pieces_of(color) {
        for to in Position::all() {
            if !is_legal(board, from, to) {
                continue;
            }
            let mv = Move::new(from, to);
            if piece.kind == PieceKind::Pawn && is_last_rank(to) {
                moves.push(mv.with_promotion(PieceKind::Queen));
            } else {
                moves.push(mv);
            }
        }
    }
    moves
}

pub fn is_last_rank(pos: Position) -> bool {
    pos.row == 0 || pos.row == 7
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn twenty_moves_from_the_start() {
        let board = Board::new();
        assert_eq!(all_legal_moves(&board, Color::White).len(), 20);
        assert_eq!(all_legal_moves(&board, Color::Black).len(), 20);
        assert!(has_any_legal_move(&board, Color::White));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let mut board = Board::empty();
        board.place(sq("e1"), Some(Piece::new(PieceKind::King, Color::White)));
        board.place(sq("e2"), Some(Piece::new(PieceKind::Rook, Color::White)));
        board.place(sq("e8"), Some(Piece::new(PieceKind::Rook, Color::Black)));

        assert!(is_pseudo_legal(&board, sq("e2"), sq("d2")));
        assert!(!is_legal(&board, sq("e2"), sq("d2")));
        assert!(is_legal(&board, sq("e2"), sq("e5")));
        assert!(is_legal(&board, sq("e2"), sq("e8")));
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let mut board = Board::empty();
        board.place(sq("e1"), Some(Piece::new(PieceKind::King, Color::White)));
        board.place(sq("d8"), Some(Piece::new(PieceKind::Rook, Color::Black)));
        assert!(!is_legal(&board, sq("e1"), sq("d1")));
        assert!(is_legal(&board, sq("e1"), sq("f1")));
        assert_eq!(
            legal_destinations(&board, sq("e1")),
            vec![sq("e2"), sq("f2"), sq("f1")]
        );
    }

    #[test]
    fn legality_check_never_mutates_the_board() {
        let board = Board::new();
        let before = board;
        let _ = all_legal_moves(&board, Color::White);
        assert_eq!(board, before);
    }

    #[test]
    fn promotions_default_to_queen_in_enumeration() {
        let mut board = Board::empty();
        board.place(sq("a1"), Some(Piece::new(PieceKind::King, Color::White)));
        board.place(sq("h8"), Some(Piece::new(PieceKind::King, Color::Black)));
        board.place(sq("c7"), Some(Piece::new(PieceKind::Pawn, Color::White)));
        let moves = all_legal_moves(&board, Color::White);
        assert!(moves.contains(&Move::new(sq("c7"), sq("c8")).with_promotion(PieceKind::Queen)));
    }
}
