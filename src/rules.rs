//////////////////////////
// rules.rs
//////////////////////////
//
// Piece geometry and occupancy only. Whether the mover's king ends up in
// check is decided in `legal`.

use crate::board::Board;
use crate::types::*;

/// True when the piece on `from` may move to `to` by its movement rules,
/// ignoring king safety.
pub fn is_pseudo_legal(board: &Board, from: Position, to: Position) -> bool {
    let piece = match board.piece_at(from) {
        Some(p) => p,
        None => return false,
    };
    if from == to {
        return false;
    }
    if let Some(dest) = board.piece_at(to) {
        if dest.color == piece.color {
            return false;
        }
    }

    let dx = to.col as i32 - from.col as i32;
    let dy = to.row as i32 - from.row as i32;

    match piece.kind {
        PieceKind::Pawn => is_valid_pawn_move(board, &piece, from, to, dx, dy),
        PieceKind::Rook => (dx == 0 || dy == 0) && clear_path(board, from, to),
        PieceKind::Bishop => dx.abs() == dy.abs() && clear_path(board, from, to),
        PieceKind::Queen => {
            (dx == 0 || dy == 0 || dx.abs() == dy.abs()) && clear_path(board, from, to)
        }
        PieceKind::King => dx.abs() <= 1 && dy.abs() <= 1,
        PieceKind::Knight => {
            (dx.abs() == 2 && dy.abs() == 1) || (dx.abs() == 1 && dy.abs() == 2)
        }
    }
}

fn is_valid_pawn_move(
    board: &Board,
    pawn: &Piece,
    from: Position,
    to: Position,
    dx: i32,
    dy: i32,
) -> bool {
    let dir = pawn.color.pawn_direction();

    // Single step
    if dx == 0 && dy == dir {
        return board.is_empty(to);
    }
    // Double step
    if dx == 0 && dy == 2 * dir {
        let between = match from.offset(dir, 0) {
            Some(p) => p,
            None => return false,
        };
        return !pawn.has_moved && board.is_empty(to) && board.is_empty(between);
    }
    // Capture
    if dx.abs() == 1 && dy == dir {
        return matches!(board.piece_at(to), Some(target) if target.color != pawn.color);
    }
    false
}

/// Every square strictly between `from` and `to` along the step
/// `(sign dy, sign dx)` must be empty. Only meaningful for straight or
/// diagonal lines.
pub fn clear_path(board: &Board, from: Position, to: Position) -> bool {
    let step_row = (to.row as i32 - from.row as i32).signum();
    let step_col = (to.col as i32 - from.col as i32).signum();

    let mut current = from;
    loop {
        current = match current.offset(step_row, step_col) {
            Some(next) => next,
            None => return false,
        };
        if current == to {
            return true;
        }
        if !board.is_empty(current) {
            return false;
        }
    }
}
