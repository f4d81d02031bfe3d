//////////////////////////
// check.rs
//////////////////////////

use crate::board::Board;
use crate::rules::is_pseudo_legal;
use crate::types::*;

/// First king of `color` in row-major order. Callers keep kings unique.
pub fn find_king(board: &Board, color: Color) -> Option<Position> {
    board
        .pieces_of(color)
        .find(|(_, p)| p.kind == PieceKind::King)
        .map(|(pos, _)| pos)
}

/// True if any piece of `by` could move onto `pos` by its movement rules.
pub fn is_square_attacked(board: &Board, pos: Position, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(from, _)| is_pseudo_legal(board, from, pos))
}

/// Where `color`'s king stands if it is attacked, `None` if it is safe or
/// missing.
pub fn king_in_check(board: &Board, color: Color) -> Option<Position> {
    let king = find_king(board, color)?;
    is_square_attacked(board, king, color.opposite()).then_some(king)
}
