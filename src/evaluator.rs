//////////////////////////
// evaluator.rs
//////////////////////////

use crate::board::Board;
use crate::check::king_in_check;
use crate::legal::has_any_legal_move;
use crate::types::*;

/// Classifies the position for the side about to move.
///
/// | in check | has moves | status      |
/// |----------|-----------|-------------|
/// | yes      | no        | Checkmate   |
/// | no       | no        | Stalemate   |
/// | yes      | yes       | Check       |
/// | no       | yes       | Ongoing     |
pub fn evaluate(board: &Board, current_player: Color) -> Status {
    let in_check = king_in_check(board, current_player).is_some();
    let has_moves = has_any_legal_move(board, current_player);

    match (in_check, has_moves) {
        (true, false) => Status::Checkmate {
            winner: current_player.opposite(),
        },
        (false, false) => Status::Stalemate,
        (true, true) => Status::Check(current_player),
        (false, true) => Status::Ongoing,
    }
}
