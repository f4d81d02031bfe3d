//////////////////////////
// ai.rs
//////////////////////////

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::board::Board;
use crate::legal::all_legal_moves;
use crate::types::*;

/// Baseline opponent: a uniformly random legal move. No evaluation, no
/// look-ahead; the difficulty a session stores is not consulted here.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAi;

impl RandomAi {
    pub fn new() -> Self {
        RandomAi
    }

    /// `None` when `color` has no legal move. The evaluator has already
    /// flagged mate or stalemate by then, so callers simply do nothing.
    pub fn choose_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        color: Color,
        rng: &mut R,
    ) -> Option<Move> {
        let moves = all_legal_moves(board, color);
        debug!(%color, candidates = moves.len(), "random ai choosing");
        moves.choose(rng).copied()
    }
}
