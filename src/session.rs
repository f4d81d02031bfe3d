//////////////////////////
// session.rs
//////////////////////////

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ai::RandomAi;
use crate::board::Board;
use crate::check::king_in_check;
use crate::config::SessionConfig;
use crate::error::MoveError;
use crate::evaluator::evaluate;
use crate::legal::{is_last_rank, is_legal, legal_destinations};
use crate::types::*;

/// Identifies one scheduled computer turn. A restart bumps `generation` and
/// every commit bumps `turn`, so a ticket outlived by either is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AiTicket {
    pub generation: u64,
    pub turn: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promoted_to: Option<PieceKind>,
}

/// Notifications for a display/sound layer, drained with
/// [`Session::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    Moved(MoveRecord),
    PromotionRequired { at: Position },
    Check(Color),
    GameOver { status: Status, message: String },
    Restarted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub accepted: bool,
    pub status: Status,
    pub rejection: Option<MoveError>,
    /// Set by [`Session::request_move`] when the pawn needs a promotion
    /// choice before the move can be committed.
    pub promotion_required: bool,
    /// Present when the computer should answer next.
    pub ai_turn: Option<AiTicket>,
}

impl MoveOutcome {
    fn rejected(status: Status, error: MoveError) -> Self {
        MoveOutcome {
            accepted: false,
            status,
            rejection: Some(error),
            promotion_required: false,
            ai_turn: None,
        }
    }
}

/// One game in process memory: the board plus whose turn it is and whether
/// the game has ended. All changes go through the move methods or
/// [`Session::restart`].
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    current_player: Color,
    status: Status,
    game_over: bool,
    mode: GameMode,
    computer_color: Color,
    difficulty: Option<Difficulty>,
    generation: u64,
    turn: u32,
    pending_promotion: Option<Move>,
    history: Vec<MoveRecord>,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(mode: GameMode) -> Self {
        Self::with_config(&SessionConfig::new(mode))
    }

    pub fn with_config(config: &SessionConfig) -> Self {
        let mut session = Self::from_position(Board::new(), Color::White, config.mode);
        session.computer_color = config.computer_color;
        session.difficulty = config.difficulty;
        session
    }

    /// Starts from an arbitrary position with `current_player` to move. The
    /// status is evaluated straight away, so a mated or stalemated position
    /// yields a finished session.
    pub fn from_position(board: Board, current_player: Color, mode: GameMode) -> Self {
        if let Err(e) = board.validate() {
            warn!(error = %e, "session created from a board that breaks the king contract");
        }
        let status = evaluate(&board, current_player);
        Session {
            board,
            current_player,
            status,
            game_over: status.is_terminal(),
            mode,
            computer_color: Color::Black,
            difficulty: None,
            generation: 0,
            turn: 0,
            pending_promotion: None,
            history: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn computer_color(&self) -> Color {
        self.computer_color
    }

    pub fn set_computer_color(&mut self, color: Color) {
        self.computer_color = color;
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.difficulty = difficulty;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn pending_promotion(&self) -> Option<Move> {
        self.pending_promotion
    }

    /// Status line for a display layer.
    pub fn status_text(&self) -> String {
        self.status.describe(self.current_player)
    }

    /// The side to move's king square while it is in check.
    pub fn checked_king(&self) -> Option<Position> {
        king_in_check(&self.board, self.current_player)
    }

    pub fn is_computer_turn(&self) -> bool {
        self.mode == GameMode::HumanVsComputer && self.current_player == self.computer_color
    }

    /// Where the piece on `from` may go. Empty whenever the session would
    /// refuse a human move from that square.
    pub fn legal_destinations(&self, from: Position) -> Vec<Position> {
        if self.game_over
            || self.pending_promotion.is_some()
            || self.is_computer_turn()
            || !from.is_within_bounds()
        {
            return Vec::new();
        }
        match self.board.piece_at(from) {
            Some(p) if p.color == self.current_player => legal_destinations(&self.board, from),
            _ => Vec::new(),
        }
    }

    /// Ticket for a computer turn that is due right now, e.g. when the
    /// computer plays White and the game has just started.
    pub fn pending_ai_turn(&self) -> Option<AiTicket> {
        (!self.game_over && self.is_computer_turn()).then_some(self.ticket())
    }

    /// One-shot human move. A pawn reaching the far rank becomes `promotion`
    /// when that is a queen, rook, bishop or knight, otherwise a queen.
    pub fn apply_move(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    ) -> MoveOutcome {
        if self.is_computer_turn() && !self.game_over {
            debug!(%from, %to, "rejected: computer's turn");
            return MoveOutcome::rejected(self.status, MoveError::ComputerTurn);
        }
        self.commit(from, to, promotion)
    }

    /// First phase of a two-phase move. Commits like [`Session::apply_move`]
    /// unless a pawn would reach the far rank, in which case the move is
    /// held until [`Session::complete_promotion`] supplies the piece.
    pub fn request_move(&mut self, from: Position, to: Position) -> MoveOutcome {
        if self.is_computer_turn() && !self.game_over {
            return MoveOutcome::rejected(self.status, MoveError::ComputerTurn);
        }
        let piece = match self.validate(from, to) {
            Ok(piece) => piece,
            Err(e) => return self.reject(from, to, e),
        };
        if piece.kind == PieceKind::Pawn && is_last_rank(to) {
            self.pending_promotion = Some(Move::new(from, to));
            self.events.push(GameEvent::PromotionRequired { at: to });
            return MoveOutcome {
                accepted: false,
                status: self.status,
                rejection: None,
                promotion_required: true,
                ai_turn: None,
            };
        }
        self.commit(from, to, None)
    }

    /// Second phase: finishes the held move. Unknown choices become a queen.
    pub fn complete_promotion(&mut self, choice: &str) -> MoveOutcome {
        let pending = match self.pending_promotion.take() {
            Some(mv) => mv,
            None => return MoveOutcome::rejected(self.status, MoveError::NoPendingPromotion),
        };
        let kind = PieceKind::promotion_from_str(choice);
        self.commit(pending.from, pending.to, Some(kind))
    }

    pub fn cancel_promotion(&mut self) {
        self.pending_promotion = None;
    }

    /// Plays the computer's move for `ticket`. Returns `None` without
    /// touching anything when the ticket is stale, the game is over, or the
    /// computer has no move.
    pub fn play_ai_turn<R: Rng + ?Sized>(
        &mut self,
        ticket: AiTicket,
        rng: &mut R,
    ) -> Option<MoveOutcome> {
        if ticket != self.ticket() {
            warn!(?ticket, current = ?self.ticket(), "ignoring stale ai turn");
            return None;
        }
        if self.game_over || !self.is_computer_turn() {
            return None;
        }
        let mv = RandomAi::new().choose_move(&self.board, self.current_player, rng)?;
        info!(mv = %mv, color = %self.current_player, "computer plays");
        Some(self.commit(mv.from, mv.to, mv.promotion))
    }

    /// Fresh board, White to move. Any outstanding AI ticket goes stale.
    pub fn restart(&mut self) {
        self.board.initialize();
        self.current_player = Color::White;
        self.status = Status::Ongoing;
        self.game_over = false;
        self.generation += 1;
        self.turn = 0;
        self.pending_promotion = None;
        self.history.clear();
        self.events.push(GameEvent::Restarted);
        info!(generation = self.generation, "session restarted");
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn ticket(&self) -> AiTicket {
        AiTicket {
            generation: self.generation,
            turn: self.turn,
        }
    }

    fn validate(&self, from: Position, to: Position) -> Result<Piece, MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        if self.pending_promotion.is_some() {
            return Err(MoveError::PromotionPending);
        }
        if !from.is_within_bounds() || !to.is_within_bounds() {
            return Err(MoveError::IllegalMove { from, to });
        }
        let piece = self
            .board
            .piece_at(from)
            .ok_or(MoveError::NoPieceAtSource(from))?;
        if piece.color != self.current_player {
            return Err(MoveError::WrongColor(piece.color));
        }
        if !is_legal(&self.board, from, to) {
            return Err(MoveError::IllegalMove { from, to });
        }
        Ok(piece)
    }

    fn commit(&mut self, from: Position, to: Position, promotion: Option<PieceKind>) -> MoveOutcome {
        match self.try_commit(from, to, promotion) {
            Ok(()) => MoveOutcome {
                accepted: true,
                status: self.status,
                rejection: None,
                promotion_required: false,
                ai_turn: self.pending_ai_turn(),
            },
            Err(e) => self.reject(from, to, e),
        }
    }

    fn reject(&self, from: Position, to: Position, error: MoveError) -> MoveOutcome {
        if error == MoveError::GameOver {
            warn!(%from, %to, "move attempted after the game ended");
        } else {
            debug!(%from, %to, error = %error, "move rejected");
        }
        MoveOutcome::rejected(self.status, error)
    }

    fn try_commit(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    ) -> Result<(), MoveError> {
        let piece = self.validate(from, to)?;
        let captured = self.board.move_piece(from, to);

        let mut promoted_to = None;
        if piece.kind == PieceKind::Pawn && is_last_rank(to) {
            let kind = PieceKind::promotion_or_queen(promotion);
            self.board.place(
                to,
                Some(Piece {
                    kind,
                    color: piece.color,
                    has_moved: true,
                }),
            );
            promoted_to = Some(kind);
        }

        let record = MoveRecord {
            mv: Move {
                from,
                to,
                promotion: promoted_to,
            },
            piece,
            captured,
            promoted_to,
        };
        debug!(mv = %record.mv, capture = captured.is_some(), "move committed");
        self.history.push(record);
        self.events.push(GameEvent::Moved(record));

        self.current_player = self.current_player.opposite();
        self.turn += 1;
        self.status = evaluate(&self.board, self.current_player);
        self.game_over = self.status.is_terminal();

        match self.status {
            Status::Check(color) => self.events.push(GameEvent::Check(color)),
            status if status.is_terminal() => {
                let message = status.describe(self.current_player);
                info!(%message, "game over");
                self.events.push(GameEvent::GameOver { status, message });
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn new_session_white_to_move() {
        let session = Session::new(GameMode::HumanVsHuman);
        assert_eq!(session.current_player(), Color::White);
        assert_eq!(session.status(), Status::Ongoing);
        assert!(!session.is_game_over());
        assert_eq!(session.status_text(), "White's Turn");
    }

    #[test]
    fn turns_alternate() {
        let mut session = Session::new(GameMode::HumanVsHuman);
        assert!(session.apply_move(sq("e2"), sq("e4"), None).accepted);
        assert_eq!(session.current_player(), Color::Black);

        let out = session.apply_move(sq("d2"), sq("d4"), None);
        assert!(!out.accepted);
        assert_eq!(out.rejection, Some(MoveError::WrongColor(Color::White)));

        assert!(session.apply_move(sq("e7"), sq("e5"), None).accepted);
        assert_eq!(session.current_player(), Color::White);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut session = Session::new(GameMode::HumanVsHuman);
        let before = *session.board();
        let out = session.apply_move(sq("a1"), sq("a5"), None);
        assert!(!out.accepted);
        assert_eq!(out.rejection, Some(MoveError::IllegalMove { from: sq("a1"), to: sq("a5") }));
        assert_eq!(*session.board(), before);
        assert_eq!(session.current_player(), Color::White);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn human_cannot_move_for_the_computer() {
        let mut session = Session::new(GameMode::HumanVsComputer);
        let out = session.apply_move(sq("e2"), sq("e4"), None);
        assert!(out.accepted);
        let ticket = out.ai_turn.expect("computer should answer");

        let out = session.apply_move(sq("e7"), sq("e5"), None);
        assert_eq!(out.rejection, Some(MoveError::ComputerTurn));

        let mut rng = StdRng::seed_from_u64(3);
        let ai = session.play_ai_turn(ticket, &mut rng).unwrap();
        assert!(ai.accepted);
        assert_eq!(ai.ai_turn, None);
        assert_eq!(session.current_player(), Color::White);
    }

    #[test]
    fn stale_ticket_after_restart_is_ignored() {
        let mut session = Session::new(GameMode::HumanVsComputer);
        let ticket = session
            .apply_move(sq("e2"), sq("e4"), None)
            .ai_turn
            .unwrap();
        session.restart();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(session.play_ai_turn(ticket, &mut rng), None);
        assert_eq!(*session.board(), Board::new());
        assert_eq!(session.current_player(), Color::White);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn ticket_is_spent_once_used() {
        let mut session = Session::new(GameMode::HumanVsComputer);
        let ticket = session
            .apply_move(sq("d2"), sq("d4"), None)
            .ai_turn
            .unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        assert!(session.play_ai_turn(ticket, &mut rng).is_some());
        assert!(session.play_ai_turn(ticket, &mut rng).is_none());
    }

    #[test]
    fn computer_playing_white_is_due_at_start() {
        let mut config = SessionConfig::new(GameMode::HumanVsComputer);
        config.computer_color = Color::White;
        config.difficulty = Some(Difficulty::Hard);
        let session = Session::with_config(&config);
        assert_eq!(session.difficulty(), Some(Difficulty::Hard));
        assert_eq!(
            session.pending_ai_turn(),
            Some(AiTicket { generation: 0, turn: 0 })
        );
    }

    #[test]
    fn legal_destinations_only_for_side_to_move() {
        let session = Session::new(GameMode::HumanVsHuman);
        assert_eq!(session.legal_destinations(sq("g1")), vec![sq("f3"), sq("h3")]);
        assert!(session.legal_destinations(sq("g8")).is_empty());
        assert!(session.legal_destinations(sq("e4")).is_empty());
    }

    #[test]
    fn capture_is_recorded() {
        let mut session = Session::new(GameMode::HumanVsHuman);
        for (from, to) in [("e2", "e4"), ("d7", "d5"), ("e4", "d5")] {
            assert!(session.apply_move(sq(from), sq(to), None).accepted);
        }
        let last = session.history().last().unwrap();
        assert_eq!(last.captured.map(|p| p.kind), Some(PieceKind::Pawn));
        let events = session.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], GameEvent::Moved(r) if r.captured.is_some()));
    }
}
