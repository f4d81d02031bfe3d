use chess_rules::check::king_in_check;
use chess_rules::legal::{all_legal_moves, has_any_legal_move, is_legal};
use chess_rules::rules::is_pseudo_legal;
use chess_rules::{Board, Color, Piece, PieceKind, Position, RandomAi};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sq(s: &str) -> Position {
    s.parse().unwrap()
}

fn put(board: &mut Board, at: &str, kind: PieceKind, color: Color) {
    board.place(sq(at), Some(Piece::new(kind, color)));
}

#[test]
fn starting_position_has_moves_and_no_check() {
    let board = Board::new();
    assert!(has_any_legal_move(&board, Color::White));
    assert_eq!(king_in_check(&board, Color::White), None);
}

#[test]
fn obstructed_slides_are_never_legal() {
    // Every rook/bishop/queen move on the opening board that would pass
    // through an occupied square must be rejected.
    let board = Board::new();
    for (from, piece) in board.pieces() {
        if !matches!(piece.kind, PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen) {
            continue;
        }
        for to in Position::all() {
            let dr = to.row as i32 - from.row as i32;
            let dc = to.col as i32 - from.col as i32;
            let straight = dr == 0 || dc == 0;
            let diagonal = dr.abs() == dc.abs();
            if to == from || !(straight || diagonal) {
                continue;
            }
            let (sr, sc) = (dr.signum(), dc.signum());
            let mut blocked = false;
            let mut cur = from.offset(sr, sc).unwrap();
            while cur != to {
                if board.piece_at(cur).is_some() {
                    blocked = true;
                }
                cur = cur.offset(sr, sc).unwrap();
            }
            if blocked {
                assert!(!is_legal(&board, from, to), "{} {} -> {}", piece.kind, from, to);
            }
        }
    }
    // Nothing but knights and pawns can move at the start.
    assert!(all_legal_moves(&board, Color::White).iter().all(|mv| {
        matches!(
            board.piece_at(mv.from).map(|p| p.kind),
            Some(PieceKind::Knight) | Some(PieceKind::Pawn)
        )
    }));
}

#[test]
fn no_legal_move_exposes_the_king() {
    // Random games: every legal move, once simulated, leaves the mover safe.
    let ai = RandomAi::new();
    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::new();
        let mut color = Color::White;
        for _ in 0..60 {
            let moves = all_legal_moves(&board, color);
            for mv in &moves {
                let after = board.simulate(mv.from, mv.to);
                assert_eq!(king_in_check(&after, color), None, "{} leaves king hanging", mv);
            }
            let mv = match ai.choose_move(&board, color, &mut rng) {
                Some(mv) => mv,
                None => break,
            };
            board.move_piece(mv.from, mv.to);
            color = color.opposite();
        }
    }
}

#[test]
fn snapshot_round_trip_after_simulated_moves() {
    let mut board = Board::new();
    board.move_piece(sq("e2"), sq("e4"));
    let before = board;
    let snap = board.snapshot();

    let mut rng = StdRng::seed_from_u64(5);
    let ai = RandomAi::new();
    let mut color = Color::Black;
    for _ in 0..10 {
        if let Some(mv) = ai.choose_move(&board, color, &mut rng) {
            board.move_piece(mv.from, mv.to);
        }
        color = color.opposite();
    }
    board.restore(&snap);
    assert_eq!(board, before);
}

#[test]
fn pseudo_legal_but_illegal_when_pinned() {
    let mut board = Board::empty();
    put(&mut board, "e1", PieceKind::King, Color::White);
    put(&mut board, "e3", PieceKind::Knight, Color::White);
    put(&mut board, "e7", PieceKind::Queen, Color::Black);
    put(&mut board, "a8", PieceKind::King, Color::Black);

    assert!(is_pseudo_legal(&board, sq("e3"), sq("f5")));
    assert!(!is_legal(&board, sq("e3"), sq("f5")));
}

#[test]
fn in_check_only_resolving_moves_are_legal() {
    let mut board = Board::empty();
    put(&mut board, "e1", PieceKind::King, Color::White);
    put(&mut board, "a4", PieceKind::Rook, Color::White);
    put(&mut board, "e8", PieceKind::Rook, Color::Black);
    put(&mut board, "h8", PieceKind::King, Color::Black);

    let moves = all_legal_moves(&board, Color::White);
    // Block on e4, or step off the file.
    assert!(moves.iter().any(|m| m.from == sq("a4") && m.to == sq("e4")));
    assert!(moves
        .iter()
        .filter(|m| m.from == sq("a4"))
        .all(|m| m.to == sq("e4")));
    assert!(!moves.iter().any(|m| m.to == sq("e2")));
}
