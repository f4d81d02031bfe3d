//////////////////////////
// board.rs
//////////////////////////

use colored::Colorize;
use std::fmt;

use crate::error::BoardError;
use crate::types::*;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The 8x8 grid, indexed `[row][col]`. Each cell owns at most one piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

/// A full copy of a board taken by [`Board::snapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardSnapshot(Board);

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// A board in the standard starting layout.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.initialize();
        board
    }

    pub fn empty() -> Self {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    /// Resets to the standard layout: Black on rows 0-1, White on rows 6-7.
    pub fn initialize(&mut self) {
        self.cells = [[None; 8]; 8];
        for (col, kind) in BACK_RANK.iter().enumerate() {
            self.cells[0][col] = Some(Piece::new(*kind, Color::Black));
            self.cells[1][col] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            self.cells[6][col] = Some(Piece::new(PieceKind::Pawn, Color::White));
            self.cells[7][col] = Some(Piece::new(*kind, Color::White));
        }
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.cells[pos.row][pos.col]
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    /// Overwrites a cell, returning whatever was there.
    pub fn place(&mut self, pos: Position, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.cells[pos.row][pos.col], piece)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot(*self)
    }

    /// Rolls the board back to a snapshot, discarding every change made since.
    pub fn restore(&mut self, snapshot: &BoardSnapshot) {
        *self = snapshot.0;
    }

    /// Moves the piece on `from` to `to`, emptying `from` and marking the
    /// piece as moved. Returns the captured piece, if any.
    pub fn move_piece(&mut self, from: Position, to: Position) -> Option<Piece> {
        let moving = self.place(from, None).map(|mut p| {
            p.has_moved = true;
            p
        });
        self.place(to, moving)
    }

    /// A copy of this board with the piece on `from` placed on `to`.
    /// `self` is never touched.
    pub fn simulate(&self, from: Position, to: Position) -> Board {
        let mut scratch = *self;
        let moving = scratch.place(from, None);
        scratch.place(to, moving);
        scratch
    }

    /// Occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.piece_at(pos).map(|p| (pos, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn king_count(&self, color: Color) -> usize {
        self.pieces_of(color)
            .filter(|(_, p)| p.kind == PieceKind::King)
            .count()
    }

    /// Checks the one-king-per-side contract.
    pub fn validate(&self) -> Result<(), BoardError> {
        let white = self.king_count(Color::White);
        let black = self.king_count(Color::Black);
        if white != 1 || black != 1 {
            return Err(BoardError::KingCount { white, black });
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for file in 0..8 {
            write!(f, " {} ", ((file as u8 + b'a') as char).to_string().cyan())?;
        }
        writeln!(f)?;
        writeln!(f, "  {}", "─".repeat(24).bright_magenta())?;

        for row in 0..8 {
            let rank = (8 - row).to_string();
            write!(f, "{} {}", rank.cyan(), "│".bright_magenta())?;
            for col in 0..8 {
                let symbol = match self.cells[row][col] {
                    Some(piece) if piece.color == Color::White => {
                        piece.symbol().to_string().bright_red()
                    }
                    Some(piece) => piece.symbol().to_string().bright_blue(),
                    None => "·".bright_magenta(),
                };
                write!(f, " {} ", symbol)?;
            }
            writeln!(f, "{} {}", "│".bright_magenta(), rank.cyan())?;
        }

        writeln!(f, "  {}", "─".repeat(24).bright_magenta())?;
        write!(f, "  ")?;
        for file in 0..8 {
            write!(f, " {} ", ((file as u8 + b'a') as char).to_string().cyan())?;
        }
        writeln!(f)
    }
}
