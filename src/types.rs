//////////////////////////
// types.rs
//////////////////////////

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Kinds a pawn may become on the far rank.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Resolves a promotion request. Anything outside queen/rook/bishop/knight,
    /// including no request at all, becomes a queen.
    pub fn promotion_or_queen(requested: Option<PieceKind>) -> PieceKind {
        match requested {
            Some(kind) if Self::PROMOTIONS.contains(&kind) => kind,
            _ => PieceKind::Queen,
        }
    }

    /// Same as [`PieceKind::promotion_or_queen`] but for free text such as
    /// "knight", "N" or "rook ".
    pub fn promotion_from_str(choice: &str) -> PieceKind {
        Self::promotion_or_queen(choice.parse().ok())
    }

    pub fn letter(&self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

impl FromStr for PieceKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "pawn" => Ok(PieceKind::Pawn),
            "n" | "knight" => Ok(PieceKind::Knight),
            "b" | "bishop" => Ok(PieceKind::Bishop),
            "r" | "rook" => Ok(PieceKind::Rook),
            "q" | "queen" => Ok(PieceKind::Queen),
            "k" | "king" => Ok(PieceKind::King),
            other => Err(ParseError::PieceKind(other.to_string())),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward pawn step. White advances toward row 0.
    pub fn pawn_direction(&self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            has_moved: false,
        }
    }

    /// Uppercase for White, lowercase for Black.
    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.letter().to_ascii_uppercase(),
            Color::Black => self.kind.letter(),
        }
    }
}

/// A square on the 8x8 board. Row 0 is Black's back rank (rank 8),
/// row 7 is White's (rank 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    pub fn is_within_bounds(&self) -> bool {
        self.row < 8 && self.col < 8
    }

    /// Offsets the square, returning `None` when it would leave the board.
    pub fn offset(&self, d_row: i32, d_col: i32) -> Option<Position> {
        let row = self.row as i32 + d_row;
        let col = self.col as i32 + d_col;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Position::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// All 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..8).flat_map(|row| (0..8).map(move |col| Position::new(row, col)))
    }
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 2 {
            return Err(ParseError::Square(s.to_string()));
        }
        let col = match chars[0].to_ascii_lowercase() {
            c @ 'a'..='h' => (c as u8 - b'a') as usize,
            _ => return Err(ParseError::Square(s.to_string())),
        };
        let row = match chars[1] {
            r @ '1'..='8' => 8 - (r as u8 - b'0') as usize,
            _ => return Err(ParseError::Square(s.to_string())),
        };
        Ok(Position::new(row, col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (self.col as u8 + b'a') as char;
        write!(f, "{}{}", file, 8 - self.row)
    }
}

/// A move request. It only changes the board once it passes legality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    #[default]
    HumanVsHuman,
    HumanVsComputer,
}

/// Difficulty requested by the menu layer. Stored with the session, never
/// consulted by move selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ParseError::Difficulty(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ongoing,
    /// The given side is in check and has at least one legal reply.
    Check(Color),
    Checkmate { winner: Color },
    Stalemate,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Checkmate { .. } | Status::Stalemate)
    }

    /// Status line for a display layer, given the side to move.
    pub fn describe(&self, current_player: Color) -> String {
        match self {
            Status::Ongoing => format!("{}'s Turn", current_player),
            Status::Check(color) => format!("CHECK – {} King in danger", color),
            Status::Checkmate { winner } => format!("CHECKMATE – {} Wins", winner),
            Status::Stalemate => "STALEMATE – Draw".to_string(),
        }
    }
}
