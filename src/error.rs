//////////////////////////
// error.rs
//////////////////////////

use std::path::PathBuf;

use crate::types::{Color, Position};

/// Why a move request was turned down. A rejected request never changes
/// the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("The game is over")]
    GameOver,
    #[error("It is the computer's turn")]
    ComputerTurn,
    #[error("A promotion choice is still pending")]
    PromotionPending,
    #[error("No promotion is pending")]
    NoPendingPromotion,
    #[error("No piece at {0}")]
    NoPieceAtSource(Position),
    #[error("That piece belongs to {0}")]
    WrongColor(Color),
    #[error("Illegal move {from} -> {to}")]
    IllegalMove { from: Position, to: Position },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("Invalid number of kings: white={white}, black={black}")]
    KingCount { white: usize, black: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid square '{0}'")]
    Square(String),
    #[error("Unknown piece kind '{0}'")]
    PieceKind(String),
    #[error("Unknown difficulty '{0}'")]
    Difficulty(String),
    #[error("Invalid move format '{0}' - use 'e2e4' or 'e2 e4'")]
    MoveFormat(String),
}
