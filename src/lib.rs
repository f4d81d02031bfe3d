//////////////////////////
// lib.rs
//////////////////////////

pub mod ai;
pub mod board;
pub mod check;
pub mod config;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod legal;
pub mod rules;
pub mod session;
pub mod types;

pub use ai::RandomAi;
pub use board::{Board, BoardSnapshot};
pub use config::SessionConfig;
pub use driver::{EventSink, GameDriver, NullSink, Scheduler, TokioScheduler};
pub use error::{BoardError, ConfigError, MoveError, ParseError};
pub use session::{AiTicket, GameEvent, MoveOutcome, MoveRecord, Session};
pub use types::*;
