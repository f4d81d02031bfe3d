//////////////////////////
// config.rs
//////////////////////////

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::{Color, Difficulty, GameMode};

/// Delay before the computer answers, long enough for a display layer to
/// repaint the human's move.
pub const DEFAULT_AI_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub computer_color: Color,
    pub ai_delay_ms: u64,
    pub difficulty: Option<Difficulty>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            mode: GameMode::HumanVsHuman,
            computer_color: Color::Black,
            ai_delay_ms: DEFAULT_AI_DELAY_MS,
            difficulty: None,
        }
    }
}

impl SessionConfig {
    pub fn new(mode: GameMode) -> Self {
        SessionConfig {
            mode,
            ..Default::default()
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let cfg = SessionConfig::from_json(r#"{ "mode": "human-vs-computer" }"#).unwrap();
        assert_eq!(cfg.mode, GameMode::HumanVsComputer);
        assert_eq!(cfg.computer_color, Color::Black);
        assert_eq!(cfg.ai_delay(), Duration::from_millis(500));
        assert_eq!(cfg.difficulty, None);
    }

    #[test]
    fn full_config_parses() {
        let cfg = SessionConfig::from_json(
            r#"{
                "mode": "human-vs-computer",
                "computer_color": "white",
                "ai_delay_ms": 0,
                "difficulty": "hard"
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.computer_color, Color::White);
        assert_eq!(cfg.ai_delay_ms, 0);
        assert_eq!(cfg.difficulty, Some(Difficulty::Hard));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SessionConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
