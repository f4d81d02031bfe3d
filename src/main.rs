//////////////////////////
// main.rs
//////////////////////////
//
// Terminal front end: a board printed after every move, moves typed as
// 'e2e4', and the computer answering through the driver's scheduled turn.

use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chess_rules::{
    Color, Difficulty, GameDriver, GameEvent, GameMode, ParseError, PieceKind, Position,
    SessionConfig, TokioScheduler,
};

const CONFIG_PATH: &str = "chess_config.json";

fn load_config() -> SessionConfig {
    if !Path::new(CONFIG_PATH).exists() {
        return SessionConfig::default();
    }
    match SessionConfig::load(CONFIG_PATH) {
        Ok(cfg) => {
            info!(path = CONFIG_PATH, "loaded config");
            cfg
        }
        Err(e) => {
            warn!(error = %e, "falling back to default config");
            SessionConfig::default()
        }
    }
}

/// Accepts "e2e4", "e2 e4" and an optional promotion letter: "e7e8n".
fn parse_move(input: &str) -> Result<(Position, Position, Option<PieceKind>), ParseError> {
    let compact: String = input.split_whitespace().collect();
    if !compact.is_ascii() || (compact.len() != 4 && compact.len() != 5) {
        return Err(ParseError::MoveFormat(input.to_string()));
    }
    let from = compact[0..2].parse()?;
    let to = compact[2..4].parse()?;
    let promotion = match compact.get(4..) {
        Some(rest) if !rest.is_empty() => Some(PieceKind::promotion_from_str(rest)),
        _ => None,
    };
    Ok((from, to, promotion))
}

fn read_line() -> Option<String> {
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn print_event(event: &GameEvent) {
    match event {
        GameEvent::Moved(record) => {
            let verb = if record.captured.is_some() { "takes on" } else { "to" };
            print!(
                "{} {} {} {} {}",
                record.piece.color,
                record.piece.kind,
                record.mv.from,
                verb,
                record.mv.to
            );
            if let Some(kind) = record.promoted_to {
                print!(" (promotes to {})", kind);
            }
            println!();
        }
        GameEvent::Check(color) => {
            println!("{}", format!("CHECK – {} King in danger", color).yellow().bold())
        }
        GameEvent::GameOver { message, .. } => println!("{}", message.bright_red().bold()),
        GameEvent::Restarted => println!("{}", "New game. White's Turn".green()),
        GameEvent::PromotionRequired { .. } => {}
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<GameEvent>) {
    while let Ok(event) = rx.try_recv() {
        print_event(&event);
    }
}

/// Waits for the computer's reply, printing everything that arrives.
async fn await_computer(rx: &mut mpsc::UnboundedReceiver<GameEvent>) {
    while let Some(event) = rx.recv().await {
        print_event(&event);
        if matches!(event, GameEvent::Moved(_)) {
            break;
        }
    }
    drain(rx);
}

async fn play_game(mut config: SessionConfig, mode: GameMode) {
    config.mode = mode;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = GameDriver::from_config(&config, TokioScheduler::current(), move |e: &GameEvent| {
        let _ = tx.send(e.clone());
    });

    if mode == GameMode::HumanVsComputer {
        println!("Playing against the computer (it plays {}).", config.computer_color);
        if driver.with_session(|s| s.pending_ai_turn()).is_some() {
            driver.start();
            await_computer(&mut rx).await;
        }
    }

    loop {
        driver.with_session(|s| {
            println!("\n{}", s.board());
            println!("{}", s.status_text().bold());
        });
        if driver.is_game_over() {
            println!("Type 'restart' for a new game or 'quit' to leave.");
        } else {
            print!("Move (e.g. 'e2e4'), 'moves e2', 'restart' or 'quit': ");
        }
        let line = match read_line() {
            Some(line) => line,
            None => break,
        };

        match line.as_str() {
            "" => continue,
            "quit" => break,
            "restart" => {
                driver.restart();
                drain(&mut rx);
                if driver.with_session(|s| s.is_computer_turn()) {
                    await_computer(&mut rx).await;
                }
                continue;
            }
            cmd if cmd.starts_with("moves ") => {
                match cmd.trim_start_matches("moves ").parse::<Position>() {
                    Ok(from) => {
                        let targets: Vec<String> = driver
                            .legal_destinations(from)
                            .iter()
                            .map(|p| p.to_string())
                            .collect();
                        if targets.is_empty() {
                            println!("No legal moves from {}", from);
                        } else {
                            println!("{} -> {}", from, targets.join(" ").green());
                        }
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                }
                continue;
            }
            _ => {}
        }

        let (from, to, promotion) = match parse_move(&line) {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("{}", e.to_string().red());
                continue;
            }
        };

        let mut outcome = match promotion {
            Some(kind) => driver.apply_move(from, to, Some(kind)),
            None => driver.request_move(from, to),
        };
        if outcome.promotion_required {
            print!("Promote to (queen, rook, bishop, knight): ");
            let choice = read_line().unwrap_or_default();
            outcome = driver.complete_promotion(&choice);
        }
        drain(&mut rx);

        if let Some(reason) = &outcome.rejection {
            println!("{}", format!("Move error: {}", reason).red());
            continue;
        }
        if outcome.ai_turn.is_some() {
            println!("{}", "Computer thinking...".dimmed());
            await_computer(&mut rx).await;
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config();
    println!("{}", "Chess".bright_magenta().bold());

    loop {
        println!("\nCommands:");
        println!("  play human                   - Two players at one terminal");
        println!("  play computer [level] [side]  - Play against the computer");
        println!("                                  level: easy|medium|hard, side: white|black");
        println!("  quit                         - Exit");
        print!("> ");

        let line = match read_line() {
            Some(line) => line,
            None => break,
        };
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("quit"), _) => break,
            (Some("play"), Some("human")) => play_game(config.clone(), GameMode::HumanVsHuman).await,
            (Some("play"), Some("computer")) => {
                let mut cfg = config.clone();
                for word in words {
                    match word {
                        "white" => cfg.computer_color = Color::Black,
                        "black" => cfg.computer_color = Color::White,
                        level => match level.parse::<Difficulty>() {
                            Ok(d) => cfg.difficulty = Some(d),
                            Err(e) => println!("{}", e.to_string().red()),
                        },
                    }
                }
                play_game(cfg, GameMode::HumanVsComputer).await;
            }
            (None, _) => continue,
            _ => println!("Unknown command: {}", line),
        }
    }
    println!("Goodbye!");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_moves() {
        let (from, to, promo) = parse_move("e2e4").unwrap();
        assert_eq!(from, Position::new(6, 4));
        assert_eq!(to, Position::new(4, 4));
        assert_eq!(promo, None);

        let (_, _, promo) = parse_move("e7 e8 n").unwrap();
        assert_eq!(promo, Some(PieceKind::Knight));

        let (_, _, promo) = parse_move("e7e8x").unwrap();
        assert_eq!(promo, Some(PieceKind::Queen));

        assert!(parse_move("e2").is_err());
        assert!(parse_move("z2e4").is_err());
    }
}
