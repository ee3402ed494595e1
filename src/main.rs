use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use xfchess_rules::core::{load_settings, GameSettings};
use xfchess_rules::{Game, GameStatus, MoveRequest};

#[derive(Parser, Debug)]
#[command(about = "Replay chess moves through the XFChess rules engine", author, version)]
struct CmdArgs {
    /// JSON settings file (rule limits, default promotion)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Start from this FEN instead of the standard position
    #[arg(long, value_name = "FEN")]
    fen: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Moves in coordinate notation, e.g. e2e4 e7e5 g1f3 or e7e8q
    moves: Vec<String>,
}

#[derive(Serialize)]
struct Report {
    transcript: String,
    status: GameStatus,
    result: &'static str,
    fen: String,
    moves: Vec<String>,
    rejected: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CmdArgs::parse();

    let settings = match &args.settings {
        Some(path) => load_settings(path),
        None => GameSettings::default(),
    };

    let mut game = match &args.fen {
        Some(fen) => Game::from_fen(fen, settings)
            .with_context(|| format!("could not set up position {fen:?}"))?,
        None => Game::with_settings(settings).context("could not start a game")?,
    };

    let mut rejected = Vec::new();
    for text in &args.moves {
        if !game.status().can_accept() {
            warn!("[CLI] Game is over ({}); ignoring {}", game.status(), text);
            rejected.push(text.clone());
            continue;
        }

        let request = MoveRequest::from_coordinates(text)
            .with_context(|| format!("malformed move {text:?}"))?;
        if game.submit(request)?.is_none() {
            warn!("[CLI] Illegal move {} for {}", text, game.side_to_move());
            rejected.push(text.clone());
        }
    }

    info!("[CLI] Final status: {}", game.status());

    let report = Report {
        transcript: game.transcript(),
        status: game.status(),
        result: game.result_token(),
        fen: game.to_fen(),
        moves: game
            .history()
            .iter()
            .map(|record| record.notation().to_string())
            .collect(),
        rejected,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.transcript);
        println!("Status: {}", report.status.message());
        println!("FEN: {}", report.fen);
        if !report.rejected.is_empty() {
            println!("Rejected: {}", report.rejected.join(" "));
        }
    }

    Ok(())
}
