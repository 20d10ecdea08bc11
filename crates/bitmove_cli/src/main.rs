//! `bitmove`: position inspection and perft from the command line.

mod config;
mod report;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bitmove_core::{Color, PieceKind, Position, generate_pseudo_moves, perft, perft_divide};

use crate::config::Config;
use crate::report::PerftReport;

#[derive(Parser, Debug)]
#[command(name = "bitmove", version, about = "Bitboard chess move generation toolkit")]
struct Cli {
    /// Config file (defaults to ./bitmove.toml when it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Tracing filter, e.g. `debug` or `bitmove_core=trace` (RUST_LOG wins)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a position
    Board {
        /// FEN or `startpos`
        #[arg(long)]
        fen: Option<String>,
        /// Also print every per-color and per-kind bitboard
        #[arg(long)]
        bitboards: bool,
    },
    /// List the pseudo-legal moves of the side to move
    Moves {
        #[arg(long)]
        fen: Option<String>,
    },
    /// Apply moves in order and print the resulting position
    Play {
        #[arg(long)]
        fen: Option<String>,
        /// Moves in coordinate form, e.g. e2e4 e7e8q
        moves: Vec<String>,
    },
    /// Count pseudo-legal move paths to a fixed depth
    Perft {
        #[arg(long)]
        fen: Option<String>,
        #[arg(short, long)]
        depth: Option<u8>,
        /// Print per-root-move counts
        #[arg(long)]
        divide: bool,
        /// Write a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let config = Config::load(cli.config.as_deref(), &cwd)?;
    init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level))?;
    debug!(?config, "loaded config");

    match cli.command {
        Command::Board { fen, bitboards } => {
            let pos = config.position(fen.as_deref())?;
            print_board(&pos, bitboards);
        }
        Command::Moves { fen } => {
            let pos = config.position(fen.as_deref())?;
            let moves = generate_pseudo_moves(&pos, pos.side_to_move());
            for mv in &moves {
                println!("{:<6} {:?}", mv.to_string(), mv.kind());
            }
            println!("total: {}", moves.len());
        }
        Command::Play { fen, moves } => {
            let mut pos = config.position(fen.as_deref())?;
            for text in &moves {
                let mv = pos
                    .parse_move(text)
                    .with_context(|| format!("cannot play '{text}' in {}", pos.to_fen()))?;
                pos.make_move(mv);
                debug!(%mv, fen = %pos.to_fen(), "played");
            }
            print_board(&pos, false);
        }
        Command::Perft {
            fen,
            depth,
            divide,
            json,
        } => {
            let mut pos = config.position(fen.as_deref())?;
            let depth = depth.unwrap_or(config.perft.depth);
            let divide = divide || config.perft.divide;
            run_perft(&mut pos, depth, divide, json)?;
        }
    }
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn print_board(pos: &Position, bitboards: bool) {
    println!("{pos}");
    println!("side to move: {:?}", pos.side_to_move());
    println!("castling:     {}", pos.castling());
    match pos.en_passant() {
        Some(sq) => println!("en passant:   {sq}"),
        None => println!("en passant:   -"),
    }
    println!("halfmove:     {}", pos.halfmove_clock());
    println!("fullmove:     {}", pos.fullmove_number());
    println!("hash:         {:016x}", pos.hash());
    println!("fen:          {}", pos.to_fen());

    if bitboards {
        for color in Color::ALL {
            println!("\n{color:?} pieces\n{}", pos.occupancy(color));
            for kind in PieceKind::ALL {
                println!("{color:?} {kind:?}\n{}", pos.pieces(color, kind));
            }
        }
    }
}

fn run_perft(pos: &mut Position, depth: u8, divide: bool, json: Option<PathBuf>) -> Result<()> {
    let fen = pos.to_fen();
    info!(%fen, depth, divide, "perft");

    let start = Instant::now();
    let (nodes, per_move) = if divide {
        let per_move = perft_divide(pos, depth, &|_: &Position| true);
        for (mv, n) in &per_move {
            println!("{mv}: {n}");
        }
        let total = if depth == 0 {
            1
        } else {
            per_move.iter().map(|(_, n)| n).sum::<u64>()
        };
        (total, per_move)
    } else {
        (perft(pos, depth), Vec::new())
    };
    let elapsed = start.elapsed();

    let report = PerftReport::new(fen, depth, nodes, elapsed).with_divide(&per_move);
    println!("\nnodes: {}", report.nodes);
    println!("time:  {:.3?}", elapsed);
    println!("nps:   {:.0}", report.nodes_per_second);

    if let Some(path) = json {
        report.save(&path)?;
        info!(path = %path.display(), "wrote perft report");
    }
    Ok(())
}
