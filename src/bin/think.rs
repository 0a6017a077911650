use anyhow::{Context, Result};
use clap::Parser;
use piesearch::{CozyPosition, EngineConfig, Searcher};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "piesearch-think", author, version, about = "Pick a move for a chess position")]
struct Args {
    /// Starting FEN (defaults to the initial position)
    #[arg(long)]
    fen: Option<String>,

    /// Moves to play from the start position, in UCI notation
    #[arg(long, num_args = 1..)]
    moves: Vec<String>,

    /// Remaining clock in milliseconds
    #[arg(long, default_value_t = 60_000)]
    movetime: u64,

    /// Fixed search depth; ignores the clock
    #[arg(long)]
    depth: Option<u32>,

    /// JSON engine config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for move-ordering tie breaks
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective config as JSON before searching
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.search.seed = seed;
        config.search.randomize_ties = true;
    }
    if args.dump_config { println!("{}", config.to_json_string()?); }

    let mut pos = CozyPosition::from_moves(args.fen.as_deref(), &args.moves).context("setting up position")?;
    let mut searcher = Searcher::new(config);
    if let Some(seed) = args.seed { searcher.reseed(seed); }
    let result = match args.depth {
        Some(d) => searcher.search_depth(&mut pos, d),
        None => searcher.think(&mut pos, Duration::from_millis(args.movetime)),
    };

    match result.best_move {
        Some(mv) => {
            println!("info depth {} score cp {} nodes {}", result.depth, result.score, result.nodes);
            println!("bestmove {mv}");
        }
        None => println!("bestmove (none)"),
    }
    Ok(())
}
