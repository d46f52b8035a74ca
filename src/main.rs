use std::io;
use std::path::PathBuf;

use anyhow::Context;
use cardchess::chess::game::{Game, GameOptions};
use cardchess::config::Rules;
use cardchess::Engine;
use clap::Parser;

/// Plays a game of card chess over stdin/stdout.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory with moves.json, pieces.json, board.json and cards.json.
    /// The standard rules are used when not set.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Seed for the deck shuffle.
    #[arg(long)]
    seed: Option<u64>,
    /// Cards dealt to each player at the start.
    #[arg(long, default_value_t = 3)]
    hand: usize,
    /// Cards drawn by the `draw` command.
    #[arg(long, default_value_t = 1)]
    draw: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    cardchess::print_engine_info();

    let rules = match &args.rules {
        Some(dir) => Rules::from_dir(dir)?,
        None => Rules::standard()?,
    };
    let options = GameOptions {
        initial_hand: args.hand,
        draw_count: args.draw,
        seed: args.seed,
    };
    let game = Game::new(rules, &options).context("inconsistent rules")?;

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut engine = Engine::new(game, &mut input, &mut output);
    engine.run()
}
