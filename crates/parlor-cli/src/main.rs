//! Scripted demo driver for the parlor session engines.
//!
//! Each subcommand runs one engine against the canned fixture source,
//! performing the commands the session emits and printing a snapshot
//! after every notable transition. The driver owns no game state; it is
//! the thin shell the engines are designed to sit behind.

use clap::{Parser, Subcommand, ValueEnum};
use parlor_core::Difficulty;

mod sudoku_demo;
mod trivia_demo;
mod wordsearch_demo;

#[derive(Debug, Parser)]
#[command(name = "parlor", version, about = "Scripted demo sessions for the parlor engines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a scripted Sudoku session.
    Sudoku {
        /// Puzzle difficulty to request.
        #[arg(long, value_enum, default_value_t = DifficultyArg::Medium)]
        difficulty: DifficultyArg,
    },
    /// Run a scripted word-search session.
    Wordsearch {
        /// Word-list theme to request.
        #[arg(long, default_value = "animals")]
        theme: String,
    },
    /// Run a scripted trivia round.
    Trivia {
        /// Number of questions in the round.
        #[arg(long, default_value_t = 3)]
        amount: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Hard => Self::Hard,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Sudoku { difficulty } => sudoku_demo::run(difficulty.into()),
        Command::Wordsearch { theme } => wordsearch_demo::run(&theme),
        Command::Trivia { amount } => trivia_demo::run(amount),
    }
}
