//! Shared primitives for the Parlor mini-game engines.
//!
//! This crate holds the small typed values every session engine builds on:
//! grid coordinates and direction stepping, the Sudoku digit type, and the
//! difficulty scale shared by the Sudoku and trivia puzzle sources.

mod digit;
mod position;

pub use digit::{Digit, DigitOutOfRange};
pub use position::{Delta, Position};

/// Puzzle difficulty, shared by the Sudoku and trivia puzzle sources.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// The easiest setting.
    #[display("easy")]
    Easy,
    /// The default setting.
    #[display("medium")]
    Medium,
    /// The hardest setting.
    #[display("hard")]
    Hard,
}

impl Difficulty {
    /// Returns the lowercase tag used on the puzzle-source wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}
