//! The Puzzle Source boundary.
//!
//! Every session engine consumes puzzle data produced by a remote service.
//! This crate defines the wire DTOs for the three services (Sudoku pair,
//! word-search grid, trivia batch), validation into engine-ready types,
//! the load-error taxonomy, and the request-ticket bookkeeping that gives
//! engines last-request-wins semantics over delayed responses.
//!
//! The engines never talk to a network; a shell dispatches [`LoadRequest`]s
//! to something implementing [`PuzzleSource`] and feeds the outcome back as
//! an engine event. [`FixtureSource`] is the canned implementation used by
//! tests and the demo driver.

mod fixture;
mod request;
pub mod sudoku_dto;
pub mod trivia_dto;
pub mod wordsearch_dto;

pub use fixture::{FixtureSource, fixtures};
pub use request::{RequestId, RequestTracker};

use parlor_core::Difficulty;

/// A request for fresh puzzle data, addressed to one of the three services.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoadRequest {
    /// Request a Sudoku puzzle/solution pair.
    Sudoku {
        /// Requested puzzle difficulty.
        difficulty: Difficulty,
    },
    /// Request a word-search letter grid with embedded words.
    WordSearch {
        /// Word-list theme tag (e.g. `"animals"`).
        theme: String,
        /// Grid side length.
        size: usize,
    },
    /// Request a batch of trivia questions.
    Trivia {
        /// Number of questions wanted.
        amount: usize,
        /// Category id, or `None` for any category.
        category: Option<String>,
        /// Difficulty filter, or `None` for any difficulty.
        difficulty: Option<Difficulty>,
    },
}

/// Raw puzzle data returned by a source, matching the request variant.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum LoadResponse {
    /// Sudoku puzzle/solution pair.
    Sudoku(sudoku_dto::SudokuPuzzleDto),
    /// Word-search grid and word list.
    WordSearch(wordsearch_dto::WordSearchPuzzleDto),
    /// Trivia question batch.
    Trivia(trivia_dto::TriviaBatchDto),
}

/// Why a puzzle load did not produce usable data.
///
/// Engines surface these as an explicit failed state with a retry action;
/// they never clear prior puzzle state on failure.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    /// The source could not be reached at all.
    #[display("puzzle source unreachable")]
    Unreachable,
    /// The source answered, but the payload failed validation.
    #[display("malformed puzzle data: {reason}")]
    Malformed {
        /// What the validation rejected.
        #[error(not(source))]
        reason: String,
    },
    /// The source answered with no usable content (e.g. zero questions).
    #[display("puzzle source returned no data")]
    Empty,
}

impl LoadError {
    /// Shorthand for a [`LoadError::Malformed`] with the given reason.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// A provider of puzzle data.
///
/// Implementations answer synchronously from the caller's point of view;
/// asynchrony lives in the shell, which is free to run the fetch elsewhere
/// and deliver the result as a later engine event.
pub trait PuzzleSource {
    /// Produces puzzle data for the request.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the source is unreachable or its payload
    /// is unusable.
    fn fetch(&mut self, request: &LoadRequest) -> Result<LoadResponse, LoadError>;
}
