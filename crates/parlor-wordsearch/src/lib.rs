//! The word-search session engine.
//!
//! [`LetterGrid`] holds the immutable letter matrix; [`SelectionPath`]
//! normalizes raw drag gestures into straight, contiguous cell runs; and
//! [`WordSearchSession`] ties them together with the target word list,
//! the found set, and forward/reverse match detection.

mod grid;
mod selection;
mod session;

pub use grid::LetterGrid;
pub use selection::SelectionPath;
pub use session::{
    DEFAULT_SIZE, MatchOutcome, WordSearchCellView, WordSearchCommand, WordSearchEvent,
    WordSearchPhase, WordSearchSave, WordSearchSession, WordSearchSnapshot, WordView,
};
