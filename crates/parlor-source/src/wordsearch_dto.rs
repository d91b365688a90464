//! Wire format and validation for the word-search puzzle service.

use crate::LoadError;

/// Raw word-search payload: a square letter grid plus the target word list.
///
/// The service guarantees every listed word is embedded in the grid in some
/// straight direction; validation here is structural only.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WordSearchPuzzleDto {
    /// Square matrix of single uppercase letters.
    pub grid: Vec<Vec<char>>,
    /// Target words, each findable in the grid.
    pub words: Vec<String>,
}

/// A validated word-search puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSearchPuzzle {
    /// Side length of the square grid.
    pub size: usize,
    /// Letter matrix, `size` rows of `size` uppercase letters.
    pub grid: Vec<Vec<char>>,
    /// Target words in presentation order.
    pub words: Vec<String>,
}

impl WordSearchPuzzleDto {
    /// Validates the raw payload into an engine-ready puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Malformed`] when the grid is empty or not square,
    /// a cell is not an ASCII uppercase letter, the word list is empty, or a
    /// word is empty, not uppercase, or longer than the grid side (such a
    /// word could never be found in a straight line).
    pub fn validate(&self) -> Result<WordSearchPuzzle, LoadError> {
        let size = self.grid.len();
        if size == 0 {
            return Err(LoadError::malformed("empty letter grid"));
        }
        for (row, letters) in self.grid.iter().enumerate() {
            if letters.len() != size {
                return Err(LoadError::malformed(format!(
                    "row {row} has {} letters (expected {size})",
                    letters.len()
                )));
            }
            if let Some(letter) = letters.iter().find(|c| !c.is_ascii_uppercase()) {
                return Err(LoadError::malformed(format!(
                    "grid letter {letter:?} in row {row} is not an uppercase letter"
                )));
            }
        }

        if self.words.is_empty() {
            return Err(LoadError::malformed("empty word list"));
        }
        for word in &self.words {
            if word.is_empty() || !word.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(LoadError::malformed(format!(
                    "target word {word:?} is not an uppercase word"
                )));
            }
            if word.len() > size {
                return Err(LoadError::malformed(format!(
                    "target word {word:?} is longer than the grid side {size}"
                )));
            }
        }

        Ok(WordSearchPuzzle {
            size,
            grid: self.grid.clone(),
            words: self.words.clone(),
        })
    }
}
