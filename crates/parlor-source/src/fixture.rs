//! Canned puzzle source for tests and the demo driver.

use log::debug;

use crate::{
    LoadError, LoadRequest, LoadResponse, PuzzleSource,
    sudoku_dto::SudokuPuzzleDto,
    trivia_dto::{TriviaBatchDto, TriviaQuestionDto},
    wordsearch_dto::WordSearchPuzzleDto,
};

/// A [`PuzzleSource`] answering from canned data.
///
/// Defaults to the built-in [`fixtures`]; individual services can be
/// overridden with custom payloads or forced failures to exercise the
/// engines' `LoadFailed` paths.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    sudoku: Result<SudokuPuzzleDto, LoadError>,
    wordsearch: Result<WordSearchPuzzleDto, LoadError>,
    trivia: Result<TriviaBatchDto, LoadError>,
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureSource {
    /// Creates a source serving the built-in fixtures for every service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sudoku: Ok(fixtures::sudoku()),
            wordsearch: Ok(fixtures::wordsearch()),
            trivia: Ok(fixtures::trivia(10)),
        }
    }

    /// Creates a source where every service is unreachable.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sudoku: Err(LoadError::Unreachable),
            wordsearch: Err(LoadError::Unreachable),
            trivia: Err(LoadError::Unreachable),
        }
    }

    /// Overrides the Sudoku service outcome.
    #[must_use]
    pub fn with_sudoku(mut self, outcome: Result<SudokuPuzzleDto, LoadError>) -> Self {
        self.sudoku = outcome;
        self
    }

    /// Overrides the word-search service outcome.
    #[must_use]
    pub fn with_wordsearch(mut self, outcome: Result<WordSearchPuzzleDto, LoadError>) -> Self {
        self.wordsearch = outcome;
        self
    }

    /// Overrides the trivia service outcome.
    #[must_use]
    pub fn with_trivia(mut self, outcome: Result<TriviaBatchDto, LoadError>) -> Self {
        self.trivia = outcome;
        self
    }
}

impl PuzzleSource for FixtureSource {
    fn fetch(&mut self, request: &LoadRequest) -> Result<LoadResponse, LoadError> {
        debug!("fixture source serving {request:?}");
        match request {
            LoadRequest::Sudoku { .. } => self.sudoku.clone().map(LoadResponse::Sudoku),
            LoadRequest::WordSearch { .. } => {
                self.wordsearch.clone().map(LoadResponse::WordSearch)
            }
            LoadRequest::Trivia { amount, .. } => {
                let batch = self.trivia.clone()?;
                let mut questions = batch.questions;
                questions.truncate(*amount);
                Ok(LoadResponse::Trivia(TriviaBatchDto { questions }))
            }
        }
    }
}

/// Built-in puzzle fixtures with stable, test-friendly content.
pub mod fixtures {
    use parlor_core::Difficulty;

    use super::{SudokuPuzzleDto, TriviaBatchDto, TriviaQuestionDto, WordSearchPuzzleDto};
    use crate::sudoku_dto::parse_grid;

    /// A fully solved reference grid.
    pub const SOLVED_GRID: &str =
        "185362947793148526246795183564239871931874265827516394318427659672951438459683712";

    /// A Sudoku pair with a handful of editable cells along the first row.
    #[must_use]
    pub fn sudoku() -> SudokuPuzzleDto {
        sudoku_with_blanks(&[(0, 0), (0, 2), (1, 1), (4, 4), (8, 8)])
    }

    /// A Sudoku pair with exactly the given cells blanked out.
    ///
    /// # Panics
    ///
    /// Panics if a blank coordinate is out of the 9×9 range (fixture misuse).
    #[must_use]
    pub fn sudoku_with_blanks(blanks: &[(usize, usize)]) -> SudokuPuzzleDto {
        let solution = parse_grid(SOLVED_GRID).expect("reference grid is well formed");
        let mut puzzle = solution;
        for &(row, col) in blanks {
            puzzle[row][col] = 0;
        }
        SudokuPuzzleDto { puzzle, solution }
    }

    /// A 5×5 word-search grid embedding CAT (east), DOG (east), SUN (south),
    /// and MOON (southeast from row 1).
    #[must_use]
    pub fn wordsearch() -> WordSearchPuzzleDto {
        WordSearchPuzzleDto {
            grid: vec![
                vec!['X', 'C', 'A', 'T', 'S'],
                vec!['M', 'O', 'Z', 'K', 'U'],
                vec!['D', 'O', 'G', 'P', 'N'],
                vec!['H', 'J', 'O', 'Q', 'R'],
                vec!['W', 'E', 'B', 'N', 'L'],
            ],
            words: vec![
                "CAT".to_owned(),
                "DOG".to_owned(),
                "SUN".to_owned(),
                "MOON".to_owned(),
            ],
        }
    }

    /// A deterministic batch of `amount` arithmetic questions.
    #[must_use]
    pub fn trivia(amount: usize) -> TriviaBatchDto {
        let questions = (0..amount)
            .map(|i| TriviaQuestionDto {
                question: format!("What is {i} + {i}?"),
                category: "Mathematics".to_owned(),
                difficulty: match i % 3 {
                    0 => Difficulty::Easy,
                    1 => Difficulty::Medium,
                    _ => Difficulty::Hard,
                },
                correct_answer: (i + i).to_string(),
                incorrect_answers: vec![
                    (i + i + 1).to_string(),
                    (i + i + 2).to_string(),
                    (i * 3 + 1).to_string(),
                ],
            })
            .collect();
        TriviaBatchDto { questions }
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::Difficulty;

    use super::{FixtureSource, fixtures};
    use crate::{LoadError, LoadRequest, LoadResponse, PuzzleSource};

    #[test]
    fn built_in_fixtures_pass_their_own_validation() {
        assert!(fixtures::sudoku().validate().is_ok());
        assert!(fixtures::wordsearch().validate().is_ok());
        assert!(fixtures::trivia(5).validate().is_ok());
    }

    #[test]
    fn fetch_serves_matching_variant() {
        let mut source = FixtureSource::new();
        let response = source
            .fetch(&LoadRequest::Sudoku {
                difficulty: Difficulty::Medium,
            })
            .unwrap();
        assert!(matches!(response, LoadResponse::Sudoku(_)));
    }

    #[test]
    fn trivia_fetch_honors_amount() {
        let mut source = FixtureSource::new();
        let response = source
            .fetch(&LoadRequest::Trivia {
                amount: 3,
                category: None,
                difficulty: None,
            })
            .unwrap();
        let LoadResponse::Trivia(batch) = response else {
            panic!("expected trivia batch");
        };
        assert_eq!(batch.questions.len(), 3);
    }

    #[test]
    fn failing_source_reports_unreachable() {
        let mut source = FixtureSource::failing();
        let result = source.fetch(&LoadRequest::WordSearch {
            theme: "animals".to_owned(),
            size: 12,
        });
        assert_eq!(result.unwrap_err(), LoadError::Unreachable);
    }
}
