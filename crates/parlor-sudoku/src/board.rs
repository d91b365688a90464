use parlor_core::{Digit, Position};
use parlor_source::sudoku_dto::SudokuPuzzle;

/// The state of one Sudoku cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum CellState {
    /// A clue pre-filled by the puzzle, immutable by the player.
    Given(Digit),
    /// A digit entered by the player.
    Filled(Digit),
    /// No digit.
    Empty,
}

impl CellState {
    /// Returns the digit in the cell, if any.
    #[must_use]
    pub fn digit(self) -> Option<Digit> {
        match self {
            Self::Given(digit) | Self::Filled(digit) => Some(digit),
            Self::Empty => None,
        }
    }
}

/// Errors raised by board mutations.
///
/// The session layer swallows these as silent no-ops; they exist so the
/// immutability rules are enforced in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// Attempted to write or clear a given cell.
    #[display("cannot modify a given cell")]
    CannotModifyGivenCell,
    /// Position outside the 9×9 grid.
    #[display("position outside the 9x9 grid")]
    OutOfBounds,
}

/// A 9×9 Sudoku board: given and player-filled cells plus the solution.
///
/// The board is replaced wholesale on every new game; it is never merged
/// with a previous puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[CellState; 9]; 9],
    solution: [[Digit; 9]; 9],
}

impl Board {
    /// Creates a board from a validated puzzle, all clues marked as givens.
    #[must_use]
    pub fn new(puzzle: &SudokuPuzzle) -> Self {
        let mut cells = [[CellState::Empty; 9]; 9];
        for (row, clues) in puzzle.givens.iter().enumerate() {
            for (col, clue) in clues.iter().enumerate() {
                if let Some(digit) = clue {
                    cells[row][col] = CellState::Given(*digit);
                }
            }
        }
        Self {
            cells,
            solution: puzzle.solution,
        }
    }

    fn check_bounds(pos: Position) -> Result<(), BoardError> {
        if pos.row < 9 && pos.col < 9 {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds)
        }
    }

    /// Returns the state of the cell at `pos`.
    ///
    /// Out-of-bounds positions read as [`CellState::Empty`]; mutation paths
    /// reject them explicitly instead.
    #[must_use]
    pub fn cell(&self, pos: Position) -> CellState {
        if Self::check_bounds(pos).is_err() {
            return CellState::Empty;
        }
        self.cells[pos.row][pos.col]
    }

    /// Returns the solution digit for `pos`, or `None` out of bounds.
    #[must_use]
    pub fn solution(&self, pos: Position) -> Option<Digit> {
        Self::check_bounds(pos).ok()?;
        Some(self.solution[pos.row][pos.col])
    }

    /// Returns true if `pos` is in bounds and not a given cell.
    #[must_use]
    pub fn is_editable(&self, pos: Position) -> bool {
        Self::check_bounds(pos).is_ok() && !self.cells[pos.row][pos.col].is_given()
    }

    /// Writes a player digit at `pos`, overwriting any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CannotModifyGivenCell`] for given cells and
    /// [`BoardError::OutOfBounds`] outside the grid.
    pub fn set_digit(&mut self, pos: Position, digit: Digit) -> Result<(), BoardError> {
        Self::check_bounds(pos)?;
        match self.cells[pos.row][pos.col] {
            CellState::Given(_) => Err(BoardError::CannotModifyGivenCell),
            CellState::Filled(_) | CellState::Empty => {
                self.cells[pos.row][pos.col] = CellState::Filled(digit);
                Ok(())
            }
        }
    }

    /// Clears the player digit at `pos`. Clearing an empty cell is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CannotModifyGivenCell`] for given cells and
    /// [`BoardError::OutOfBounds`] outside the grid.
    pub fn clear_cell(&mut self, pos: Position) -> Result<(), BoardError> {
        Self::check_bounds(pos)?;
        match self.cells[pos.row][pos.col] {
            CellState::Given(_) => Err(BoardError::CannotModifyGivenCell),
            CellState::Filled(_) | CellState::Empty => {
                self.cells[pos.row][pos.col] = CellState::Empty;
                Ok(())
            }
        }
    }

    /// Returns true if any editable cell holds a player entry.
    ///
    /// This is the "in-progress work" test gating new-game confirmation.
    #[must_use]
    pub fn has_player_entries(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .any(|cell| cell.is_filled())
    }

    /// Iterates every position of the grid in row-major order.
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..9).flat_map(|row| (0..9).map(move |col| Position::new(row, col)))
    }
}
