//! Wire format and validation for the Sudoku puzzle service.

use parlor_core::Digit;

use crate::LoadError;

/// Raw Sudoku payload: two parallel 9×9 matrices.
///
/// `puzzle` uses `0` for blank cells; `solution` must be fully solved.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SudokuPuzzleDto {
    /// Clue grid, `0` = blank.
    pub puzzle: [[u8; 9]; 9],
    /// Solved grid, values 1–9.
    pub solution: [[u8; 9]; 9],
}

/// A validated Sudoku puzzle, ready for a game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SudokuPuzzle {
    /// Clues; `None` marks an editable cell.
    pub givens: [[Option<Digit>; 9]; 9],
    /// Complete solution.
    pub solution: [[Digit; 9]; 9],
}

impl SudokuPuzzleDto {
    /// Validates the raw payload into an engine-ready puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Malformed`] when any value is out of range, the
    /// solution is incomplete or violates Sudoku row/column/box constraints,
    /// or a clue disagrees with the solution.
    pub fn validate(&self) -> Result<SudokuPuzzle, LoadError> {
        let mut givens = [[None; 9]; 9];
        let mut solution = [[Digit::ALL[0]; 9]; 9];

        for row in 0..9 {
            for col in 0..9 {
                let value = self.solution[row][col];
                solution[row][col] = Digit::new(value).ok_or_else(|| {
                    LoadError::malformed(format!("solution value {value} at ({row},{col})"))
                })?;

                let clue = self.puzzle[row][col];
                if clue != 0 {
                    let digit = Digit::new(clue).ok_or_else(|| {
                        LoadError::malformed(format!("clue value {clue} at ({row},{col})"))
                    })?;
                    if digit != solution[row][col] {
                        return Err(LoadError::malformed(format!(
                            "clue {clue} at ({row},{col}) disagrees with solution"
                        )));
                    }
                    givens[row][col] = Some(digit);
                }
            }
        }

        check_solved_grid(&solution)?;
        Ok(SudokuPuzzle { givens, solution })
    }
}

/// Checks that every row, column, and 3×3 box holds each digit exactly once.
fn check_solved_grid(solution: &[[Digit; 9]; 9]) -> Result<(), LoadError> {
    let mut houses: Vec<(&str, Vec<Digit>)> = Vec::with_capacity(27);
    for i in 0..9 {
        houses.push(("row", (0..9).map(|col| solution[i][col]).collect()));
        houses.push(("column", (0..9).map(|row| solution[row][i]).collect()));
        let (br, bc) = (3 * (i / 3), 3 * (i % 3));
        houses.push((
            "box",
            (0..9)
                .map(|j| solution[br + j / 3][bc + j % 3])
                .collect(),
        ));
    }
    for (kind, mut digits) in houses {
        digits.sort_unstable();
        digits.dedup();
        if digits.len() != 9 {
            return Err(LoadError::malformed(format!(
                "solution {kind} has duplicate digits"
            )));
        }
    }
    Ok(())
}

/// Parses an 81-character grid string (row-major; `.` or `0` = blank).
///
/// # Errors
///
/// Returns [`LoadError::Malformed`] for wrong lengths or non-digit characters.
pub fn parse_grid(text: &str) -> Result<[[u8; 9]; 9], LoadError> {
    let cells: Vec<u8> = text
        .chars()
        .map(|c| match c {
            '.' | '0' => Ok(0),
            '1'..='9' => Ok(c as u8 - b'0'),
            other => Err(LoadError::malformed(format!(
                "unexpected grid character {other:?}"
            ))),
        })
        .collect::<Result<_, _>>()?;
    if cells.len() != 81 {
        return Err(LoadError::malformed(format!(
            "grid string has {} cells (expected 81)",
            cells.len()
        )));
    }
    let mut grid = [[0; 9]; 9];
    for (index, value) in cells.into_iter().enumerate() {
        grid[index / 9][index % 9] = value;
    }
    Ok(grid)
}
