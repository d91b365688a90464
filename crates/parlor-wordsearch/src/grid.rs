use parlor_core::Position;
use parlor_source::wordsearch_dto::WordSearchPuzzle;

/// An immutable square grid of uppercase letters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LetterGrid {
    size: usize,
    cells: Vec<Vec<char>>,
}

impl LetterGrid {
    /// Creates a grid from a validated puzzle payload.
    #[must_use]
    pub fn new(puzzle: &WordSearchPuzzle) -> Self {
        Self {
            size: puzzle.size,
            cells: puzzle.grid.clone(),
        }
    }

    /// Side length of the grid.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if `pos` lies inside the grid.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Returns the letter at `pos`, or `None` out of bounds.
    #[must_use]
    pub fn letter(&self, pos: Position) -> Option<char> {
        self.contains(pos)
            .then(|| self.cells[pos.row][pos.col])
    }

    /// Reads the letters along a path of in-bounds cells into a string.
    #[must_use]
    pub fn read_word(&self, path: &[Position]) -> String {
        path.iter().filter_map(|&pos| self.letter(pos)).collect()
    }

    /// Row-major access to the letter matrix, for rendering.
    #[must_use]
    pub fn rows(&self) -> &[Vec<char>] {
        &self.cells
    }
}
