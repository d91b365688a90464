/// A cell coordinate on a square puzzle grid.
///
/// Rows grow downward and columns grow rightward, both starting at zero.
/// Positions carry no grid size; bounds are checked by whoever owns the grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Position {
    /// Row index (0-based, top to bottom).
    pub row: usize,
    /// Column index (0-based, left to right).
    pub col: usize,
}

impl Position {
    /// Creates a position from row and column indices.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the position one step away in the given direction, or `None`
    /// if the step would leave the grid on the top or left edge.
    ///
    /// Bottom and right overflow is the owner's concern: the result is only
    /// bounded below by zero.
    #[must_use]
    pub fn step(self, delta: Delta) -> Option<Self> {
        let row = self.row.checked_add_signed(delta.row as isize)?;
        let col = self.col.checked_add_signed(delta.col as isize)?;
        Some(Self { row, col })
    }

    /// Returns the unit-step direction from `self` toward `target`.
    ///
    /// Each component is the sign of the coordinate difference, so the result
    /// is one of the eight compass directions or [`Delta::ZERO`] when the
    /// positions coincide. The direction is derived from the endpoints only;
    /// it does not require the target to lie on a straight line.
    #[must_use]
    pub fn direction_to(self, target: Self) -> Delta {
        fn sign(from: usize, to: usize) -> i8 {
            match to.cmp(&from) {
                std::cmp::Ordering::Less => -1,
                std::cmp::Ordering::Equal => 0,
                std::cmp::Ordering::Greater => 1,
            }
        }
        Delta {
            row: sign(self.row, target.row),
            col: sign(self.col, target.col),
        }
    }
}

/// A unit step between neighboring grid cells.
///
/// Components are restricted to `-1`, `0`, or `1` by construction through
/// [`Position::direction_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delta {
    /// Row component of the step.
    pub row: i8,
    /// Column component of the step.
    pub col: i8,
}

impl Delta {
    /// The zero step (no movement).
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Returns true if this step moves in neither direction.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.row == 0 && self.col == 0
    }
}
