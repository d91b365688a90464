//! The Sudoku session engine.
//!
//! [`Board`] owns the 9×9 grid of given and player-filled cells together
//! with the solution, enforcing given-cell immutability with typed errors.
//! [`SudokuSession`] wraps the board in the shared session lifecycle: a
//! selection cursor, per-cell correctness marks, on-demand solution
//! checking, and a confirmation-gated new-game flow driven by discrete
//! events and outward commands.

mod board;
mod session;

pub use board::{Board, BoardError, CellState};
pub use session::{
    CellMark, CellStatus, CheckOutcome, CheckReport, ConfirmResult, SudokuCellView,
    SudokuCommand, SudokuEvent, SudokuPhase, SudokuSession, SudokuSnapshot,
};
