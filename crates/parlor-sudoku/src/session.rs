use log::debug;
use parlor_core::{Difficulty, Digit, Position};
use parlor_source::{LoadError, RequestId, RequestTracker, sudoku_dto::SudokuPuzzleDto};

use crate::board::{Board, CellState};

/// Player decision on a destructive-action confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    /// Go ahead and discard in-progress work.
    Confirmed,
    /// Keep the current puzzle; the request becomes a full no-op.
    Cancelled,
}

/// User intents and external completions driving the Sudoku session.
#[derive(Debug, Clone)]
pub enum SudokuEvent {
    /// A cell was clicked or keyboard-selected.
    CellSelected(Position),
    /// A digit key or pad button was pressed.
    NumberEntered(Digit),
    /// The clear key was pressed.
    CellCleared,
    /// The player asked for the solution check.
    CheckRequested,
    /// A new puzzle at the given difficulty was requested.
    NewGameRequested(Difficulty),
    /// The new-game confirmation dialog was answered.
    ConfirmResolved(ConfirmResult),
    /// Retry after a failed load.
    RetryRequested,
    /// A puzzle-load request completed.
    LoadFinished {
        /// Ticket of the request this response answers.
        id: RequestId,
        /// Raw payload or failure.
        result: Result<SudokuPuzzleDto, LoadError>,
    },
}

/// Outward effects the embedding shell must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SudokuCommand {
    /// Dispatch a puzzle request to the Sudoku source.
    RequestPuzzle {
        /// Ticket to echo back in [`SudokuEvent::LoadFinished`].
        id: RequestId,
        /// Requested difficulty.
        difficulty: Difficulty,
    },
    /// Ask the player to confirm discarding in-progress work.
    AskNewGameConfirmation,
}

/// Where the session is in its lifecycle, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SudokuPhase {
    /// No puzzle yet and nothing in flight.
    Idle,
    /// A puzzle is on the board and accepting input.
    Playing,
    /// Waiting on the new-game confirmation dialog.
    AwaitingConfirmation,
    /// A puzzle load is outstanding.
    Loading,
    /// The last load failed; prior puzzle state is preserved.
    LoadFailed,
}

/// Correctness annotation left on a cell by the last solution check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMark {
    /// Entry matches the solution.
    Correct,
    /// Entry differs from the solution.
    Incorrect,
}

/// Per-cell classification produced by [`SudokuSession::check_solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    /// Given cell; never flagged.
    Given,
    /// Editable and empty.
    Empty,
    /// Editable, filled, matches the solution.
    Correct,
    /// Editable, filled, does not match the solution.
    Incorrect,
}

/// Overall result of a solution check.
///
/// `Incomplete` takes precedence: it is reported whenever any editable cell
/// is empty, even if other filled cells are wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum CheckOutcome {
    /// At least one editable cell is still empty.
    Incomplete,
    /// Every editable cell is filled correctly.
    Solved,
    /// Every editable cell is filled, at least one incorrectly.
    HasErrors,
}

/// Full classification from one solution check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Overall outcome.
    pub outcome: CheckOutcome,
    /// Row-major per-cell classification.
    pub cells: [[CellStatus; 9]; 9],
}

/// One cell as the presentation layer should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SudokuCellView {
    /// Digit shown in the cell, if any.
    pub value: Option<u8>,
    /// True for immutable clue cells.
    pub is_given: bool,
    /// True for the cell under the cursor.
    pub is_selected: bool,
    /// Correctness mark from the last check, if still applicable.
    pub mark: Option<CellMark>,
}

/// Everything the presentation layer needs to redraw from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SudokuSnapshot {
    /// Lifecycle phase.
    pub phase: SudokuPhase,
    /// Failure detail when `phase` is [`SudokuPhase::LoadFailed`].
    pub load_error: Option<LoadError>,
    /// Difficulty of the current (or requested) puzzle.
    pub difficulty: Difficulty,
    /// Cursor position, always on an editable cell.
    pub cursor: Option<Position>,
    /// Grid contents, absent before the first successful load.
    pub grid: Option<Box<[[SudokuCellView; 9]; 9]>>,
    /// Overall outcome of the most recent solution check.
    pub last_check: Option<CheckOutcome>,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Playing,
    AwaitingConfirm,
    Loading,
    LoadFailed(LoadError),
}

/// The Sudoku session state machine.
///
/// Advanced only by [`SudokuEvent`]s; every transition may emit
/// [`SudokuCommand`]s for the shell to perform. Inputs that the rules
/// reject (editing a given cell, selecting out of bounds) are silent
/// no-ops, never surfaced as errors.
#[derive(Debug, Clone)]
pub struct SudokuSession {
    board: Option<Board>,
    cursor: Option<Position>,
    marks: [[Option<CellMark>; 9]; 9],
    last_check: Option<CheckOutcome>,
    difficulty: Difficulty,
    phase: Phase,
    requests: RequestTracker,
}

impl SudokuSession {
    /// Creates an idle session; send [`SudokuEvent::NewGameRequested`] to
    /// load the first puzzle.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            board: None,
            cursor: None,
            marks: [[None; 9]; 9],
            last_check: None,
            difficulty,
            phase: Phase::Idle,
            requests: RequestTracker::new(),
        }
    }

    /// Advances the session by one event.
    pub fn handle(&mut self, event: SudokuEvent) -> Vec<SudokuCommand> {
        match event {
            SudokuEvent::CellSelected(pos) => {
                self.select_cell(pos);
                Vec::new()
            }
            SudokuEvent::NumberEntered(digit) => {
                self.enter_number(digit);
                Vec::new()
            }
            SudokuEvent::CellCleared => {
                self.clear_cell();
                Vec::new()
            }
            SudokuEvent::CheckRequested => {
                self.check_solution();
                Vec::new()
            }
            SudokuEvent::NewGameRequested(difficulty) => self.new_game(difficulty),
            SudokuEvent::ConfirmResolved(result) => self.resolve_confirm(result),
            SudokuEvent::RetryRequested => self.retry(),
            SudokuEvent::LoadFinished { id, result } => {
                self.finish_load(id, result);
                Vec::new()
            }
        }
    }

    /// Moves the cursor to `pos` if it is an editable, in-bounds cell.
    ///
    /// Invalid selections do not move the cursor.
    pub fn select_cell(&mut self, pos: Position) {
        let Some(board) = &self.board else {
            return;
        };
        if board.is_editable(pos) {
            self.cursor = Some(pos);
        } else {
            debug!("select rejected at {pos:?}: given cell or out of bounds");
        }
    }

    /// Writes `digit` at the cursor, clearing that cell's correctness mark.
    ///
    /// No-op without a cursor; the board rejects given cells.
    pub fn enter_number(&mut self, digit: Digit) {
        let (Some(board), Some(pos)) = (&mut self.board, self.cursor) else {
            return;
        };
        match board.set_digit(pos, digit) {
            Ok(()) => self.marks[pos.row][pos.col] = None,
            Err(err) => debug!("digit entry rejected at {pos:?}: {err}"),
        }
    }

    /// Empties the cell at the cursor, clearing its correctness mark.
    pub fn clear_cell(&mut self) {
        let (Some(board), Some(pos)) = (&mut self.board, self.cursor) else {
            return;
        };
        match board.clear_cell(pos) {
            Ok(()) => self.marks[pos.row][pos.col] = None,
            Err(err) => debug!("clear rejected at {pos:?}: {err}"),
        }
    }

    /// Classifies every cell against the solution.
    ///
    /// Marks are rebuilt wholesale; given cells are never flagged. Returns
    /// `None` when no puzzle is loaded.
    pub fn check_solution(&mut self) -> Option<CheckReport> {
        let board = self.board.as_ref()?;
        self.marks = [[None; 9]; 9];

        let mut cells = [[CellStatus::Given; 9]; 9];
        let mut has_empty = false;
        let mut has_incorrect = false;
        for pos in Board::positions() {
            let status = match board.cell(pos) {
                CellState::Given(_) => CellStatus::Given,
                CellState::Empty => {
                    has_empty = true;
                    CellStatus::Empty
                }
                CellState::Filled(digit) => {
                    if board.solution(pos) == Some(digit) {
                        self.marks[pos.row][pos.col] = Some(CellMark::Correct);
                        CellStatus::Correct
                    } else {
                        has_incorrect = true;
                        self.marks[pos.row][pos.col] = Some(CellMark::Incorrect);
                        CellStatus::Incorrect
                    }
                }
            };
            cells[pos.row][pos.col] = status;
        }

        // Empty cells win over wrong ones: the player is told to finish
        // the grid before correctness is judged.
        let outcome = if has_empty {
            CheckOutcome::Incomplete
        } else if has_incorrect {
            CheckOutcome::HasErrors
        } else {
            CheckOutcome::Solved
        };
        self.last_check = Some(outcome);
        debug!("solution check: {outcome:?}");
        Some(CheckReport { outcome, cells })
    }

    fn new_game(&mut self, difficulty: Difficulty) -> Vec<SudokuCommand> {
        self.difficulty = difficulty;
        let dirty = self.board.as_ref().is_some_and(Board::has_player_entries);
        if dirty {
            // The user intent supersedes any load already in flight.
            self.requests.invalidate();
            self.phase = Phase::AwaitingConfirm;
            vec![SudokuCommand::AskNewGameConfirmation]
        } else {
            self.begin_load()
        }
    }

    fn resolve_confirm(&mut self, result: ConfirmResult) -> Vec<SudokuCommand> {
        if !matches!(self.phase, Phase::AwaitingConfirm) {
            debug!("confirmation answered with no confirmation pending");
            return Vec::new();
        }
        match result {
            ConfirmResult::Confirmed => self.begin_load(),
            ConfirmResult::Cancelled => {
                self.phase = if self.board.is_some() {
                    Phase::Playing
                } else {
                    Phase::Idle
                };
                Vec::new()
            }
        }
    }

    fn retry(&mut self) -> Vec<SudokuCommand> {
        if matches!(self.phase, Phase::LoadFailed(_)) {
            self.begin_load()
        } else {
            Vec::new()
        }
    }

    fn begin_load(&mut self) -> Vec<SudokuCommand> {
        let id = self.requests.issue();
        self.phase = Phase::Loading;
        debug!(
            "requesting {} puzzle (ticket {})",
            self.difficulty,
            id.value()
        );
        vec![SudokuCommand::RequestPuzzle {
            id,
            difficulty: self.difficulty,
        }]
    }

    fn finish_load(&mut self, id: RequestId, result: Result<SudokuPuzzleDto, LoadError>) {
        if !self.requests.settle(id) {
            debug!("dropping stale puzzle response (ticket {})", id.value());
            return;
        }
        match result.and_then(|dto| dto.validate()) {
            Ok(puzzle) => {
                self.board = Some(Board::new(&puzzle));
                self.cursor = None;
                self.marks = [[None; 9]; 9];
                self.last_check = None;
                self.phase = Phase::Playing;
                debug!("new {} puzzle applied", self.difficulty);
            }
            Err(err) => {
                // Prior puzzle state stays untouched until a retry succeeds.
                log::warn!("puzzle load failed: {err}");
                self.phase = Phase::LoadFailed(err);
            }
        }
    }

    /// Builds a complete view of the session for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SudokuSnapshot {
        let (phase, load_error) = match &self.phase {
            Phase::Idle => (SudokuPhase::Idle, None),
            Phase::Playing => (SudokuPhase::Playing, None),
            Phase::AwaitingConfirm => (SudokuPhase::AwaitingConfirmation, None),
            Phase::Loading => (SudokuPhase::Loading, None),
            Phase::LoadFailed(err) => (SudokuPhase::LoadFailed, Some(err.clone())),
        };
        let grid = self.board.as_ref().map(|board| {
            let mut cells = [[SudokuCellView {
                value: None,
                is_given: false,
                is_selected: false,
                mark: None,
            }; 9]; 9];
            for pos in Board::positions() {
                let state = board.cell(pos);
                cells[pos.row][pos.col] = SudokuCellView {
                    value: state.digit().map(Digit::get),
                    is_given: state.is_given(),
                    is_selected: self.cursor == Some(pos),
                    mark: self.marks[pos.row][pos.col],
                };
            }
            Box::new(cells)
        });
        SudokuSnapshot {
            phase,
            load_error,
            difficulty: self.difficulty,
            cursor: self.cursor,
            grid,
            last_check: self.last_check,
        }
    }

    /// Returns the board, if a puzzle is loaded.
    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Returns the cursor position, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }
}
