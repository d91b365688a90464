//! Scripted Sudoku session against the fixture source.

use log::debug;
use parlor_core::{Difficulty, Digit, Position};
use parlor_source::{
    FixtureSource, LoadError, LoadRequest, LoadResponse, PuzzleSource, sudoku_dto::SudokuPuzzleDto,
};
use parlor_sudoku::{
    Board, CellMark, ConfirmResult, SudokuCellView, SudokuCommand, SudokuEvent, SudokuSession,
    SudokuSnapshot,
};

pub fn run(difficulty: Difficulty) {
    let mut source = FixtureSource::new();
    let mut session = SudokuSession::new(difficulty);

    println!("requesting a {difficulty} puzzle");
    dispatch(
        &mut session,
        &mut source,
        SudokuEvent::NewGameRequested(difficulty),
    );
    print_snapshot(&session.snapshot());

    let targets = blank_targets(&session);
    if targets.is_empty() {
        println!("no puzzle loaded; nothing to play");
        return;
    }

    // Fill every blank with its solution value, but spoil the first one.
    for (index, (pos, solution)) in targets.iter().enumerate() {
        let value = if index == 0 {
            wrong_digit(*solution)
        } else {
            *solution
        };
        dispatch(&mut session, &mut source, SudokuEvent::CellSelected(*pos));
        dispatch(&mut session, &mut source, SudokuEvent::NumberEntered(value));
    }
    println!("\nboard filled with one deliberate mistake; checking");
    dispatch(&mut session, &mut source, SudokuEvent::CheckRequested);
    print_snapshot(&session.snapshot());

    if let Some((pos, solution)) = targets.first() {
        println!("\nfixing row {} column {} and re-checking", pos.row, pos.col);
        dispatch(&mut session, &mut source, SudokuEvent::CellSelected(*pos));
        dispatch(
            &mut session,
            &mut source,
            SudokuEvent::NumberEntered(*solution),
        );
        dispatch(&mut session, &mut source, SudokuEvent::CheckRequested);
        print_snapshot(&session.snapshot());
    }

    println!("\nasking for a new game, then cancelling the confirmation");
    dispatch(
        &mut session,
        &mut source,
        SudokuEvent::NewGameRequested(difficulty),
    );
    dispatch(
        &mut session,
        &mut source,
        SudokuEvent::ConfirmResolved(ConfirmResult::Cancelled),
    );
    print_snapshot(&session.snapshot());
}

/// Every empty cell paired with its solution digit, row-major.
fn blank_targets(session: &SudokuSession) -> Vec<(Position, Digit)> {
    let Some(board) = session.board() else {
        return Vec::new();
    };
    Board::positions()
        .filter(|pos| board.cell(*pos).is_empty())
        .filter_map(|pos| board.solution(pos).map(|digit| (pos, digit)))
        .collect()
}

fn wrong_digit(solution: Digit) -> Digit {
    Digit::new(solution.get() % 9 + 1).unwrap_or(solution)
}

fn dispatch(session: &mut SudokuSession, source: &mut FixtureSource, event: SudokuEvent) {
    for command in session.handle(event) {
        debug!("performing {command:?}");
        match command {
            SudokuCommand::RequestPuzzle { id, difficulty } => {
                let result = fetch(source, difficulty);
                dispatch(session, source, SudokuEvent::LoadFinished { id, result });
            }
            SudokuCommand::AskNewGameConfirmation => {
                println!("(session asks to confirm discarding in-progress work)");
            }
        }
    }
}

fn fetch(
    source: &mut FixtureSource,
    difficulty: Difficulty,
) -> Result<SudokuPuzzleDto, LoadError> {
    match source.fetch(&LoadRequest::Sudoku { difficulty })? {
        LoadResponse::Sudoku(dto) => Ok(dto),
        LoadResponse::WordSearch(_) | LoadResponse::Trivia(_) => {
            Err(LoadError::malformed("unexpected response variant"))
        }
    }
}

fn print_snapshot(snapshot: &SudokuSnapshot) {
    println!("phase: {:?}", snapshot.phase);
    if let Some(err) = &snapshot.load_error {
        println!("load error: {err}");
    }
    if let Some(grid) = &snapshot.grid {
        for row in grid.iter() {
            let line: Vec<String> = row.iter().map(render_cell).collect();
            println!("  {}", line.join(" "));
        }
    }
    if let Some(outcome) = snapshot.last_check {
        println!("last check: {outcome:?}");
    }
}

/// A cell as two characters: its digit (or dot) and its check mark.
fn render_cell(cell: &SudokuCellView) -> String {
    let value = cell.value.map_or('.', |v| char::from(b'0' + v));
    let mark = match cell.mark {
        Some(CellMark::Correct) => '+',
        Some(CellMark::Incorrect) => 'x',
        None => ' ',
    };
    format!("{value}{mark}")
}
