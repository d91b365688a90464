//! Scripted word-search session against the fixture source.

use log::debug;
use parlor_core::Position;
use parlor_source::{
    FixtureSource, LoadError, LoadRequest, LoadResponse, PuzzleSource,
    wordsearch_dto::WordSearchPuzzleDto,
};
use parlor_wordsearch::{
    MatchOutcome, WordSearchCommand, WordSearchEvent, WordSearchSession, WordSearchSnapshot,
};

/// Fixture grid side length.
const SIZE: usize = 5;

pub fn run(theme: &str) {
    let mut source = FixtureSource::new();
    let mut session = WordSearchSession::new(theme);

    println!("requesting a {theme} grid");
    dispatch(
        &mut session,
        &mut source,
        WordSearchEvent::NewGameRequested {
            theme: theme.to_owned(),
            size: SIZE,
        },
    );
    print_snapshot(&session.snapshot());

    // One miss first, then the four embedded fixture words.
    let drags = [
        ((4, 0), (4, 2)),
        ((0, 1), (0, 3)),
        ((2, 0), (2, 2)),
        ((0, 4), (2, 4)),
        ((1, 0), (4, 3)),
    ];
    for (from, to) in drags {
        session.begin_selection(Position::new(from.0, from.1));
        session.extend_selection(Position::new(to.0, to.1));
        match session.end_selection() {
            Some(MatchOutcome::Found { word }) => println!("found {word}"),
            Some(MatchOutcome::NoMatch) => println!("no match at {from:?} -> {to:?}"),
            None => println!("no selection was active"),
        }
    }

    println!();
    print_snapshot(&session.snapshot());
}

fn dispatch(session: &mut WordSearchSession, source: &mut FixtureSource, event: WordSearchEvent) {
    for command in session.handle(event) {
        debug!("performing {command:?}");
        let WordSearchCommand::RequestPuzzle { id, theme, size } = command;
        let result = fetch(source, &theme, size);
        dispatch(
            session,
            source,
            WordSearchEvent::LoadFinished { id, result },
        );
    }
}

fn fetch(
    source: &mut FixtureSource,
    theme: &str,
    size: usize,
) -> Result<WordSearchPuzzleDto, LoadError> {
    let request = LoadRequest::WordSearch {
        theme: theme.to_owned(),
        size,
    };
    match source.fetch(&request)? {
        LoadResponse::WordSearch(dto) => Ok(dto),
        LoadResponse::Sudoku(_) | LoadResponse::Trivia(_) => {
            Err(LoadError::malformed("unexpected response variant"))
        }
    }
}

fn print_snapshot(snapshot: &WordSearchSnapshot) {
    println!("phase: {:?}", snapshot.phase);
    if let Some(err) = &snapshot.load_error {
        println!("load error: {err}");
    }
    if let Some(grid) = &snapshot.grid {
        // Found cells render lowercase.
        for row in grid {
            let line: String = row
                .iter()
                .map(|cell| {
                    if cell.is_found {
                        cell.letter.to_ascii_lowercase()
                    } else {
                        cell.letter
                    }
                })
                .flat_map(|letter| [letter, ' '])
                .collect();
            println!("  {}", line.trim_end());
        }
    }
    for word in &snapshot.words {
        let mark = if word.is_found { 'x' } else { ' ' };
        println!("[{mark}] {}", word.word);
    }
    if snapshot.is_complete {
        println!("all {} words found", snapshot.found_count);
    }
}
