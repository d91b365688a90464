use std::collections::BTreeSet;

use log::debug;
use parlor_core::Position;
use parlor_source::{LoadError, RequestId, RequestTracker, wordsearch_dto::WordSearchPuzzleDto};

use crate::{grid::LetterGrid, selection::SelectionPath};

/// Default grid side length requested from the puzzle source.
pub const DEFAULT_SIZE: usize = 12;

/// User intents and external completions driving the word-search session.
#[derive(Debug, Clone)]
pub enum WordSearchEvent {
    /// Drag started on a cell.
    SelectionStarted(Position),
    /// Drag moved over a cell.
    SelectionExtended(Position),
    /// Drag released.
    SelectionEnded,
    /// A fresh grid was requested.
    NewGameRequested {
        /// Word-list theme tag.
        theme: String,
        /// Grid side length.
        size: usize,
    },
    /// Retry after a failed load.
    RetryRequested,
    /// A puzzle-load request completed.
    LoadFinished {
        /// Ticket of the request this response answers.
        id: RequestId,
        /// Raw payload or failure.
        result: Result<WordSearchPuzzleDto, LoadError>,
    },
}

/// Outward effects the embedding shell must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSearchCommand {
    /// Dispatch a grid request to the word-search source.
    RequestPuzzle {
        /// Ticket to echo back in [`WordSearchEvent::LoadFinished`].
        id: RequestId,
        /// Requested theme.
        theme: String,
        /// Requested side length.
        size: usize,
    },
}

/// Result of finishing a selection gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The gesture matched an unresolved target word.
    Found {
        /// The dictionary form of the matched word.
        word: String,
    },
    /// No unresolved target matched; the gesture is discarded.
    NoMatch,
}

/// Where the session is in its lifecycle, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum WordSearchPhase {
    /// No grid yet and nothing in flight.
    Idle,
    /// A grid is up and accepting selections.
    Playing,
    /// A grid load is outstanding.
    Loading,
    /// The last load failed; prior grid state is preserved.
    LoadFailed,
}

/// One cell as the presentation layer should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSearchCellView {
    /// The letter in the cell.
    pub letter: char,
    /// True while the cell is part of the in-progress selection.
    pub is_selected: bool,
    /// True once the cell belongs to a found word.
    pub is_found: bool,
}

/// One target word and whether it has been found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordView {
    /// The word in list order.
    pub word: String,
    /// True once discovered.
    pub is_found: bool,
}

/// Everything the presentation layer needs to redraw from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSearchSnapshot {
    /// Lifecycle phase.
    pub phase: WordSearchPhase,
    /// Failure detail when `phase` is [`WordSearchPhase::LoadFailed`].
    pub load_error: Option<LoadError>,
    /// Current theme tag.
    pub theme: String,
    /// Grid contents, absent before the first successful load.
    pub grid: Option<Vec<Vec<WordSearchCellView>>>,
    /// Target list with found flags, in presentation order.
    pub words: Vec<WordView>,
    /// Number of words found so far.
    pub found_count: usize,
    /// True once every target word is found — the sole win condition.
    pub is_complete: bool,
}

/// Persistable puzzle progress: the grid, targets, and what was found.
///
/// Replaying the selection paths that produced `found` against a restored
/// save reproduces the identical found set.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WordSearchSave {
    /// Letter grid.
    pub grid: LetterGrid,
    /// Target words in order.
    pub words: Vec<String>,
    /// Found subset of `words`.
    pub found: BTreeSet<String>,
    /// Cells belonging to found words, for highlight restoration.
    pub found_cells: BTreeSet<Position>,
}

#[derive(Debug, Clone)]
struct PuzzleState {
    grid: LetterGrid,
    words: Vec<String>,
    found: BTreeSet<String>,
    found_cells: BTreeSet<Position>,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Playing,
    Loading,
    LoadFailed(LoadError),
}

/// The word-search session state machine.
///
/// Owns the letter grid, target list, found set, and the transient
/// selection path. Selections are normalized geometrically (see
/// [`SelectionPath`]) and matched forward then reversed against the
/// unresolved targets.
#[derive(Debug, Clone)]
pub struct WordSearchSession {
    puzzle: Option<PuzzleState>,
    path: Option<SelectionPath>,
    theme: String,
    size: usize,
    phase: Phase,
    requests: RequestTracker,
}

impl WordSearchSession {
    /// Creates an idle session; send [`WordSearchEvent::NewGameRequested`]
    /// to load the first grid.
    #[must_use]
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            puzzle: None,
            path: None,
            theme: theme.into(),
            size: DEFAULT_SIZE,
            phase: Phase::Idle,
            requests: RequestTracker::new(),
        }
    }

    /// Restores a session from saved progress, ready for further play.
    #[must_use]
    pub fn from_save(theme: impl Into<String>, save: WordSearchSave) -> Self {
        let size = save.grid.size();
        Self {
            puzzle: Some(PuzzleState {
                grid: save.grid,
                words: save.words,
                found: save.found,
                found_cells: save.found_cells,
            }),
            path: None,
            theme: theme.into(),
            size,
            phase: Phase::Playing,
            requests: RequestTracker::new(),
        }
    }

    /// Extracts persistable progress, if a grid is loaded.
    #[must_use]
    pub fn save(&self) -> Option<WordSearchSave> {
        self.puzzle.as_ref().map(|puzzle| WordSearchSave {
            grid: puzzle.grid.clone(),
            words: puzzle.words.clone(),
            found: puzzle.found.clone(),
            found_cells: puzzle.found_cells.clone(),
        })
    }

    /// Advances the session by one event.
    pub fn handle(&mut self, event: WordSearchEvent) -> Vec<WordSearchCommand> {
        match event {
            WordSearchEvent::SelectionStarted(pos) => {
                self.begin_selection(pos);
                Vec::new()
            }
            WordSearchEvent::SelectionExtended(pos) => {
                self.extend_selection(pos);
                Vec::new()
            }
            WordSearchEvent::SelectionEnded => {
                self.end_selection();
                Vec::new()
            }
            WordSearchEvent::NewGameRequested { theme, size } => self.new_game(theme, size),
            WordSearchEvent::RetryRequested => self.retry(),
            WordSearchEvent::LoadFinished { id, result } => {
                self.finish_load(id, result);
                Vec::new()
            }
        }
    }

    /// Starts a selection at `pos`; restarting mid-gesture is allowed.
    pub fn begin_selection(&mut self, pos: Position) {
        let Some(puzzle) = &self.puzzle else {
            return;
        };
        if puzzle.grid.contains(pos) {
            self.path = Some(SelectionPath::begin(pos));
        } else {
            debug!("selection start rejected at {pos:?}: out of bounds");
        }
    }

    /// Extends the active selection toward `pos`; no-op when none is active.
    pub fn extend_selection(&mut self, pos: Position) {
        let size = self.size_of_grid();
        if let Some(path) = &mut self.path {
            path.extend_to(pos, size);
        }
    }

    /// Finishes the gesture: reads the path into a string and tries to
    /// match it, forward first, then reversed, against unresolved targets.
    ///
    /// The transient path is consumed either way. Returns `None` when no
    /// selection was active.
    pub fn end_selection(&mut self) -> Option<MatchOutcome> {
        let path = self.path.take()?;
        let puzzle = self.puzzle.as_mut()?;

        let word = puzzle.grid.read_word(path.points());
        let reversed: String = word.chars().rev().collect();

        let target = if Self::is_unresolved(puzzle, &word) {
            Some(word)
        } else if Self::is_unresolved(puzzle, &reversed) {
            Some(reversed)
        } else {
            None
        };

        match target {
            Some(word) => {
                puzzle.found.insert(word.clone());
                puzzle.found_cells.extend(path.points().iter().copied());
                debug!(
                    "found {word:?} ({}/{})",
                    puzzle.found.len(),
                    puzzle.words.len()
                );
                Some(MatchOutcome::Found { word })
            }
            None => Some(MatchOutcome::NoMatch),
        }
    }

    fn is_unresolved(puzzle: &PuzzleState, word: &str) -> bool {
        !word.is_empty()
            && puzzle.words.iter().any(|target| target == word)
            && !puzzle.found.contains(word)
    }

    /// True once every target word has been found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.puzzle
            .as_ref()
            .is_some_and(|puzzle| puzzle.found.len() == puzzle.words.len())
    }

    fn new_game(&mut self, theme: String, size: usize) -> Vec<WordSearchCommand> {
        self.theme = theme;
        self.size = size;
        self.begin_load()
    }

    fn retry(&mut self) -> Vec<WordSearchCommand> {
        if matches!(self.phase, Phase::LoadFailed(_)) {
            self.begin_load()
        } else {
            Vec::new()
        }
    }

    fn begin_load(&mut self) -> Vec<WordSearchCommand> {
        self.path = None;
        let id = self.requests.issue();
        self.phase = Phase::Loading;
        debug!(
            "requesting {} grid of size {} (ticket {})",
            self.theme,
            self.size,
            id.value()
        );
        vec![WordSearchCommand::RequestPuzzle {
            id,
            theme: self.theme.clone(),
            size: self.size,
        }]
    }

    fn finish_load(&mut self, id: RequestId, result: Result<WordSearchPuzzleDto, LoadError>) {
        if !self.requests.settle(id) {
            debug!("dropping stale grid response (ticket {})", id.value());
            return;
        }
        match result.and_then(|dto| dto.validate()) {
            Ok(puzzle) => {
                self.size = puzzle.size;
                self.puzzle = Some(PuzzleState {
                    grid: LetterGrid::new(&puzzle),
                    words: puzzle.words,
                    found: BTreeSet::new(),
                    found_cells: BTreeSet::new(),
                });
                self.path = None;
                self.phase = Phase::Playing;
                debug!("new {} grid applied", self.theme);
            }
            Err(err) => {
                log::warn!("grid load failed: {err}");
                self.phase = Phase::LoadFailed(err);
            }
        }
    }

    fn size_of_grid(&self) -> usize {
        self.puzzle
            .as_ref()
            .map_or(self.size, |puzzle| puzzle.grid.size())
    }

    /// Builds a complete view of the session for rendering.
    #[must_use]
    pub fn snapshot(&self) -> WordSearchSnapshot {
        let (phase, load_error) = match &self.phase {
            Phase::Idle => (WordSearchPhase::Idle, None),
            Phase::Playing => (WordSearchPhase::Playing, None),
            Phase::Loading => (WordSearchPhase::Loading, None),
            Phase::LoadFailed(err) => (WordSearchPhase::LoadFailed, Some(err.clone())),
        };
        let selected: BTreeSet<Position> = self
            .path
            .as_ref()
            .map(|path| path.points().iter().copied().collect())
            .unwrap_or_default();
        let grid = self.puzzle.as_ref().map(|puzzle| {
            puzzle
                .grid
                .rows()
                .iter()
                .enumerate()
                .map(|(row, letters)| {
                    letters
                        .iter()
                        .enumerate()
                        .map(|(col, &letter)| {
                            let pos = Position::new(row, col);
                            WordSearchCellView {
                                letter,
                                is_selected: selected.contains(&pos),
                                is_found: puzzle.found_cells.contains(&pos),
                            }
                        })
                        .collect()
                })
                .collect()
        });
        let words = self.puzzle.as_ref().map_or_else(Vec::new, |puzzle| {
            puzzle
                .words
                .iter()
                .map(|word| WordView {
                    word: word.clone(),
                    is_found: puzzle.found.contains(word),
                })
                .collect()
        });
        let found_count = self
            .puzzle
            .as_ref()
            .map_or(0, |puzzle| puzzle.found.len());
        WordSearchSnapshot {
            phase,
            load_error,
            theme: self.theme.clone(),
            grid,
            words,
            found_count,
            is_complete: self.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::Position;
    use parlor_source::{LoadError, fixtures};

    use super::{MatchOutcome, WordSearchCommand, WordSearchEvent, WordSearchSession};

    /// Loads a session with the 5×5 fixture grid (CAT, DOG, SUN, MOON).
    fn loaded_session() -> WordSearchSession {
        let mut session = WordSearchSession::new("animals");
        let commands = session.handle(WordSearchEvent::NewGameRequested {
            theme: "animals".to_owned(),
            size: 5,
        });
        let [WordSearchCommand::RequestPuzzle { id, .. }] = commands.as_slice() else {
            panic!("expected a single grid request");
        };
        session.handle(WordSearchEvent::LoadFinished {
            id: *id,
            result: Ok(fixtures::wordsearch()),
        });
        assert!(session.snapshot().phase.is_playing());
        session
    }

    fn drag(session: &mut WordSearchSession, from: (usize, usize), to: (usize, usize)) {
        session.begin_selection(Position::new(from.0, from.1));
        session.extend_selection(Position::new(to.0, to.1));
    }

    #[test]
    fn forward_match_marks_the_word_found() {
        let mut session = loaded_session();
        drag(&mut session, (0, 1), (0, 3)); // C-A-T
        let outcome = session.end_selection().unwrap();
        assert_eq!(
            outcome,
            MatchOutcome::Found {
                word: "CAT".to_owned()
            }
        );

        let snapshot = session.snapshot();
        assert_eq!(snapshot.found_count, 1);
        let grid = snapshot.grid.unwrap();
        assert!(grid[0][1].is_found && grid[0][2].is_found && grid[0][3].is_found);
        assert!(!grid[0][0].is_found);
    }

    #[test]
    fn reversed_selection_matches_the_dictionary_form() {
        let mut session = loaded_session();
        drag(&mut session, (0, 3), (0, 1)); // T-A-C
        let outcome = session.end_selection().unwrap();
        assert_eq!(
            outcome,
            MatchOutcome::Found {
                word: "CAT".to_owned()
            }
        );
    }

    #[test]
    fn already_found_word_cannot_be_rematched() {
        let mut session = loaded_session();
        drag(&mut session, (0, 1), (0, 3));
        session.end_selection().unwrap();
        let before = session.snapshot();

        drag(&mut session, (0, 1), (0, 3));
        assert_eq!(session.end_selection().unwrap(), MatchOutcome::NoMatch);
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn non_matching_gesture_discards_the_path_only() {
        let mut session = loaded_session();
        drag(&mut session, (4, 0), (4, 2));
        assert_eq!(session.end_selection().unwrap(), MatchOutcome::NoMatch);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.found_count, 0);
        assert!(
            snapshot
                .grid
                .unwrap()
                .iter()
                .flatten()
                .all(|cell| !cell.is_selected)
        );
    }

    #[test]
    fn ending_without_an_active_selection_returns_none() {
        let mut session = loaded_session();
        assert_eq!(session.end_selection(), None);
    }

    #[test]
    fn finding_every_word_completes_the_puzzle() {
        let mut session = loaded_session();
        for (from, to) in [
            ((0, 1), (0, 3)), // CAT east
            ((2, 0), (2, 2)), // DOG east
            ((0, 4), (2, 4)), // SUN south
            ((1, 0), (4, 3)), // MOON southeast
        ] {
            drag(&mut session, from, to);
            assert!(matches!(
                session.end_selection().unwrap(),
                MatchOutcome::Found { .. }
            ));
        }
        assert!(session.is_complete());
        assert!(session.snapshot().is_complete);
    }

    #[test]
    fn truncated_edge_path_can_still_match_exactly() {
        let mut session = loaded_session();
        // Drag SUN but overshoot past the bottom edge; the path truncates
        // at (4, 4) and reads SUNRL: no match. A clean truncation that
        // reads exactly a target still matches.
        drag(&mut session, (0, 4), (9, 4));
        assert_eq!(session.end_selection().unwrap(), MatchOutcome::NoMatch);

        session.begin_selection(Position::new(0, 4));
        session.extend_selection(Position::new(2, 4));
        assert_eq!(
            session.end_selection().unwrap(),
            MatchOutcome::Found {
                word: "SUN".to_owned()
            }
        );
    }

    #[test]
    fn new_game_resets_found_set_wholesale() {
        let mut session = loaded_session();
        drag(&mut session, (0, 1), (0, 3));
        session.end_selection().unwrap();
        assert_eq!(session.snapshot().found_count, 1);

        let commands = session.handle(WordSearchEvent::NewGameRequested {
            theme: "food".to_owned(),
            size: 5,
        });
        let [WordSearchCommand::RequestPuzzle { id, theme, .. }] = commands.as_slice() else {
            panic!("expected a grid request");
        };
        assert_eq!(theme, "food");
        session.handle(WordSearchEvent::LoadFinished {
            id: *id,
            result: Ok(fixtures::wordsearch()),
        });
        assert_eq!(session.snapshot().found_count, 0);
        assert!(!session.is_complete());
    }

    #[test]
    fn failed_load_preserves_prior_grid() {
        let mut session = loaded_session();
        drag(&mut session, (0, 1), (0, 3));
        session.end_selection().unwrap();

        let commands = session.handle(WordSearchEvent::NewGameRequested {
            theme: "space".to_owned(),
            size: 12,
        });
        let [WordSearchCommand::RequestPuzzle { id, .. }] = commands.as_slice() else {
            panic!("expected a grid request");
        };
        session.handle(WordSearchEvent::LoadFinished {
            id: *id,
            result: Err(LoadError::Unreachable),
        });

        let snapshot = session.snapshot();
        assert!(snapshot.phase.is_load_failed());
        assert_eq!(snapshot.found_count, 1);

        let commands = session.handle(WordSearchEvent::RetryRequested);
        assert!(matches!(
            commands.as_slice(),
            [WordSearchCommand::RequestPuzzle { .. }]
        ));
    }

    #[test]
    fn stale_load_response_is_ignored() {
        let mut session = WordSearchSession::new("animals");
        let first = session.handle(WordSearchEvent::NewGameRequested {
            theme: "animals".to_owned(),
            size: 5,
        });
        let [WordSearchCommand::RequestPuzzle { id: first_id, .. }] = first.as_slice() else {
            panic!("expected a grid request");
        };
        let first_id = *first_id;

        let second = session.handle(WordSearchEvent::NewGameRequested {
            theme: "space".to_owned(),
            size: 5,
        });
        let [WordSearchCommand::RequestPuzzle { id: second_id, .. }] = second.as_slice() else {
            panic!("expected a grid request");
        };

        session.handle(WordSearchEvent::LoadFinished {
            id: first_id,
            result: Ok(fixtures::wordsearch()),
        });
        assert!(session.snapshot().phase.is_loading());

        session.handle(WordSearchEvent::LoadFinished {
            id: *second_id,
            result: Ok(fixtures::wordsearch()),
        });
        assert!(session.snapshot().phase.is_playing());
    }

    #[test]
    fn save_round_trip_replays_to_an_identical_found_set() {
        let mut session = loaded_session();
        drag(&mut session, (0, 1), (0, 3)); // CAT
        session.end_selection().unwrap();
        drag(&mut session, (2, 0), (2, 2)); // DOG
        session.end_selection().unwrap();

        let save = session.save().unwrap();
        let json = serde_json::to_string(&save).unwrap();
        let restored: super::WordSearchSave = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, save);

        let mut replayed = WordSearchSession::from_save("animals", restored);
        // Replaying the same completed paths is idempotent.
        drag(&mut replayed, (0, 1), (0, 3));
        assert_eq!(replayed.end_selection().unwrap(), MatchOutcome::NoMatch);
        drag(&mut replayed, (2, 0), (2, 2));
        assert_eq!(replayed.end_selection().unwrap(), MatchOutcome::NoMatch);
        assert_eq!(replayed.save().unwrap().found, save.found);
    }
}
