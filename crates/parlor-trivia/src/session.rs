use log::debug;
use parlor_core::Difficulty;
use parlor_source::{LoadError, RequestId, RequestTracker, trivia_dto::TriviaBatchDto};
use rand::Rng;

use crate::question::Question;

/// Seconds on the clock when a question is entered.
pub const QUESTION_SECONDS: u32 = 20;

/// Seconds the review screen dwells before auto-advancing.
pub const DWELL_SECONDS: u64 = 2;

/// Default number of questions per round.
pub const DEFAULT_AMOUNT: usize = 10;

/// Parameters of one trivia round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSettings {
    /// Number of questions to request.
    pub amount: usize,
    /// Category id filter; `None` means any category.
    pub category: Option<String>,
    /// Difficulty filter; `None` means any difficulty.
    pub difficulty: Option<Difficulty>,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            category: None,
            difficulty: None,
        }
    }
}

/// Generation tag for countdown and dwell timers.
///
/// Every question entry and every answer bumps the session's epoch;
/// [`TriviaEvent::Tick`] and [`TriviaEvent::DwellElapsed`] carrying an
/// older epoch are dropped. This closes the race between a timer firing
/// and the event that made it obsolete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEpoch(u64);

impl TimerEpoch {
    /// Raw counter value, for logging.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// User intents and external completions driving the trivia session.
#[derive(Debug, Clone)]
pub enum TriviaEvent {
    /// A round with the given settings was requested.
    RoundRequested(RoundSettings),
    /// An answer was chosen; `None` is the timeout pseudo-answer.
    AnswerSelected(Option<String>),
    /// One second elapsed on the question countdown.
    Tick {
        /// Epoch the countdown was started under.
        epoch: TimerEpoch,
    },
    /// The review dwell interval elapsed.
    DwellElapsed {
        /// Epoch the advance was scheduled under.
        epoch: TimerEpoch,
    },
    /// Restart from results with the same settings.
    PlayAgainRequested,
    /// Return to the settings screen.
    BackToSettingsRequested,
    /// A question-load request completed.
    LoadFinished {
        /// Ticket of the request this response answers.
        id: RequestId,
        /// Raw payload or failure.
        result: Result<TriviaBatchDto, LoadError>,
    },
}

/// Outward effects the embedding shell must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriviaCommand {
    /// Dispatch a question request to the trivia source.
    RequestQuestions {
        /// Ticket to echo back in [`TriviaEvent::LoadFinished`].
        id: RequestId,
        /// Round parameters to request with.
        settings: RoundSettings,
    },
    /// Start a one-per-second countdown feeding [`TriviaEvent::Tick`].
    StartCountdown {
        /// Epoch to stamp each tick with.
        epoch: TimerEpoch,
    },
    /// Cancel the running countdown, if any.
    StopCountdown,
    /// After [`DWELL_SECONDS`], deliver [`TriviaEvent::DwellElapsed`].
    ScheduleAdvance {
        /// Epoch to stamp the elapse event with.
        epoch: TimerEpoch,
    },
}

/// Where the session is in its lifecycle, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TriviaPhase {
    /// Choosing round parameters.
    Settings,
    /// A question batch is outstanding.
    Loading,
    /// The last load failed; only a return to settings is offered.
    LoadFailed,
    /// Question `index` is on screen with the clock running.
    Question {
        /// Zero-based question index.
        index: usize,
    },
    /// Question `index` was answered; dwelling before the next.
    Reviewing {
        /// Zero-based question index.
        index: usize,
    },
    /// The round is over; score and log are final.
    Results,
}

/// One immutable entry in the round's answer log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Question text, for review rendering.
    pub question: String,
    /// What the player chose; `None` is a timeout.
    pub selected: Option<String>,
    /// The correct answer.
    pub correct_answer: String,
    /// Whether `selected` was correct.
    pub is_correct: bool,
    /// Points awarded for this answer.
    pub points: u32,
}

/// The question currently on screen, as presentation should draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// Zero-based question index.
    pub index: usize,
    /// Total questions in the round.
    pub total: usize,
    /// Question text.
    pub text: String,
    /// Category name.
    pub category: String,
    /// Question difficulty.
    pub difficulty: Difficulty,
    /// Answer pool in display order.
    pub answers: Vec<String>,
    /// Seconds left on the clock.
    pub time_remaining: u32,
}

/// Final round summary shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    /// Total points earned.
    pub score: u32,
    /// Rounded percentage of answers that were correct.
    pub percentage: u8,
    /// The full answer log in question order.
    pub answers: Vec<AnswerRecord>,
}

/// Everything the presentation layer needs to redraw from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaSnapshot {
    /// Lifecycle phase.
    pub phase: TriviaPhase,
    /// Failure detail when `phase` is [`TriviaPhase::LoadFailed`].
    pub load_error: Option<LoadError>,
    /// Current round parameters.
    pub settings: RoundSettings,
    /// Points earned so far this round.
    pub score: u32,
    /// The question on screen during `Question` and `Reviewing`.
    pub question: Option<QuestionView>,
    /// The most recent log entry, for the review screen.
    pub last_answer: Option<AnswerRecord>,
    /// Final summary once `phase` is [`TriviaPhase::Results`].
    pub results: Option<ResultsView>,
}

#[derive(Debug, Clone)]
enum Phase {
    Settings,
    Loading,
    LoadFailed(LoadError),
    Question(usize),
    Reviewing(usize),
    Results,
}

/// The trivia flow controller.
///
/// Advanced only by [`TriviaEvent`]s; timers live in the shell and are
/// driven by the emitted [`TriviaCommand`]s, stamped with a
/// [`TimerEpoch`] so superseded timers cannot mutate the round. The
/// randomness source is injected so tests can pin answer ordering.
#[derive(Debug, Clone)]
pub struct TriviaSession<R> {
    settings: RoundSettings,
    phase: Phase,
    questions: Vec<Question>,
    answers: Vec<String>,
    time_remaining: u32,
    score: u32,
    log: Vec<AnswerRecord>,
    epoch: u64,
    requests: RequestTracker,
    rng: R,
}

impl<R: Rng> TriviaSession<R> {
    /// Creates a session on the settings screen with default settings.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self {
            settings: RoundSettings::default(),
            phase: Phase::Settings,
            questions: Vec::new(),
            answers: Vec::new(),
            time_remaining: 0,
            score: 0,
            log: Vec::new(),
            epoch: 0,
            requests: RequestTracker::new(),
            rng,
        }
    }

    /// Advances the session by one event.
    pub fn handle(&mut self, event: TriviaEvent) -> Vec<TriviaCommand> {
        match event {
            TriviaEvent::RoundRequested(settings) => self.start_round(settings),
            TriviaEvent::AnswerSelected(selected) => self.select_answer(selected),
            TriviaEvent::Tick { epoch } => self.tick(epoch),
            TriviaEvent::DwellElapsed { epoch } => self.dwell_elapsed(epoch),
            TriviaEvent::PlayAgainRequested => self.play_again(),
            TriviaEvent::BackToSettingsRequested => self.back_to_settings(),
            TriviaEvent::LoadFinished { id, result } => self.finish_load(id, result),
        }
    }

    /// Starts a round with `settings`, superseding whatever was running.
    pub fn start_round(&mut self, settings: RoundSettings) -> Vec<TriviaCommand> {
        self.settings = settings;
        let mut commands = self.abandon_timers();
        commands.extend(self.begin_load());
        commands
    }

    fn play_again(&mut self) -> Vec<TriviaCommand> {
        if matches!(self.phase, Phase::Results) {
            self.begin_load()
        } else {
            Vec::new()
        }
    }

    fn back_to_settings(&mut self) -> Vec<TriviaCommand> {
        let commands = self.abandon_timers();
        self.requests.invalidate();
        self.phase = Phase::Settings;
        commands
    }

    /// Invalidates running timers; returns the stop command if one is live.
    fn abandon_timers(&mut self) -> Vec<TriviaCommand> {
        let running = matches!(self.phase, Phase::Question(_));
        self.epoch += 1;
        if running {
            vec![TriviaCommand::StopCountdown]
        } else {
            Vec::new()
        }
    }

    fn begin_load(&mut self) -> Vec<TriviaCommand> {
        let id = self.requests.issue();
        self.phase = Phase::Loading;
        debug!(
            "requesting {} questions (ticket {})",
            self.settings.amount,
            id.value()
        );
        vec![TriviaCommand::RequestQuestions {
            id,
            settings: self.settings.clone(),
        }]
    }

    fn finish_load(
        &mut self,
        id: RequestId,
        result: Result<TriviaBatchDto, LoadError>,
    ) -> Vec<TriviaCommand> {
        if !self.requests.settle(id) {
            debug!("dropping stale question response (ticket {})", id.value());
            return Vec::new();
        }
        let validated = result.and_then(|batch| {
            let questions = batch.validate()?.to_vec();
            if questions.len() < self.settings.amount {
                return Err(LoadError::malformed(format!(
                    "received {} of {} requested questions",
                    questions.len(),
                    self.settings.amount
                )));
            }
            Ok(questions)
        });
        match validated {
            Ok(questions) => {
                self.questions = questions.into_iter().map(Question::from).collect();
                self.score = 0;
                self.log.clear();
                self.enter_question(0)
            }
            Err(err) => {
                log::warn!("question load failed: {err}");
                self.phase = Phase::LoadFailed(err);
                Vec::new()
            }
        }
    }

    fn enter_question(&mut self, index: usize) -> Vec<TriviaCommand> {
        self.phase = Phase::Question(index);
        self.time_remaining = QUESTION_SECONDS;
        self.answers = self.questions[index].shuffled_answers(&mut self.rng);
        self.epoch += 1;
        debug!(
            "entering question {index} (epoch {})",
            self.epoch
        );
        vec![TriviaCommand::StartCountdown {
            epoch: TimerEpoch(self.epoch),
        }]
    }

    fn tick(&mut self, epoch: TimerEpoch) -> Vec<TriviaCommand> {
        if epoch.0 != self.epoch || !matches!(self.phase, Phase::Question(_)) {
            debug!("dropping stale tick (epoch {})", epoch.value());
            return Vec::new();
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            // The clock ran out; this is the one and only auto-submission
            // for this question, the epoch bump below retires the timer.
            self.select_answer(None)
        } else {
            Vec::new()
        }
    }

    /// Submits an answer for the question on screen.
    ///
    /// `None` represents a timeout. Correct answers given with time on the
    /// clock earn `max(1, time_remaining / 2)` points; everything else
    /// earns zero. One record is appended to the log either way.
    pub fn select_answer(&mut self, selected: Option<String>) -> Vec<TriviaCommand> {
        let Phase::Question(index) = self.phase else {
            debug!("answer ignored outside a question");
            return Vec::new();
        };
        let question = &self.questions[index];
        let is_correct = question.is_correct(selected.as_deref());
        let points = if is_correct && self.time_remaining > 0 {
            (self.time_remaining / 2).max(1)
        } else {
            0
        };
        self.score += points;
        self.log.push(AnswerRecord {
            question: question.text.clone(),
            selected,
            correct_answer: question.correct_answer.clone(),
            is_correct,
            points,
        });
        debug!("question {index} answered for {points} points");

        self.phase = Phase::Reviewing(index);
        self.epoch += 1;
        vec![
            TriviaCommand::StopCountdown,
            TriviaCommand::ScheduleAdvance {
                epoch: TimerEpoch(self.epoch),
            },
        ]
    }

    fn dwell_elapsed(&mut self, epoch: TimerEpoch) -> Vec<TriviaCommand> {
        let Phase::Reviewing(index) = self.phase else {
            return Vec::new();
        };
        if epoch.0 != self.epoch {
            debug!("dropping stale advance (epoch {})", epoch.value());
            return Vec::new();
        }
        let next = index + 1;
        if next == self.questions.len() {
            self.phase = Phase::Results;
            debug!("round over: {} points", self.score);
            Vec::new()
        } else {
            self.enter_question(next)
        }
    }

    /// Builds a complete view of the session for rendering.
    #[must_use]
    pub fn snapshot(&self) -> TriviaSnapshot {
        let (phase, load_error) = match &self.phase {
            Phase::Settings => (TriviaPhase::Settings, None),
            Phase::Loading => (TriviaPhase::Loading, None),
            Phase::LoadFailed(err) => (TriviaPhase::LoadFailed, Some(err.clone())),
            Phase::Question(index) => (TriviaPhase::Question { index: *index }, None),
            Phase::Reviewing(index) => (TriviaPhase::Reviewing { index: *index }, None),
            Phase::Results => (TriviaPhase::Results, None),
        };
        let question = match self.phase {
            Phase::Question(index) | Phase::Reviewing(index) => {
                let question = &self.questions[index];
                Some(QuestionView {
                    index,
                    total: self.questions.len(),
                    text: question.text.clone(),
                    category: question.category.clone(),
                    difficulty: question.difficulty,
                    answers: self.answers.clone(),
                    time_remaining: self.time_remaining,
                })
            }
            _ => None,
        };
        let results = matches!(self.phase, Phase::Results).then(|| ResultsView {
            score: self.score,
            percentage: percentage(&self.log),
            answers: self.log.clone(),
        });
        TriviaSnapshot {
            phase,
            load_error,
            settings: self.settings.clone(),
            score: self.score,
            question,
            last_answer: self.log.last().cloned(),
            results,
        }
    }
}

/// Rounded percentage of correct answers, half away from zero.
fn percentage(log: &[AnswerRecord]) -> u8 {
    let answered = log.len();
    if answered == 0 {
        return 0;
    }
    let correct = log.iter().filter(|record| record.is_correct).count();
    u8::try_from((100 * correct + answered / 2) / answered).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use parlor_source::{LoadError, fixtures, trivia_dto::TriviaBatchDto};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::{
        QUESTION_SECONDS, RoundSettings, TimerEpoch, TriviaCommand, TriviaEvent, TriviaSession,
    };

    fn session() -> TriviaSession<Pcg64Mcg> {
        TriviaSession::new(Pcg64Mcg::seed_from_u64(42))
    }

    fn settings(amount: usize) -> RoundSettings {
        RoundSettings {
            amount,
            ..RoundSettings::default()
        }
    }

    /// Starts a round served from the arithmetic fixtures and returns the
    /// countdown epoch for question 0.
    fn started_round(session: &mut TriviaSession<Pcg64Mcg>, amount: usize) -> TimerEpoch {
        let commands = session.handle(TriviaEvent::RoundRequested(settings(amount)));
        let [TriviaCommand::RequestQuestions { id, .. }] = commands.as_slice() else {
            panic!("expected a question request");
        };
        let commands = session.handle(TriviaEvent::LoadFinished {
            id: *id,
            result: Ok(fixtures::trivia(amount)),
        });
        let [TriviaCommand::StartCountdown { epoch }] = commands.as_slice() else {
            panic!("expected the question 0 countdown");
        };
        *epoch
    }

    fn tick_times(session: &mut TriviaSession<Pcg64Mcg>, epoch: TimerEpoch, times: u32) {
        for _ in 0..times {
            session.handle(TriviaEvent::Tick { epoch });
        }
    }

    /// Pulls the scheduled-advance epoch out of an answer's commands.
    fn advance_epoch(commands: &[TriviaCommand]) -> TimerEpoch {
        let [TriviaCommand::StopCountdown, TriviaCommand::ScheduleAdvance { epoch }] = commands
        else {
            panic!("expected stop-countdown then schedule-advance");
        };
        *epoch
    }

    #[test]
    fn correct_answer_with_eleven_seconds_left_scores_five() {
        let mut session = session();
        let epoch = started_round(&mut session, 1);
        tick_times(&mut session, epoch, QUESTION_SECONDS - 11);

        // Question 0 of the fixture batch is "What is 0 + 0?".
        let commands = session.handle(TriviaEvent::AnswerSelected(Some("0".to_owned())));
        advance_epoch(&commands);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.score, 5);
        assert!(snapshot.phase.is_reviewing());
        let record = snapshot.last_answer.unwrap();
        assert!(record.is_correct);
        assert_eq!(record.points, 5);
    }

    #[test]
    fn last_second_correct_answer_still_scores_one() {
        let mut session = session();
        let epoch = started_round(&mut session, 1);
        tick_times(&mut session, epoch, QUESTION_SECONDS - 1);
        assert_eq!(session.snapshot().question.unwrap().time_remaining, 1);

        session.handle(TriviaEvent::AnswerSelected(Some("0".to_owned())));
        assert_eq!(session.snapshot().score, 1);
    }

    #[test]
    fn timeout_auto_submits_none_exactly_once() {
        let mut session = session();
        let epoch = started_round(&mut session, 1);
        tick_times(&mut session, epoch, QUESTION_SECONDS);

        let snapshot = session.snapshot();
        assert!(snapshot.phase.is_reviewing());
        assert_eq!(snapshot.score, 0);
        let record = snapshot.last_answer.unwrap();
        assert_eq!(record.selected, None);
        assert!(!record.is_correct);
        assert_eq!(record.points, 0);

        // The countdown epoch is retired; a straggler tick changes nothing.
        let before = session.snapshot();
        session.handle(TriviaEvent::Tick { epoch });
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn stale_tick_after_a_manual_answer_is_a_noop() {
        let mut session = session();
        let epoch = started_round(&mut session, 1);
        session.handle(TriviaEvent::AnswerSelected(Some("wrong".to_owned())));

        let before = session.snapshot();
        tick_times(&mut session, epoch, 25);
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.snapshot().results, None);
    }

    #[test]
    fn two_question_round_reaches_results_with_score_and_log() {
        let mut session = session();
        let epoch = started_round(&mut session, 2);

        // Question 0: answer correctly with 10 seconds left, +5.
        tick_times(&mut session, epoch, QUESTION_SECONDS - 10);
        let commands = session.handle(TriviaEvent::AnswerSelected(Some("0".to_owned())));
        let dwell = advance_epoch(&commands);

        let commands = session.handle(TriviaEvent::DwellElapsed { epoch: dwell });
        let [TriviaCommand::StartCountdown { .. }] = commands.as_slice() else {
            panic!("expected the question 1 countdown");
        };
        assert!(session.snapshot().phase.is_question());

        // Question 1: answer incorrectly, +0.
        let commands = session.handle(TriviaEvent::AnswerSelected(Some("999".to_owned())));
        let dwell = advance_epoch(&commands);
        let commands = session.handle(TriviaEvent::DwellElapsed { epoch: dwell });
        assert!(commands.is_empty());

        let snapshot = session.snapshot();
        assert!(snapshot.phase.is_results());
        let results = snapshot.results.unwrap();
        assert_eq!(results.score, 5);
        assert_eq!(results.percentage, 50);
        assert_eq!(results.answers.len(), 2);
        assert_eq!(
            results.answers.iter().filter(|r| r.is_correct).count(),
            1
        );
    }

    #[test]
    fn stale_dwell_after_back_to_settings_is_a_noop() {
        let mut session = session();
        started_round(&mut session, 1);
        let commands = session.handle(TriviaEvent::AnswerSelected(None));
        let dwell = advance_epoch(&commands);

        let commands = session.handle(TriviaEvent::BackToSettingsRequested);
        assert!(commands.is_empty());
        assert!(session.snapshot().phase.is_settings());

        session.handle(TriviaEvent::DwellElapsed { epoch: dwell });
        assert!(session.snapshot().phase.is_settings());
    }

    #[test]
    fn back_to_settings_mid_question_stops_the_countdown() {
        let mut session = session();
        let epoch = started_round(&mut session, 1);

        let commands = session.handle(TriviaEvent::BackToSettingsRequested);
        assert_eq!(commands, vec![TriviaCommand::StopCountdown]);

        let before = session.snapshot();
        tick_times(&mut session, epoch, 30);
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn fewer_questions_than_requested_is_a_load_failure() {
        let mut session = session();
        let commands = session.handle(TriviaEvent::RoundRequested(settings(5)));
        let [TriviaCommand::RequestQuestions { id, .. }] = commands.as_slice() else {
            panic!("expected a question request");
        };
        session.handle(TriviaEvent::LoadFinished {
            id: *id,
            result: Ok(fixtures::trivia(3)),
        });
        let snapshot = session.snapshot();
        assert!(snapshot.phase.is_load_failed());
        assert!(matches!(
            snapshot.load_error,
            Some(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn empty_batch_is_a_load_failure() {
        let mut session = session();
        let commands = session.handle(TriviaEvent::RoundRequested(settings(5)));
        let [TriviaCommand::RequestQuestions { id, .. }] = commands.as_slice() else {
            panic!("expected a question request");
        };
        session.handle(TriviaEvent::LoadFinished {
            id: *id,
            result: Ok(TriviaBatchDto { questions: vec![] }),
        });
        assert_eq!(session.snapshot().load_error, Some(LoadError::Empty));
    }

    #[test]
    fn stale_load_response_is_ignored() {
        let mut session = session();
        let first = session.handle(TriviaEvent::RoundRequested(settings(2)));
        let [TriviaCommand::RequestQuestions { id: first_id, .. }] = first.as_slice() else {
            panic!("expected a question request");
        };
        let first_id = *first_id;

        let second = session.handle(TriviaEvent::RoundRequested(settings(3)));
        let [TriviaCommand::RequestQuestions { id: second_id, .. }] = second.as_slice() else {
            panic!("expected a question request");
        };

        let commands = session.handle(TriviaEvent::LoadFinished {
            id: first_id,
            result: Ok(fixtures::trivia(2)),
        });
        assert!(commands.is_empty());
        assert!(session.snapshot().phase.is_loading());

        session.handle(TriviaEvent::LoadFinished {
            id: *second_id,
            result: Ok(fixtures::trivia(3)),
        });
        assert!(session.snapshot().phase.is_question());
        assert_eq!(session.snapshot().question.unwrap().total, 3);
    }

    #[test]
    fn play_again_re_requests_the_same_settings() {
        let mut session = session();
        started_round(&mut session, 1);
        let commands = session.handle(TriviaEvent::AnswerSelected(None));
        let dwell = advance_epoch(&commands);
        session.handle(TriviaEvent::DwellElapsed { epoch: dwell });
        assert!(session.snapshot().phase.is_results());

        let commands = session.handle(TriviaEvent::PlayAgainRequested);
        let [TriviaCommand::RequestQuestions {
            settings: requested,
            ..
        }] = commands.as_slice()
        else {
            panic!("expected a question request");
        };
        assert_eq!(*requested, settings(1));
        assert!(session.snapshot().phase.is_loading());
    }

    #[test]
    fn answer_outside_a_question_is_ignored() {
        let mut session = session();
        let commands = session.handle(TriviaEvent::AnswerSelected(Some("0".to_owned())));
        assert!(commands.is_empty());
        assert_eq!(session.snapshot().last_answer, None);
    }

    #[test]
    fn question_view_presents_the_full_answer_pool() {
        let mut session = session();
        started_round(&mut session, 1);
        let view = session.snapshot().question.unwrap();
        assert_eq!(view.index, 0);
        assert_eq!(view.total, 1);
        assert_eq!(view.time_remaining, QUESTION_SECONDS);
        assert_eq!(view.answers.len(), 4);
        assert!(view.answers.contains(&"0".to_owned()));
    }
}
