//! The trivia round flow controller.
//!
//! [`TriviaSession`] drives one round from the settings screen through
//! timed questions to the results screen. Timers live in the embedding
//! shell; the session emits [`TriviaCommand`]s to start and cancel them
//! and stamps each with a [`TimerEpoch`] so a superseded timer can never
//! score a question twice.

mod question;
mod session;

pub use question::Question;
pub use session::{
    AnswerRecord, DEFAULT_AMOUNT, DWELL_SECONDS, QUESTION_SECONDS, QuestionView, ResultsView,
    RoundSettings, TimerEpoch, TriviaCommand, TriviaEvent, TriviaPhase, TriviaSession,
    TriviaSnapshot,
};
