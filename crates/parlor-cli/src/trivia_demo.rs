//! Scripted trivia round against the fixture source.

use log::debug;
use parlor_source::{
    FixtureSource, LoadError, LoadRequest, LoadResponse, PuzzleSource, trivia_dto::TriviaBatchDto,
};
use parlor_trivia::{
    RoundSettings, TimerEpoch, TriviaCommand, TriviaEvent, TriviaPhase, TriviaSession,
};
use rand::rngs::ThreadRng;

type Session = TriviaSession<ThreadRng>;

/// The shell side of the trivia command protocol: it fetches question
/// batches and stands in for the countdown and dwell timers.
struct Shell {
    source: FixtureSource,
    countdown: Option<TimerEpoch>,
    advance: Option<TimerEpoch>,
}

impl Shell {
    fn perform(&mut self, session: &mut Session, commands: Vec<TriviaCommand>) {
        for command in commands {
            debug!("performing {command:?}");
            match command {
                TriviaCommand::RequestQuestions { id, settings } => {
                    let result = self.fetch(&settings);
                    let follow = session.handle(TriviaEvent::LoadFinished { id, result });
                    self.perform(session, follow);
                }
                TriviaCommand::StartCountdown { epoch } => self.countdown = Some(epoch),
                TriviaCommand::StopCountdown => self.countdown = None,
                TriviaCommand::ScheduleAdvance { epoch } => self.advance = Some(epoch),
            }
        }
    }

    fn fetch(&mut self, settings: &RoundSettings) -> Result<TriviaBatchDto, LoadError> {
        let request = LoadRequest::Trivia {
            amount: settings.amount,
            category: settings.category.clone(),
            difficulty: settings.difficulty,
        };
        match self.source.fetch(&request)? {
            LoadResponse::Trivia(batch) => Ok(batch),
            LoadResponse::Sudoku(_) | LoadResponse::WordSearch(_) => {
                Err(LoadError::malformed("unexpected response variant"))
            }
        }
    }

    /// Plays the countdown forward by up to `seconds` ticks.
    fn tick(&mut self, session: &mut Session, seconds: u32) {
        for _ in 0..seconds {
            let Some(epoch) = self.countdown else {
                return;
            };
            let commands = session.handle(TriviaEvent::Tick { epoch });
            self.perform(session, commands);
        }
    }
}

pub fn run(amount: usize) {
    let mut session = TriviaSession::new(rand::rng());
    let mut shell = Shell {
        source: FixtureSource::new(),
        countdown: None,
        advance: None,
    };

    println!("starting a round of {amount} questions");
    let commands = session.handle(TriviaEvent::RoundRequested(RoundSettings {
        amount,
        ..RoundSettings::default()
    }));
    shell.perform(&mut session, commands);

    loop {
        let snapshot = session.snapshot();
        match snapshot.phase {
            TriviaPhase::Question { index } => {
                if let Some(view) = &snapshot.question {
                    println!(
                        "\nquestion {}/{}: {} ({}s)",
                        view.index + 1,
                        view.total,
                        view.text,
                        view.time_remaining
                    );
                    for answer in &view.answers {
                        println!("  - {answer}");
                    }
                }
                // Script: answer the first question correctly with time to
                // spare, the second wrongly, and let the rest time out. The
                // fixture batch asks "What is i + i?".
                let commands = match index {
                    0 => {
                        shell.tick(&mut session, 10);
                        session.handle(TriviaEvent::AnswerSelected(Some((2 * index).to_string())))
                    }
                    1 => session
                        .handle(TriviaEvent::AnswerSelected(Some((2 * index + 1).to_string()))),
                    _ => {
                        shell.tick(&mut session, 30);
                        if session.snapshot().phase.is_question() {
                            session.handle(TriviaEvent::AnswerSelected(None))
                        } else {
                            Vec::new()
                        }
                    }
                };
                shell.perform(&mut session, commands);
            }
            TriviaPhase::Reviewing { .. } => {
                if let Some(record) = &snapshot.last_answer {
                    let selected = record.selected.as_deref().unwrap_or("(timed out)");
                    println!(
                        "answered {selected}: {} for {} points",
                        if record.is_correct { "correct" } else { "wrong" },
                        record.points
                    );
                }
                let Some(epoch) = shell.advance.take() else {
                    break;
                };
                let commands = session.handle(TriviaEvent::DwellElapsed { epoch });
                shell.perform(&mut session, commands);
            }
            TriviaPhase::Results => {
                if let Some(results) = &snapshot.results {
                    println!(
                        "\nround over: {} points, {}% correct over {} answers",
                        results.score,
                        results.percentage,
                        results.answers.len()
                    );
                    for record in &results.answers {
                        let mark = if record.is_correct { 'x' } else { ' ' };
                        println!("[{mark}] {} (answer: {})", record.question, record.correct_answer);
                    }
                }
                break;
            }
            TriviaPhase::LoadFailed => {
                if let Some(err) = &snapshot.load_error {
                    println!("round could not start: {err}");
                }
                break;
            }
            TriviaPhase::Settings | TriviaPhase::Loading => break,
        }
    }
}
