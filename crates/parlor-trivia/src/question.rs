use parlor_core::Difficulty;
use parlor_source::trivia_dto::TriviaQuestionDto;
use rand::{Rng, seq::SliceRandom};

/// One quiz question with its answer pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Question text.
    pub text: String,
    /// Human-readable category name.
    pub category: String,
    /// Question difficulty.
    pub difficulty: Difficulty,
    /// The single correct answer.
    pub correct_answer: String,
    /// Distractor answers.
    pub incorrect_answers: Vec<String>,
}

impl From<TriviaQuestionDto> for Question {
    fn from(dto: TriviaQuestionDto) -> Self {
        Self {
            text: dto.question,
            category: dto.category,
            difficulty: dto.difficulty,
            correct_answer: dto.correct_answer,
            incorrect_answers: dto.incorrect_answers,
        }
    }
}

impl Question {
    /// Returns true if `selected` is this question's correct answer.
    #[must_use]
    pub fn is_correct(&self, selected: Option<&str>) -> bool {
        selected == Some(self.correct_answer.as_str())
    }

    /// The full answer pool (correct plus distractors) in randomized order.
    ///
    /// Computed fresh on every call; display order is never persisted, the
    /// answer log alone drives results rendering.
    #[must_use]
    pub fn shuffled_answers<R: Rng>(&self, rng: &mut R) -> Vec<String> {
        let mut answers: Vec<String> = self.incorrect_answers.clone();
        answers.push(self.correct_answer.clone());
        answers.shuffle(rng);
        answers
    }
}
