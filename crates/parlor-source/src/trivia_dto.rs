//! Wire format and validation for the trivia question service.

use parlor_core::Difficulty;

use crate::LoadError;

/// One trivia question as delivered by the service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TriviaQuestionDto {
    /// Question text.
    pub question: String,
    /// Human-readable category name.
    pub category: String,
    /// Question difficulty.
    pub difficulty: Difficulty,
    /// The single correct answer.
    pub correct_answer: String,
    /// Distractor answers, at least one.
    pub incorrect_answers: Vec<String>,
}

/// A batch of trivia questions for one round.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TriviaBatchDto {
    /// Questions in round order.
    pub questions: Vec<TriviaQuestionDto>,
}

impl TriviaBatchDto {
    /// Validates the batch structurally.
    ///
    /// An empty batch is [`LoadError::Empty`]; a question with no text, no
    /// correct answer, or no distractors is [`LoadError::Malformed`]. Whether
    /// the batch is *large enough* for the requested round is the flow
    /// controller's call, since only it knows the requested amount.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn validate(&self) -> Result<&[TriviaQuestionDto], LoadError> {
        if self.questions.is_empty() {
            return Err(LoadError::Empty);
        }
        for (index, question) in self.questions.iter().enumerate() {
            if question.question.is_empty() || question.correct_answer.is_empty() {
                return Err(LoadError::malformed(format!(
                    "question {index} is missing text or a correct answer"
                )));
            }
            if question.incorrect_answers.is_empty() {
                return Err(LoadError::malformed(format!(
                    "question {index} has no incorrect answers"
                )));
            }
        }
        Ok(&self.questions)
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::Difficulty;

    use super::{TriviaBatchDto, TriviaQuestionDto};
    use crate::LoadError;

    fn question(text: &str) -> TriviaQuestionDto {
        TriviaQuestionDto {
            question: text.to_owned(),
            category: "General Knowledge".to_owned(),
            difficulty: Difficulty::Easy,
            correct_answer: "Yes".to_owned(),
            incorrect_answers: vec!["No".to_owned()],
        }
    }

    #[test]
    fn empty_batch_is_empty_error() {
        let batch = TriviaBatchDto { questions: vec![] };
        assert_eq!(batch.validate(), Err(LoadError::Empty));
    }

    #[test]
    fn question_without_distractors_is_malformed() {
        let mut q = question("Is water wet?");
        q.incorrect_answers.clear();
        let batch = TriviaBatchDto { questions: vec![q] };
        assert!(matches!(batch.validate(), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn well_formed_batch_passes() {
        let batch = TriviaBatchDto {
            questions: vec![question("Is water wet?"), question("Is fire cold?")],
        };
        assert_eq!(batch.validate().unwrap().len(), 2);
    }

    #[test]
    fn dto_deserializes_from_service_json() {
        let json = r#"{"questions":[{
            "question":"What is 2+2?",
            "category":"Mathematics",
            "difficulty":"easy",
            "correct_answer":"4",
            "incorrect_answers":["3","5","22"]
        }]}"#;
        let batch: TriviaBatchDto = serde_json::from_str(json).unwrap();
        assert_eq!(batch.questions[0].incorrect_answers.len(), 3);
        assert!(batch.validate().is_ok());
    }
}
