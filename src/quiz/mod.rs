pub mod engine;
pub mod loader;

use rand::seq::SliceRandom;
use rand::Rng;

pub use engine::Quiz;

/// Number of answers every question has to offer.
pub const ANSWER_COUNT: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("Invalid quiz structure")]
    InvalidStructure,

    #[error("Invalid quiz progress: {0}")]
    InvalidProgress(String),

    #[error("Failed to read the quiz file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse the quiz file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A quiz as it is written in `quiz.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuizDefinition {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            title: None,
            short_description: None,
            questions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub answers: Vec<String>,
    #[serde(rename = "correctAnswerIndex")]
    pub correct_answer_index: i64,
}

impl Question {
    /// A question is valid when it offers exactly `K` answers and points at one of them.
    pub fn is_valid<const K: usize>(&self) -> bool {
        return self.answers.len() == K
            && self.correct_answer_index >= 0
            && self.correct_answer_index < K as i64;
    }

    pub fn correct_answer(&self) -> Option<&str> {
        usize::try_from(self.correct_answer_index)
            .ok()
            .and_then(|i| self.answers.get(i))
            .map(String::as_str)
    }
}

/// Checks a definition without building an engine from it.
///
/// Fails on an empty question list and on any question that is not valid for arity `K`.
pub fn validate_quiz_definition<const K: usize>(definition: &QuizDefinition) -> bool {
    validate_questions::<K>(&definition.questions)
}

pub(crate) fn validate_questions<const K: usize>(questions: &[Question]) -> bool {
    if questions.is_empty() {
        return false;
    }

    questions.iter().all(Question::is_valid::<K>)
}

/// Answers paired with their original index, in random order.
///
/// The indices are the ones `QuizEngine::check` expects, so presentation order never affects scoring.
pub fn shuffled_answers<'a, R: Rng + ?Sized>(question: &'a Question, rng: &mut R) -> Vec<(usize, &'a str)> {
    let mut answers = question
        .answers
        .iter()
        .map(String::as_str)
        .enumerate()
        .collect::<Vec<_>>();
    answers.shuffle(rng);
    // returns
    answers
}

/// Button label for the answer shown at `position` on a question card.
///
/// The number keeps labels distinct even when two answers share their text.
pub fn answer_label(position: usize, text: &str) -> String {
    format!("{}. {}", position + 1, text)
}

/// Maps a pressed label back to the answer's original index.
///
/// `order` holds the original indices in the order the buttons were shown.
/// Labels that don't match the question's answer at that position (stale keyboards, typed text) give None.
pub fn pressed_answer(question: &Question, order: &[usize], label: &str) -> Option<usize> {
    let (number, text) = label.split_once(". ")?;
    let position = number.trim().parse::<usize>().ok()?.checked_sub(1)?;
    let index = *order.get(position)?;

    if question.answers.get(index).map(String::as_str) != Some(text) {
        return None;
    }
    return Some(index);
}
