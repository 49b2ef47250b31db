use log::debug;

use super::{validate_questions, validate_quiz_definition, Question, QuizDefinition, QuizError, ANSWER_COUNT};

pub const CORRECT_ANSWER_POINTS: i64 = 2;
pub const WRONG_ANSWER_PENALTY: i64 = 1;

/// The engine the bot plays with.
pub type Quiz = QuizEngine<ANSWER_COUNT>;

/// One quiz session over a validated list of questions, each offering `K` answers.
///
/// A fresh engine is unstarted: `check` and `next` do nothing until `start` is called.
/// `start` may be called again at any point to restart from the first question with a zero score.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "QuizSnapshot", into = "QuizSnapshot")]
pub struct QuizEngine<const K: usize> {
    questions: Vec<Question>,
    // None until the first `start`
    position: Option<usize>,
    score: i64,
}

impl<const K: usize> QuizEngine<K> {
    pub fn validate(definition: &QuizDefinition) -> bool {
        validate_quiz_definition::<K>(definition)
    }

    pub fn new(definition: QuizDefinition) -> Result<Self, QuizError> {
        Self::from_questions(definition.questions)
    }

    /// Builds an engine from the question list alone, leaving title and description behind.
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, QuizError> {
        if !validate_questions::<K>(&questions) {
            return Err(QuizError::InvalidStructure);
        }

        Ok(Self {
            questions,
            position: None,
            score: 0,
        })
    }

    /// Resets progress and score, returning the first question.
    pub fn start(&mut self) -> &Question {
        self.position = Some(0);
        self.score = 0;

        // never empty, `new` rejects empty definitions
        return &self.questions[0];
    }

    /// Scores an answer to the current question without moving on.
    ///
    /// Any index other than the correct one is a wrong answer, negative or out of range included.
    /// Returns false and leaves the score alone if the quiz hasn't been started.
    pub fn check(&mut self, answer_index: i64) -> bool {
        let is_correct = match self.current_question() {
            Some(question) => question.correct_answer_index == answer_index,
            None => return false,
        };

        if is_correct {
            self.score += CORRECT_ANSWER_POINTS;
        } else {
            self.score -= WRONG_ANSWER_PENALTY;
        }
        debug!(
            "Answer {} to question {:?}: correct = {}, score = {}",
            answer_index, self.position, is_correct, self.score
        );

        return is_correct;
    }

    /// Moves to the next question. Returns false at the last question (and before `start`).
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        match self.position {
            Some(index) if index + 1 < self.questions.len() => {
                self.position = Some(index + 1);
                true
            }
            _ => false,
        }
    }

    pub fn result(&self) -> i64 {
        self.score
    }

    pub fn current_index(&self) -> Option<usize> {
        self.position
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.position.map(|index| &self.questions[index])
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Score of a session with every answer right.
    pub fn max_score(&self) -> i64 {
        self.questions.len() as i64 * CORRECT_ANSWER_POINTS
    }

    pub fn is_perfect(&self) -> bool {
        self.score == self.max_score()
    }
}

/// Serialized form of an engine, kept in the dialogue storage between messages.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QuizSnapshot {
    pub questions: Vec<Question>,
    pub position: Option<usize>,
    pub score: i64,
}

impl<const K: usize> From<QuizEngine<K>> for QuizSnapshot {
    fn from(engine: QuizEngine<K>) -> Self {
        Self {
            questions: engine.questions,
            position: engine.position,
            score: engine.score,
        }
    }
}

impl<const K: usize> TryFrom<QuizSnapshot> for QuizEngine<K> {
    type Error = QuizError;

    fn try_from(snapshot: QuizSnapshot) -> Result<Self, Self::Error> {
        let mut engine = Self::from_questions(snapshot.questions)?;

        match snapshot.position {
            Some(index) if index >= engine.questions.len() => {
                return Err(QuizError::InvalidProgress(format!(
                    "question {} of a quiz with {} questions",
                    index,
                    engine.questions.len()
                )));
            }
            None if snapshot.score != 0 => {
                return Err(QuizError::InvalidProgress(format!(
                    "score {} before the quiz was started",
                    snapshot.score
                )));
            }
            _ => {}
        }

        engine.position = snapshot.position;
        engine.score = snapshot.score;
        Ok(engine)
    }
}
