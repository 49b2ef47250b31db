use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{QuizDefinition, QuizError};

impl QuizDefinition {
    /// Parses a definition from JSON. Structure is checked later, when an engine is built from it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuizError> {
        let definition: QuizDefinition = serde_json::from_reader(reader)?;
        return Ok(definition);
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{validate_quiz_definition, ANSWER_COUNT};

    const QUIZ_JSON: &str = r#"{
        "title": "Space quiz",
        "shortDescription": "Three questions about the solar system",
        "questions": [
            {
                "question": "Which planet is the largest?",
                "answers": ["Earth", "Jupiter", "Saturn"],
                "correctAnswerIndex": 1
            },
            {
                "question": "Which planet has the most visible rings?",
                "answers": ["Saturn", "Mars", "Venus"],
                "correctAnswerIndex": 0
            }
        ]
    }"#;

    #[test]
    fn parses_quiz_file() {
        let definition = QuizDefinition::from_reader(QUIZ_JSON.as_bytes()).unwrap();
        assert_eq!(definition.title.as_deref(), Some("Space quiz"));
        assert_eq!(
            definition.short_description.as_deref(),
            Some("Three questions about the solar system")
        );
        assert_eq!(definition.questions.len(), 2);
        assert_eq!(definition.questions[0].text, "Which planet is the largest?");
        assert_eq!(definition.questions[0].correct_answer_index, 1);
        assert!(validate_quiz_definition::<ANSWER_COUNT>(&definition));
    }

    #[test]
    fn missing_questions_parse_as_empty() {
        let definition = QuizDefinition::from_reader(r#"{"title": "Nothing here"}"#.as_bytes()).unwrap();
        assert!(definition.questions.is_empty());
        assert!(definition.short_description.is_none());
        assert!(!validate_quiz_definition::<ANSWER_COUNT>(&definition));
    }

    #[test]
    fn negative_index_parses_but_does_not_validate() {
        let json = r#"{"questions": [{"question": "?", "answers": ["a", "b", "c"], "correctAnswerIndex": -1}]}"#;
        let definition = QuizDefinition::from_reader(json.as_bytes()).unwrap();
        assert_eq!(definition.questions[0].correct_answer_index, -1);
        assert!(!validate_quiz_definition::<ANSWER_COUNT>(&definition));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = QuizDefinition::from_reader(r#"{"questions": [{"question": 5}]}"#.as_bytes());
        assert!(matches!(result, Err(QuizError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = QuizDefinition::open("definitely/not/here/quiz.json");
        assert!(matches!(result, Err(QuizError::Io(_))));
    }

    #[test]
    fn bundled_quiz_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("quiz.json");
        let definition = QuizDefinition::open(path).unwrap();
        assert!(validate_quiz_definition::<ANSWER_COUNT>(&definition));
    }
}
