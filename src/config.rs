use std::env;
use std::path::PathBuf;

const DEFAULT_QUIZ_FILE: &str = "quiz.json";
const DEFAULT_STORAGE: &str = "db.sqlite";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Bot settings read from the environment (and `.env`, if `main` loaded one).
///
/// The bot token is not here: teloxide reads `TELOXIDE_TOKEN` itself.
#[derive(Debug, Clone)]
pub struct Config {
    pub quiz_file: PathBuf,
    pub storage_path: String,
    pub shuffle_answers: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let quiz_file = lookup("QUIZ_FILE").unwrap_or_else(|| DEFAULT_QUIZ_FILE.to_string());
        let storage_path = lookup("QUIZ_STORAGE").unwrap_or_else(|| DEFAULT_STORAGE.to_string());
        let shuffle_answers = match lookup("QUIZ_SHUFFLE_ANSWERS") {
            Some(value) => parse_flag("QUIZ_SHUFFLE_ANSWERS", &value)?,
            None => true,
        };

        Ok(Self {
            quiz_file: quiz_file.into(),
            storage_path,
            shuffle_answers,
        })
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.quiz_file, PathBuf::from("quiz.json"));
        assert_eq!(config.storage_path, "db.sqlite");
        assert!(config.shuffle_answers);
    }

    #[test]
    fn reads_every_setting() {
        let config = config_from(&[
            ("QUIZ_FILE", "/srv/quizzes/space.json"),
            ("QUIZ_STORAGE", "/var/lib/quiz/dialogues.sqlite"),
            ("QUIZ_SHUFFLE_ANSWERS", "no"),
        ])
        .unwrap();
        assert_eq!(config.quiz_file, PathBuf::from("/srv/quizzes/space.json"));
        assert_eq!(config.storage_path, "/var/lib/quiz/dialogues.sqlite");
        assert!(!config.shuffle_answers);
    }

    #[test]
    fn invalid_shuffle_flag_fails_the_config() {
        let err = config_from(&[("QUIZ_SHUFFLE_ANSWERS", "sometimes")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "QUIZ_SHUFFLE_ANSWERS", ref value } if value == "sometimes"
        ));
    }

    #[test]
    fn parses_flags() {
        assert!(parse_flag("KEY", "true").unwrap());
        assert!(parse_flag("KEY", " YES ").unwrap());
        assert!(parse_flag("KEY", "1").unwrap());
        assert!(!parse_flag("KEY", "false").unwrap());
        assert!(!parse_flag("KEY", "Off").unwrap());
        assert!(!parse_flag("KEY", "0").unwrap());
    }

    #[test]
    fn rejects_unknown_flag_values() {
        let err = parse_flag("QUIZ_SHUFFLE_ANSWERS", "maybe").unwrap_err();
        assert_eq!(
            err.to_string(),
            "QUIZ_SHUFFLE_ANSWERS has an invalid value: \"maybe\""
        );
    }
}
