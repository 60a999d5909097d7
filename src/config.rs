//! Runtime configuration.
//!
//! Values come from, in order of priority: command-line flags, the
//! `VOCAB_QUIZ_BOOKS_DIR` environment variable (a `.env` file is honoured),
//! a TOML config file, and finally the defaults below.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::quiz::{generator::DEFAULT_QUESTION_COUNT, SessionSettings, DEFAULT_TIME_LIMIT_TENTHS};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "vocab-quiz.toml";

pub const DEFAULT_BOOKS_DIR: &str = "books";

pub const BOOKS_DIR_ENV: &str = "VOCAB_QUIZ_BOOKS_DIR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub books_dir: PathBuf,
    /// Where tracing output goes; logging is discarded when unset.
    pub log_file: Option<PathBuf>,
    /// Ring the terminal bell on answers.
    pub haptics: bool,
    pub quiz: QuizConfig,
    pub audio: AudioConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            books_dir: PathBuf::from(DEFAULT_BOOKS_DIR),
            log_file: None,
            haptics: false,
            quiz: QuizConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub question_count: usize,
    pub time_limit_secs: f32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            time_limit_secs: DEFAULT_TIME_LIMIT_TENTHS as f32 / 10.0,
        }
    }
}

impl QuizConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            question_count: self.question_count.max(1),
            time_limit_tenths: (self.time_limit_secs.max(0.1) * 10.0).round() as u32,
        }
    }
}

/// External commands used to play pronunciations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Invoked as `<player> <url>`.
    pub player: Option<String>,
    /// Invoked as `<speech> <text>` when the player is unavailable.
    pub speech: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Invalid config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Ok(dir) = std::env::var(BOOKS_DIR_ENV) {
            if !dir.trim().is_empty() {
                config.books_dir = PathBuf::from(dir);
            }
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_means_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.quiz.session_settings(), SessionSettings::default());
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let config = Config::from_toml(
            r#"
            books_dir = "/srv/books"
            haptics = true

            [quiz]
            time_limit_secs = 20.0

            [audio]
            speech = "espeak -v en"
            "#,
        )
        .unwrap();

        assert_eq!(config.books_dir, PathBuf::from("/srv/books"));
        assert!(config.haptics);
        assert_eq!(config.quiz.question_count, 10);
        assert_eq!(config.quiz.session_settings().time_limit_tenths, 200);
        assert_eq!(config.audio.player, None);
        assert_eq!(config.audio.speech.as_deref(), Some("espeak -v en"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "quiz = 3").unwrap();
        assert!(matches!(Config::from_file(&bad), Err(ConfigError::Parse { .. })));
    }
}
