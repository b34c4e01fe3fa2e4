use std::path::PathBuf;

use thiserror::Error;

use crate::scheduler::{ParamsError, SrsParams};

const DATA_DIR_NAME: &str = "vocabulary-learning";
const PROGRESS_FILE: &str = "progress.json";
const VOCABULARY_FILE: &str = "vocabulary.json";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid value")]
    Invalid { key: String, value: String },

    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// Where log output goes. File logging is off unless `ENABLE_FILE_LOGS` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: String,
    /// Directory of the daily rolling log file; `None` logs to stderr only.
    pub file_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub progress_file: PathBuf,
    pub catalog_file: PathBuf,
    pub log: LogSettings,
    pub params: SrsParams,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; a present but unparsable
    /// value is an error rather than a silent default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("VOCAB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let progress_file = data_dir.join(
            lookup("VOCAB_PROGRESS_FILE").unwrap_or_else(|| PROGRESS_FILE.to_string()),
        );
        let catalog_file = data_dir.join(
            lookup("VOCAB_CATALOG_FILE").unwrap_or_else(|| VOCABULARY_FILE.to_string()),
        );

        let file_logs = match lookup("ENABLE_FILE_LOGS") {
            Some(value) => parse_flag("ENABLE_FILE_LOGS", &value)?,
            None => false,
        };
        let log = LogSettings {
            level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            file_dir: file_logs.then(|| {
                lookup("LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
            }),
        };

        let defaults = SrsParams::default();
        let params = SrsParams {
            max_active_words: parsed(&lookup, "SRS_MAX_ACTIVE_WORDS")?.unwrap_or(defaults.max_active_words),
            mastery_min_successes: parsed(&lookup, "SRS_MASTERY_MIN_SUCCESSES")?
                .unwrap_or(defaults.mastery_min_successes),
            mastery_success_rate: parsed(&lookup, "SRS_MASTERY_SUCCESS_RATE")?
                .unwrap_or(defaults.mastery_success_rate),
            half_life_days: parsed(&lookup, "SRS_HALF_LIFE_DAYS")?.unwrap_or(defaults.half_life_days),
            ..defaults
        };
        params.validate()?;

        Ok(Self {
            data_dir,
            progress_file,
            catalog_file,
            log,
            params,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::Invalid {
                key: key.to_string(),
                value,
            }),
        },
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(DATA_DIR_NAME))
}
