use crate::emotion::IntensityPolicy;
use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroUsize, path::PathBuf, str::FromStr};

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;
pub const DEFAULT_OUTPUT_FORMAT: &str = "text";
pub const ENV_LEXICON_PATH: &str = "ORA_LEXICON_PATH";
pub const ENV_HISTORY_CAPACITY: &str = "ORA_HISTORY_CAPACITY";
pub const ENV_OUTPUT_FORMAT: &str = "ORA_OUTPUT_FORMAT";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryCapacity(NonZeroUsize);

impl HistoryCapacity {
    pub fn new(turns: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(turns)
            .map(Self)
            .ok_or(ConfigError::ZeroHistoryCapacity)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    pub fn as_non_zero(&self) -> NonZeroUsize {
        self.0
    }
}

impl Default for HistoryCapacity {
    fn default() -> Self {
        match NonZeroUsize::new(DEFAULT_HISTORY_CAPACITY) {
            Some(turns) => Self(turns),
            None => Self(NonZeroUsize::MIN),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnknownOutputFormat(s.to_owned())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub lexicon_path: Option<PathBuf>,
    pub intensity: IntensityPolicy,
    pub history: HistoryCapacity,
    pub output: OutputFormat,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("history capacity must be > 0 turns")]
    ZeroHistoryCapacity,
    #[error("intensity coefficient `{name}` must be within [0, 1], got {value}")]
    IntensityOutOfRange { name: &'static str, value: f32 },
    #[error("{key} is not a valid number: {value}")]
    InvalidNumber { key: String, value: String },
    #[error("unknown output format `{0}` (expected text or json)")]
    UnknownOutputFormat(String),
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_optional_string(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Option<String> {
    match cli_value {
        Some(v) => Some(v),
        None => env.var(env_key),
    }
}

pub fn resolve_history_capacity(
    cli_value: Option<usize>,
    env: &impl Env,
) -> Result<HistoryCapacity, ConfigError> {
    let turns = match cli_value {
        Some(v) => v,
        None => match env.var(ENV_HISTORY_CAPACITY) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidNumber {
                    key: ENV_HISTORY_CAPACITY.to_owned(),
                    value: raw,
                })?,
            None => DEFAULT_HISTORY_CAPACITY,
        },
    };
    HistoryCapacity::new(turns)
}

pub fn resolve_output_format(
    cli_value: Option<String>,
    env: &impl Env,
) -> Result<OutputFormat, ConfigError> {
    resolve_string_with_default(cli_value, ENV_OUTPUT_FORMAT, env, DEFAULT_OUTPUT_FORMAT).parse()
}
