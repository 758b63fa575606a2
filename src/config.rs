use std::path::PathBuf;
use std::time::Duration;

use crate::console::notify::{DEFAULT_CAPACITY, DEFAULT_TTL_MS};

const DEFAULT_PREFS_PATH: &str = ".iqscore/prefs.json";
const DEFAULT_LIST_TIMEOUT_SECS: u64 = 8;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing env {0}")]
    MissingEnv(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub prefs_path: PathBuf,
    /// Applied to every read; 0 in the environment disables it.
    pub list_timeout: Option<Duration>,
    pub notice_ttl_ms: i64,
    /// 0 keeps every notification until it expires.
    pub notice_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = get("API_BASE_URL")
            .or_else(|| get("VITE_API_BASE_URL"))
            .ok_or(ConfigError::MissingEnv("API_BASE_URL"))?;
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "API_BASE_URL",
                value: api_base_url,
            });
        }

        let timeout_secs: u64 = parse(&get, "IQSCORE_LIST_TIMEOUT_SECS", DEFAULT_LIST_TIMEOUT_SECS)?;
        let notice_ttl_ms: i64 = parse(&get, "IQSCORE_NOTICE_TTL_MS", DEFAULT_TTL_MS)?;
        if notice_ttl_ms <= 0 {
            return Err(ConfigError::Invalid {
                key: "IQSCORE_NOTICE_TTL_MS",
                value: notice_ttl_ms.to_string(),
            });
        }

        Ok(Self {
            api_base_url,
            prefs_path: get("IQSCORE_PREFS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_PATH)),
            list_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            notice_ttl_ms,
            notice_capacity: parse(&get, "IQSCORE_NOTICE_CAP", DEFAULT_CAPACITY)?,
        })
    }
}

fn parse<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
