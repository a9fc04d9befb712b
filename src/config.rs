use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::article::DEFAULT_PAGE_SIZE_MAX;
use crate::blockchain::{DEFAULT_DIFFICULTY, DEFAULT_MAX_NONCE};

/// Runtime settings, read from the environment after `.env` is loaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_nonce: u64,
    pub default_difficulty: u32,
    pub page_size_max: usize,
    /// JSON file backing the preference store; in-memory only when unset.
    pub prefs_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_nonce: DEFAULT_MAX_NONCE,
            default_difficulty: DEFAULT_DIFFICULTY,
            page_size_max: DEFAULT_PAGE_SIZE_MAX,
            prefs_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparsable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            max_nonce: parse_or(&lookup, "DEMOCHAIN_MAX_NONCE", defaults.max_nonce),
            default_difficulty: parse_or(
                &lookup,
                "DEMOCHAIN_DEFAULT_DIFFICULTY",
                defaults.default_difficulty,
            ),
            page_size_max: parse_or(&lookup, "DEMOCHAIN_PAGE_SIZE_MAX", defaults.page_size_max)
                .max(1),
            prefs_path: lookup("DEMOCHAIN_PREFS_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw:?}, using default");
            default
        }),
        None => default,
    }
}
