use std::{env, path::PathBuf, time::Duration};

use crate::constants::{DEFAULT_MAX_NAME_LEN, DEFAULT_RANKING_LIMIT};

pub const DEFAULT_DB_PATH: &str = "bismuth_strike.db";
/// ≈60 FPS.
pub const DEFAULT_FRAME_MILLIS: u64 = 16;

/// Runtime settings: defaults, then `BISMUTH_*` environment variables, then
/// command-line flags (applied by the binary).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub max_name_len: usize,
    pub ranking_limit: usize,
    pub frame_millis: u64,
    pub log_file: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            max_name_len: DEFAULT_MAX_NAME_LEN,
            ranking_limit: DEFAULT_RANKING_LIMIT,
            frame_millis: DEFAULT_FRAME_MILLIS,
            log_file: None,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env::var_os("BISMUTH_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            max_name_len: read_env_usize("BISMUTH_MAX_NAME_LEN", defaults.max_name_len),
            ranking_limit: read_env_usize("BISMUTH_RANKING_LIMIT", defaults.ranking_limit),
            frame_millis: read_env_u64("BISMUTH_FRAME_MILLIS", defaults.frame_millis),
            log_file: env::var_os("BISMUTH_LOG_FILE").map(PathBuf::from),
            seed: read_env_optional_u64("BISMUTH_SEED"),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_millis)
    }
}

fn parse_positive<T: std::str::FromStr + PartialOrd + Default>(value: &str) -> Option<T> {
    value
        .trim()
        .parse::<T>()
        .ok()
        .filter(|v| *v > T::default())
}

pub(crate) fn read_env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| parse_positive(&value))
        .unwrap_or(default)
}

pub(crate) fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| parse_positive(&value))
        .unwrap_or(default)
}

/// Zero is a valid seed, so this one accepts it.
pub(crate) fn read_env_optional_u64(name: &str) -> Option<u64> {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_leaderboard_constants() {
        let config = Config::default();
        assert_eq!(config.max_name_len, 12);
        assert_eq!(config.ranking_limit, 10);
        assert_eq!(config.frame_duration(), Duration::from_millis(16));
        assert!(config.seed.is_none());
    }

    #[test]
    fn parse_positive_rejects_zero_and_garbage() {
        assert_eq!(parse_positive::<usize>(" 8 "), Some(8));
        assert_eq!(parse_positive::<usize>("0"), None);
        assert_eq!(parse_positive::<u64>("fast"), None);
    }

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        assert_eq!(read_env_usize("BISMUTH_TEST_UNSET_USIZE", 7), 7);
        assert_eq!(read_env_u64("BISMUTH_TEST_UNSET_U64", 9), 9);
        assert_eq!(read_env_optional_u64("BISMUTH_TEST_UNSET_SEED"), None);
    }
}
