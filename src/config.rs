use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default number of sources processed at the same time.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default per-source extraction timeout.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 30;

/// Default cap on the size of a single fetched or read document (16 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

/// User agent sent with every remote fetch unless overridden.
pub const DEFAULT_USER_AGENT: &str = "wordtally/0.1 (word-frequency aggregator)";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command-line
/// flags override whatever is loaded here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker tasks pulling sources off the work queue
    pub concurrency: usize,
    /// Timeout applied to each individual extraction (fetch or read)
    pub source_timeout: Duration,
    /// Overall deadline for an aggregation run; `None` waits for every source
    pub deadline: Option<Duration>,
    /// Documents larger than this are rejected instead of counted
    pub max_document_bytes: usize,
    /// User agent for remote fetches
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            source_timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
            deadline: None,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional. A variable that is set but does not parse
    /// is an error rather than a silent fallback to the default.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let concurrency = parse_var::<usize>("WORDTALLY_CONCURRENCY")?
            .unwrap_or(defaults.concurrency);
        let source_timeout = parse_var::<u64>("WORDTALLY_SOURCE_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.source_timeout);
        let deadline = parse_var::<u64>("WORDTALLY_DEADLINE_SECS")?.map(Duration::from_secs);
        let max_document_bytes = parse_var::<usize>("WORDTALLY_MAX_DOCUMENT_BYTES")?
            .unwrap_or(defaults.max_document_bytes);

        let config = Self {
            concurrency,
            source_timeout,
            deadline,
            max_document_bytes,
            user_agent: env::var("WORDTALLY_USER_AGENT").unwrap_or(defaults.user_agent),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the loaded (and possibly CLI-overridden) values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("Concurrency must be at least 1 (WORDTALLY_CONCURRENCY / --concurrency)");
        }
        if self.source_timeout.is_zero() {
            anyhow::bail!("Source timeout must be greater than zero");
        }
        if self.deadline.is_some_and(|d| d.is_zero()) {
            anyhow::bail!("Deadline must be greater than zero (WORDTALLY_DEADLINE_SECS / --deadline)");
        }
        if self.max_document_bytes == 0 {
            anyhow::bail!("WORDTALLY_MAX_DOCUMENT_BYTES must be greater than zero");
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{name} is not a valid number: {raw:?}")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.source_timeout, Duration::from_secs(30));
        assert!(config.deadline.is_none());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = Config {
            concurrency: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_deadline_is_rejected() {
        let config = Config {
            deadline: Some(Duration::ZERO),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            deadline: Some(Duration::from_secs(1)),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = Config {
            source_timeout: Duration::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
