//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Pause between puts of the first demo writer, in milliseconds
    pub demo_delay_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 16)
    /// - `DEMO_DELAY_MS` - Demo writer pause in milliseconds (default: 500)
    ///
    /// Unset variables fall back to defaults. A variable that is set but
    /// does not parse is an error rather than a silent default, and the
    /// resulting config is validated before it is returned.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            capacity: parse_var(&lookup, "CACHE_CAPACITY", defaults.capacity)?,
            demo_delay_ms: parse_var(&lookup, "DEMO_DELAY_MS", defaults.demo_delay_ms)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the cache cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    /// Demo writer pause as a Duration.
    pub fn demo_delay(&self) -> Duration {
        Duration::from_millis(self.demo_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 16,
            demo_delay_ms: 500,
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            CacheError::InvalidConfig(format!("{} must be a non-negative integer, got '{}'", name, raw))
        }),
    }
}
