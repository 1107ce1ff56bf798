use std::time::Duration;

use anyhow::{Context, Result};

/// Backoff for store writes that fail
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total tries, including the first
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Never retry
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: usize) -> Duration {
        let factor = self
            .backoff_multiplier
            .powi(attempt.saturating_sub(1).min(i32::MAX as usize) as i32);
        Duration::from_secs_f64(self.initial_delay.as_secs_f64() * factor).min(self.max_delay)
    }
}

/// Session tuning
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Pause before publishing the state after the third out
    pub settle_delay: Duration,
    pub retry: RetryPolicy,
    /// Buffer size of the event broadcast channel
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(50),
            retry: RetryPolicy::default(),
            event_capacity: 64,
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `SCOREBOOK_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `SCOREBOOK_*` key
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(ms) = read_number(&lookup, "SCOREBOOK_SETTLE_MS")? {
            config.settle_delay = Duration::from_millis(ms);
        }
        if let Some(attempts) = read_number(&lookup, "SCOREBOOK_RETRY_ATTEMPTS")? {
            config.retry.max_attempts = attempts.max(1) as usize;
        }
        if let Some(ms) = read_number(&lookup, "SCOREBOOK_RETRY_INITIAL_MS")? {
            config.retry.initial_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_number(&lookup, "SCOREBOOK_RETRY_MAX_MS")? {
            config.retry.max_delay = Duration::from_millis(ms);
        }
        if let Some(capacity) = read_number(&lookup, "SCOREBOOK_EVENT_CAPACITY")? {
            config.event_capacity = capacity.max(1) as usize;
        }

        Ok(config)
    }
}

fn read_number(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.settle_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_overrides() {
        let config = SessionConfig::from_lookup(lookup_from(&[
            ("SCOREBOOK_SETTLE_MS", "0"),
            ("SCOREBOOK_RETRY_ATTEMPTS", "5"),
            ("SCOREBOOK_EVENT_CAPACITY", "8"),
        ]))
        .unwrap();

        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = SessionConfig::from_lookup(lookup_from(&[("SCOREBOOK_SETTLE_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("SCOREBOOK_SETTLE_MS"));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
            backoff_multiplier: 2.0,
        };

        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(350));
    }
}
