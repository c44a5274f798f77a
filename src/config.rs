use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where submissions come from. Built once at startup and handed to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub submissions_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Flags take precedence over `SUBMISSIONS_URL` / `SUBMISSIONS_TIMEOUT_SECS`.
    pub fn resolve(url: Option<String>, timeout_secs: Option<u64>) -> Result<Self> {
        Self::resolve_with(url, timeout_secs, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        url: Option<String>,
        timeout_secs: Option<u64>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let submissions_url = match url {
            Some(url) => url,
            None => env("SUBMISSIONS_URL")
                .context("SUBMISSIONS_URL must be set to the form API data endpoint")?,
        };

        let timeout_secs = match timeout_secs {
            Some(secs) => secs,
            None => match env("SUBMISSIONS_TIMEOUT_SECS") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("SUBMISSIONS_TIMEOUT_SECS is not a number: {raw}"))?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        Ok(Self {
            submissions_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_environment() {
        let config = Config::resolve_with(
            None,
            None,
            env_of(&[
                ("SUBMISSIONS_URL", "https://forms.example.org/api/data.json"),
                ("SUBMISSIONS_TIMEOUT_SECS", "5"),
            ]),
        )
        .unwrap();
        assert_eq!(config.submissions_url, "https://forms.example.org/api/data.json");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn flags_override_environment() {
        let config = Config::resolve_with(
            Some("http://localhost:9000/data".to_string()),
            Some(2),
            env_of(&[("SUBMISSIONS_URL", "https://ignored.example.org")]),
        )
        .unwrap();
        assert_eq!(config.submissions_url, "http://localhost:9000/data");
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn timeout_defaults() {
        let config =
            Config::resolve_with(None, None, env_of(&[("SUBMISSIONS_URL", "http://x")])).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = Config::resolve_with(None, None, env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("SUBMISSIONS_URL"));
    }

    #[test]
    fn bad_timeout_is_an_error() {
        let result = Config::resolve_with(
            None,
            None,
            env_of(&[("SUBMISSIONS_URL", "http://x"), ("SUBMISSIONS_TIMEOUT_SECS", "soon")]),
        );
        assert!(result.is_err());
    }
}
