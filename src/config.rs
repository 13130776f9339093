use std::{env, fmt, str::FromStr};

use thiserror::Error;
use url::Url;

pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// How the handler reacts when a submission fails before a payload is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Check the HTTP status first and show a fallback message on any failure.
    #[default]
    Defensive,
    /// Parse whatever comes back and only log failures.
    Quiet,
}

impl FromStr for FailureMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "defensive" => Ok(Self::Defensive),
            "quiet" => Ok(Self::Quiet),
            other => Err(ConfigError::FailureMode(other.to_string())),
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defensive => write!(f, "defensive"),
            Self::Quiet => write!(f, "quiet"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid CONVERTER_URL {value:?}: {source}")]
    Url {
        value: String,
        source: url::ParseError,
    },
    #[error("unknown CONVERTER_FAILURE_MODE {0:?}, expected \"defensive\" or \"quiet\"")]
    FailureMode(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub origin: Url,
    pub timeout_ms: u64,
    pub failure_mode: FailureMode,
}

impl ClientConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            failure_mode: FailureMode::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("CONVERTER_URL").unwrap_or_else(|| DEFAULT_URL.to_string());
        let origin = Url::parse(&raw_url).map_err(|source| ConfigError::Url {
            value: raw_url.clone(),
            source,
        })?;

        let timeout_ms = lookup("CONVERTER_TIMEOUT_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let failure_mode = lookup("CONVERTER_FAILURE_MODE")
            .map(|value| value.parse::<FailureMode>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            origin,
            timeout_ms,
            failure_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.origin.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(cfg.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(cfg.failure_mode, FailureMode::Defensive);
    }

    #[test]
    fn reads_overrides() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[
            ("CONVERTER_URL", "http://converter.local:8080"),
            ("CONVERTER_TIMEOUT_MS", "250"),
            ("CONVERTER_FAILURE_MODE", "Quiet"),
        ]))
        .unwrap();
        assert_eq!(cfg.origin.host_str(), Some("converter.local"));
        assert_eq!(cfg.timeout_ms, 250);
        assert_eq!(cfg.failure_mode, FailureMode::Quiet);
    }

    #[test]
    fn bad_timeout_falls_back_to_default() {
        let cfg =
            ClientConfig::from_lookup(lookup_from(&[("CONVERTER_TIMEOUT_MS", "soon")])).unwrap();
        assert_eq!(cfg.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn rejects_bad_url_and_mode() {
        let err = ClientConfig::from_lookup(lookup_from(&[("CONVERTER_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Url { .. }));

        let err = ClientConfig::from_lookup(lookup_from(&[("CONVERTER_FAILURE_MODE", "loud")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FailureMode(mode) if mode == "loud"));
    }
}
