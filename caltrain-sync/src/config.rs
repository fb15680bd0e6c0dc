//! Environment-driven configuration for the sync binary.

use std::path::PathBuf;

use crate::open511::Open511Config;
use crate::store::RestStoreConfig;
use crate::sync::DEFAULT_ROOT;

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Where upstream payloads come from.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    /// Recorded payloads in a directory.
    Fixtures(PathBuf),
    /// The live 511.org API.
    Live(Open511Config),
}

/// Configuration for one run of the binary.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub source: SourceConfig,
    /// `None` means a dry run against an in-memory store.
    pub store: Option<RestStoreConfig>,
    /// Key path all writes go under.
    pub root: String,
}

impl SyncConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`.
    ///
    /// Empty values count as unset. `CALTRAIN_FIXTURE_DIR` takes precedence
    /// over the live API, which otherwise needs `API_KEY_511`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let source = match get("CALTRAIN_FIXTURE_DIR") {
            Some(dir) => SourceConfig::Fixtures(PathBuf::from(dir)),
            None => {
                let api_key = get("API_KEY_511").ok_or(ConfigError::Missing("API_KEY_511"))?;
                let mut config = Open511Config::new(api_key);
                if let Some(url) = get("OPEN511_BASE_URL") {
                    config = config.with_base_url(url);
                }
                if let Some(operator) = get("OPEN511_OPERATOR_ID") {
                    config = config.with_operator_id(operator);
                }
                if let Some(secs) = get("OPEN511_TIMEOUT_SECS") {
                    config = config.with_timeout(parse_secs("OPEN511_TIMEOUT_SECS", &secs)?);
                }
                SourceConfig::Live(config)
            }
        };

        let store = get("STORE_URL").map(|url| {
            let config = RestStoreConfig::new(url);
            match get("STORE_AUTH_TOKEN") {
                Some(token) => config.with_auth_token(token),
                None => config,
            }
        });

        Ok(Self {
            source,
            store,
            root: get("STORE_ROOT").unwrap_or_else(|| DEFAULT_ROOT.to_string()),
        })
    }
}

fn parse_secs(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        Ok(_) => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "must be positive".to_string(),
        }),
        Err(e) => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
