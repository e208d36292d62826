//! Token issuing configuration.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::token::{ExpiringToken, DEFAULT_LIFETIME_SECS};

/// Environment variable overriding the token lifetime, in seconds.
pub const LIFETIME_ENV: &str = "EXPIRING_TOKEN_LIFETIME_SECS";

/// Configuration for issuing tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// How long issued tokens stay valid, in seconds.
    #[serde(default = "default_lifetime_secs")]
    pub lifetime_secs: i64,
}

fn default_lifetime_secs() -> i64 {
    DEFAULT_LIFETIME_SECS
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            lifetime_secs: default_lifetime_secs(),
        }
    }
}

impl TokenConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `EXPIRING_TOKEN_LIFETIME_SECS` | Token lifetime in seconds (default: 259200) |
    pub fn from_env() -> Self {
        let lifetime_secs = match std::env::var(LIFETIME_ENV) {
            Ok(v) => v.trim().parse().unwrap_or_else(|e| {
                tracing::warn!(
                    value = %v,
                    error = %e,
                    "ignoring invalid {}, using default",
                    LIFETIME_ENV
                );
                default_lifetime_secs()
            }),
            Err(_) => default_lifetime_secs(),
        };

        Self { lifetime_secs }
    }

    /// Set the lifetime. Sub-second precision is dropped.
    pub fn with_lifetime(mut self, lifetime: TimeDelta) -> Self {
        self.lifetime_secs = lifetime.num_seconds();
        self
    }

    /// The configured lifetime.
    pub fn lifetime(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.lifetime_secs).unwrap_or_else(ExpiringToken::default_lifetime)
    }

    /// Issue a new token with the configured lifetime.
    pub fn issue(&self) -> ExpiringToken {
        ExpiringToken::create_with_lifetime(self.lifetime())
    }
}
