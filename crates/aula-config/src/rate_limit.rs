use crate::{env_flag, env_or};

/// Rate limit configuration for the API
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Requests replenished per second for each client
    pub per_second: u32,
    /// Requests a client may burst before being throttled
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 10,
            burst_size: 30,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_flag("RATE_LIMIT_ENABLED", defaults.enabled),
            per_second: env_or("RATE_LIMIT_PER_SECOND", defaults.per_second).max(1),
            burst_size: env_or("RATE_LIMIT_BURST_SIZE", defaults.burst_size).max(1),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}
