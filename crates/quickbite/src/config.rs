//! Runtime settings for [`QuickBiteSystem`](crate::lifecycle::QuickBiteSystem).
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `QUICKBITE_DELIVERY_FEE` | `2.99` | added to every order total |
//! | `QUICKBITE_AUTO_ACCEPT_SECS` | `3` | `0` disables auto-accept |
//! | `QUICKBITE_CHANNEL_CAPACITY` | `32` | mpsc buffer per actor |
//! | `QUICKBITE_STATE_PATH` | unset | JSON state file; unset means in-memory only |
use rust_decimal::Decimal;
use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

pub const DELIVERY_FEE_VAR: &str = "QUICKBITE_DELIVERY_FEE";
pub const AUTO_ACCEPT_VAR: &str = "QUICKBITE_AUTO_ACCEPT_SECS";
pub const CHANNEL_CAPACITY_VAR: &str = "QUICKBITE_CHANNEL_CAPACITY";
pub const STATE_PATH_VAR: &str = "QUICKBITE_STATE_PATH";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub delivery_fee: Decimal,
    /// Delay before a pending order is accepted automatically. `None` disables it.
    pub auto_accept: Option<Duration>,
    pub channel_capacity: usize,
    pub state_path: Option<PathBuf>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::new(299, 2),
            auto_accept: Some(Duration::from_secs(3)),
            channel_capacity: 32,
            state_path: None,
        }
    }
}

impl SystemConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let delivery_fee: Decimal = try_load(&lookup, DELIVERY_FEE_VAR, "2.99")?;
        if delivery_fee.is_sign_negative() {
            return Err(ConfigError::Invalid {
                key: DELIVERY_FEE_VAR,
                value: delivery_fee.to_string(),
                reason: "must not be negative".into(),
            });
        }

        let auto_accept_secs: u64 = try_load(&lookup, AUTO_ACCEPT_VAR, "3")?;
        let channel_capacity: usize = try_load(&lookup, CHANNEL_CAPACITY_VAR, "32")?;
        if channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: CHANNEL_CAPACITY_VAR,
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let state_path = match lookup(STATE_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => Some(PathBuf::from(path.trim())),
            _ => {
                info!("{STATE_PATH_VAR} not set, state will not be persisted");
                defaults.state_path
            }
        };

        Ok(Self {
            delivery_fee,
            auto_accept: (auto_accept_secs > 0).then(|| Duration::from_secs(auto_accept_secs)),
            channel_capacity,
            state_path,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }
    })
}
