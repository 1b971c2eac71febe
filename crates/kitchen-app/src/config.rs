//! Runtime configuration from the environment.
//!
//! `.env.local` is loaded first when present, then the process environment is read.
//!
//! | Variable | Default |
//! |---|---|
//! | `KITCHEN_API_BASE` | required unless offline |
//! | `KITCHEN_HUB_URL` | required for live screens unless offline |
//! | `KITCHEN_SEARCH_DEBOUNCE_MS` | 250 |
//! | `KITCHEN_HOLD_MS` | 500 |
//! | `KITCHEN_TOAST_MS` | 3500 |
//! | `KITCHEN_ALERT_MS` | 5000 |
//! | `KITCHEN_TICK_MS` | 1000, must be non-zero |

use crate::catalog::SEARCH_DEBOUNCE;
use crate::clients::HOLD_DELAY;
use crate::countdown::TICK;
use crate::notify::alert::ALERT_TTL;
use crate::notify::toast::TOAST_TTL;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

pub const API_BASE: &str = "KITCHEN_API_BASE";
pub const HUB_URL: &str = "KITCHEN_HUB_URL";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timings {
    pub search_debounce: Duration,
    pub hold: Duration,
    pub toast: Duration,
    pub alert: Duration,
    pub tick: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            search_debounce: SEARCH_DEBOUNCE,
            hold: HOLD_DELAY,
            toast: TOAST_TTL,
            alert: ALERT_TTL,
            tick: TICK,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `None` when running offline.
    pub api_base: Option<Url>,
    /// Only read by screens that follow the hub; see [`AppConfig::hub_url`].
    hub_url: Option<Url>,
    pub timings: Timings,
}

impl AppConfig {
    pub fn from_env(offline: bool) -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        Self::from_lookup(offline, |name| std::env::var(name).ok())
    }

    /// Builds the configuration from `lookup` instead of the process environment.
    pub fn from_lookup(
        offline: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let url = |name: &'static str| -> Result<Option<Url>, ConfigError> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(|raw| {
                    Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
                        name,
                        reason: e.to_string(),
                    })
                })
                .transpose()
        };
        let millis = |name: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(name) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| ConfigError::Invalid {
                        name,
                        reason: e.to_string(),
                    }),
                None => Ok(default),
            }
        };

        let api_base = url(API_BASE)?;
        if api_base.is_none() && !offline {
            return Err(ConfigError::Missing(API_BASE));
        }
        let tick = millis("KITCHEN_TICK_MS", TICK)?;
        if tick.is_zero() {
            return Err(ConfigError::Invalid {
                name: "KITCHEN_TICK_MS",
                reason: "must be greater than zero".into(),
            });
        }

        let defaults = Timings::default();
        Ok(Self {
            api_base,
            hub_url: url(HUB_URL)?,
            timings: Timings {
                search_debounce: millis("KITCHEN_SEARCH_DEBOUNCE_MS", defaults.search_debounce)?,
                hold: millis("KITCHEN_HOLD_MS", defaults.hold)?,
                toast: millis("KITCHEN_TOAST_MS", defaults.toast)?,
                alert: millis("KITCHEN_ALERT_MS", defaults.alert)?,
                tick,
            },
        })
    }

    /// The hub URL, required once a screen starts following live updates.
    pub fn hub_url(&self) -> Result<&Url, ConfigError> {
        self.hub_url.as_ref().ok_or(ConfigError::Missing(HUB_URL))
    }
}
