//! Harness configuration.
//!
//! Defaults can be overridden from the environment:
//!
//! | Variable | Effect |
//! |---|---|
//! | `SIMNET_HARNESS_DEFAULT_SENDER` | alias or address used when no sender is given |
//! | `SIMNET_HARNESS_DEBUG` | `1`/`true`/`yes`/`on` enables call tracing |

/// Alias used when neither the caller nor the environment names a sender.
pub const DEFAULT_SENDER: &str = "wallet_1";

pub const DEFAULT_SENDER_ENV: &str = "SIMNET_HARNESS_DEFAULT_SENDER";
pub const DEBUG_ENV: &str = "SIMNET_HARNESS_DEBUG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Identity used when a sender is missing or empty. An empty string means
    /// there is no default and a missing sender is an error.
    pub default_sender: String,
    /// Trace every call.
    pub debug: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            default_sender: DEFAULT_SENDER.to_string(),
            debug: false,
        }
    }
}

impl HarnessConfig {
    /// Defaults overridden by `SIMNET_HARNESS_*` variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_sender: std::env::var(DEFAULT_SENDER_ENV).unwrap_or(defaults.default_sender),
            debug: env_flag(DEBUG_ENV).unwrap_or(defaults.debug),
        }
    }

    pub fn with_default_sender(mut self, sender: &str) -> Self {
        self.default_sender = sender.to_string();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// `Some(true)` for 1/true/yes/on, `Some(false)` for any other value,
/// `None` when unset.
fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
