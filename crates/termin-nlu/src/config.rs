//! Recognizer endpoint configuration.

use serde::{Deserialize, Serialize};

pub const APP_ID_VAR: &str = "LUIS_APP_ID";
pub const API_KEY_VAR: &str = "LUIS_API_KEY";
pub const API_HOST_VAR: &str = "LUIS_API_HOST_NAME";

/// Connection settings for a LUIS prediction application.
///
/// The recognizer counts as configured only when all three values are
/// present; anything less leaves the bot in pure slot-filling mode
/// instead of failing at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuisConfig {
    pub app_id: Option<String>,
    pub api_key: Option<String>,
    pub api_host_name: Option<String>,
}

impl LuisConfig {
    /// Reads the settings from the process environment.
    ///
    /// Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            app_id: env_nonempty(APP_ID_VAR),
            api_key: env_nonempty(API_KEY_VAR),
            api_host_name: env_nonempty(API_HOST_VAR),
        }
    }

    /// Fills unset values from a fallback source, keeping set ones.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            app_id: self.app_id.or(fallback.app_id),
            api_key: self.api_key.or(fallback.api_key),
            api_host_name: self.api_host_name.or(fallback.api_host_name),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.app_id.is_some() && self.api_key.is_some() && self.api_host_name.is_some()
    }

    /// The prediction base URL, when a host is set.
    ///
    /// A bare host name gets an `https://` scheme; full URLs pass through.
    pub fn endpoint(&self) -> Option<String> {
        self.api_host_name.as_deref().map(|host| {
            if host.starts_with("http://") || host.starts_with("https://") {
                host.trim_end_matches('/').to_string()
            } else {
                format!("https://{}", host.trim_end_matches('/'))
            }
        })
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
