//! Client configuration from the environment

use crate::backend::GenerationParams;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Everything the binary needs to start a session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the BMO service, without the `/chat` suffix
    pub api_base: String,
    pub db_path: PathBuf,
    pub params: GenerationParams,
    /// Transport timeout for each HTTP call
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; unparseable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = GenerationParams::default();

        let api_base = lookup("BMO_API_BASE")
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let db_path = lookup("BMO_DB_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.bmo-chat/session.db"))
            },
            PathBuf::from,
        );

        let max_tokens = lookup("BMO_MAX_TOKENS")
            .and_then(|v| v.parse().ok())
            .filter(|&n: &u32| n > 0)
            .unwrap_or(defaults.max_tokens);

        let temperature = lookup("BMO_TEMPERATURE")
            .and_then(|v| v.parse().ok())
            .filter(|t: &f32| t.is_finite() && *t >= 0.0)
            .unwrap_or(defaults.temperature);

        let timeout_secs = lookup("BMO_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|&s: &u64| s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_base,
            db_path,
            params: GenerationParams {
                max_tokens,
                temperature,
            },
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
