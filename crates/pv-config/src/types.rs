//! Configuration types

use serde::{Deserialize, Serialize};

/// How the performance auditor is backed, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditorMode {
    /// Real HTTP calls to the PageSpeed Insights API.
    Http,
    /// Deterministic canned audits, for local development and tests.
    Fixture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3900,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,

    /// SQLite database path; `:memory:` is accepted.
    pub database_path: String,

    /// Optional PageSpeed credential. Requests go out unauthenticated (and
    /// rate-limited by Google) when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagespeed_api_key: Option<String>,

    /// Credential for the insight endpoint. Its absence is a configuration
    /// error reported at call time, not at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    /// User-Agent values allowed to trigger the cron sweep.
    pub cron_identities: Vec<String>,

    pub auditor_mode: AuditorMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database_path: "pagevitals.db".to_string(),
            pagespeed_api_key: None,
            gemini_api_key: None,
            cron_identities: vec![
                "vercel-cron/1.0".to_string(),
                "pagevitals-cron/1.0".to_string(),
            ],
            auditor_mode: AuditorMode::Http,
        }
    }
}
