//! Configuration management module
//!
//! Configuration is read once at process start from environment variables and
//! passed through application state from there. Nothing in the workspace
//! reads the environment after startup.

mod types;

pub use types::{AppConfig, AuditorMode, ServerConfig};

use std::env;

use tracing::warn;

impl AppConfig {
    /// Build the configuration from the process environment.
    ///
    /// Missing variables fall back to defaults; only a malformed port is
    /// worth a warning since silently binding the wrong port confuses more
    /// than it helps.
    pub fn from_env() -> Self {
        let mut config = AppConfig::default();

        if let Ok(host) = env::var("PV_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("PV_PORT") {
            match port.parse() {
                Ok(p) => config.server.port = p,
                Err(_) => warn!("PV_PORT is not a valid port number, using default"),
            }
        }
        if let Ok(path) = env::var("PV_DATABASE_PATH") {
            config.database_path = path;
        }
        config.pagespeed_api_key = env::var("PAGESPEED_API_KEY").ok().filter(|k| !k.is_empty());
        config.gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());

        if let Ok(identities) = env::var("PV_CRON_IDENTITIES") {
            let parsed: Vec<String> = identities
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                config.cron_identities = parsed;
            }
        }

        if matches!(env::var("PV_USE_FIXTURES").as_deref(), Ok("1") | Ok("true")) {
            config.auditor_mode = AuditorMode::Fixture;
        }

        config
    }
}
