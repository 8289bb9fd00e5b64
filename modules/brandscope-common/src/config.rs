use std::env;
use std::path::PathBuf;

use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // AI provider
    pub openai_api_key: String,
    pub openai_model: String,

    // Link discovery
    pub serp_api_key: String,

    // Collection jobs
    pub collect_bin: String,
    pub collect_script_dir: PathBuf,
    pub data_dir: PathBuf,

    // Progress push channel (optional)
    pub observer_webhook_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: required_env("OPENAI_API_KEY"),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4.1".to_string()),
            serp_api_key: required_env("SERP_API_KEY"),
            collect_bin: env::var("COLLECT_BIN").unwrap_or_else(|_| "python3".to_string()),
            collect_script_dir: env::var("COLLECT_SCRIPT_DIR")
                .unwrap_or_else(|_| "scrape/scripts".to_string())
                .into(),
            data_dir: data_dir(),
            observer_webhook_url: env::var("OBSERVER_WEBHOOK_URL").ok(),
        }
    }

    /// Log the loaded config without exposing secrets.
    pub fn log_redacted(&self) {
        info!(
            model = self.openai_model.as_str(),
            script_dir = %self.collect_script_dir.display(),
            data_dir = %self.data_dir.display(),
            webhook = self.observer_webhook_url.is_some(),
            "Config loaded"
        );
    }
}

/// Root data directory, controlled by `DATA_DIR` env var (default: `"data"`).
/// Per-run collection artifacts live under `{DATA_DIR}/runs/{run_id}/`.
pub fn data_dir() -> PathBuf {
    PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
