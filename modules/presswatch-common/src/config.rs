use std::env;

use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // AI provider
    pub anthropic_api_key: String,
    pub claude_model: String,

    // Discovery providers
    pub event_registry_api_key: String,
    pub firecrawl_api_key: String,
    pub firecrawl_base_url: String,

    // Sweep tuning
    pub topic_concurrency: usize,
    pub sweep_deadline_minutes: Option<i64>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            claude_model: env::var("CLAUDE_MODEL")
                .unwrap_or_else(|_| "claude-haiku-4-5-20251001".to_string()),
            event_registry_api_key: env::var("EVENT_REGISTRY_API_KEY").unwrap_or_default(),
            firecrawl_api_key: env::var("FIRECRAWL_API_KEY").unwrap_or_default(),
            firecrawl_base_url: env::var("FIRECRAWL_BASE_URL")
                .unwrap_or_else(|_| "https://api.firecrawl.dev".to_string()),
            topic_concurrency: env::var("TOPIC_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .expect("TOPIC_CONCURRENCY must be a number"),
            sweep_deadline_minutes: env::var("SWEEP_DEADLINE_MINUTES")
                .ok()
                .map(|v| v.parse().expect("SWEEP_DEADLINE_MINUTES must be a number")),
        }
    }

    /// Log which providers are configured without printing secrets.
    pub fn log_redacted(&self) {
        info!(
            anthropic = !self.anthropic_api_key.is_empty(),
            event_registry = !self.event_registry_api_key.is_empty(),
            firecrawl = !self.firecrawl_api_key.is_empty(),
            topic_concurrency = self.topic_concurrency,
            deadline_minutes = self.sweep_deadline_minutes,
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
