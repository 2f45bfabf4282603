use serde::Deserialize;

use crate::error::CampaignResult;

/// Runner configuration. Loaded from environment variables with the
/// prefix `CAMPAIGN_RUNNER__`; every key falls back to its default.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// When false the runner starts every candidate without checking rules.
    #[serde(default = "default_validation_enabled")]
    pub validation_enabled: bool,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_validation_enabled() -> bool {
    true
}
fn default_log_filter() -> String {
    "campaign_runner=info,campaign_launcher=info".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            validation_enabled: default_validation_enabled(),
            log_filter: default_log_filter(),
        }
    }
}

impl RunnerConfig {
    pub fn load() -> CampaignResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_RUNNER")
                .separator("__")
                .try_parsing(true),
        );

        Self::from_config(builder.build()?)
    }

    fn from_config(config: config::Config) -> CampaignResult<Self> {
        Ok(config.try_deserialize()?)
    }
}
