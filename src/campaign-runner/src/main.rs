//! Campaign Runner — loads a batch of campaigns and decides which may start.
//!
//! Reads a JSON array of campaigns, runs one launcher pass and prints the
//! outcome as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use campaign_core::{load_batch, Campaign, RunnerConfig};
use campaign_launcher::{CampaignService, RejectionReason, RunSummary, ValidationMode};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-runner")]
#[command(about = "Decide which candidate campaigns may start")]
#[command(version)]
struct Cli {
    /// JSON file holding an array of campaigns, in evaluation order
    #[arg(long, short)]
    input: PathBuf,

    /// Start every campaign without applying the start rules
    #[arg(long, default_value_t = false)]
    skip_validation: bool,

    /// Log filter (takes precedence over RUST_LOG and config)
    #[arg(long)]
    log_filter: Option<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: RunSummary,
    started: Vec<&'a Campaign>,
    rejected: Vec<RejectedEntry>,
}

#[derive(Serialize)]
struct RejectedEntry {
    id: u32,
    reason: RejectionReason,
}

/// `--log-filter` wins over `RUST_LOG`, which wins over config.
fn resolve_log_filter(flag: Option<String>, rust_log: Option<String>, configured: &str) -> String {
    flag.or(rust_log).unwrap_or_else(|| configured.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_result = RunnerConfig::load();
    let mut config = match &config_result {
        Ok(config) => config.clone(),
        Err(_) => RunnerConfig::default(),
    };
    if cli.skip_validation {
        config.validation_enabled = false;
    }

    config.log_filter = resolve_log_filter(
        cli.log_filter,
        std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).ok(),
        &config.log_filter,
    );

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .json()
        .init();

    match config_result {
        Ok(_) => info!(
            validation_enabled = config.validation_enabled,
            log_filter = %config.log_filter,
            "Configuration loaded"
        ),
        Err(e) => warn!(error = %e, "Failed to load config, using defaults"),
    }

    info!(
        input = %cli.input.display(),
        validation_enabled = config.validation_enabled,
        "Campaign Runner starting"
    );

    let campaigns = load_batch(&cli.input)
        .with_context(|| format!("loading campaigns from {}", cli.input.display()))?;

    let mut service =
        CampaignService::new(campaigns, ValidationMode::from_enabled(config.validation_enabled));
    let summary = service.run();

    let report = Report {
        summary,
        started: service.started_campaigns(),
        rejected: service
            .rejected_campaigns()
            .into_iter()
            .map(|(campaign, reason)| RejectedEntry {
                id: campaign.id(),
                reason,
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_beats_rust_log() {
        let filter = resolve_log_filter(
            Some("campaign_launcher=debug".to_string()),
            Some("warn".to_string()),
            "info",
        );
        assert_eq!(filter, "campaign_launcher=debug");
    }

    #[test]
    fn test_rust_log_beats_config() {
        assert_eq!(resolve_log_filter(None, Some("warn".to_string()), "info"), "warn");
        assert_eq!(resolve_log_filter(None, None, "info"), "info");
    }
}
