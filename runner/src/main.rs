//! Contract test runner
//!
//! Runs declarative contract test cases against a broker/store gateway:
//! - Discovers descriptor files from the given paths
//! - Publishes each rendered request and checks the reply
//! - Polls downstream stores until they reflect the transaction
//! - Exits non-zero when any case fails

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use engine::core::SystemValueSource;
use engine::services::{FsCaseSource, GatewayClient, HttpChannel, HttpDocumentStore, HttpRelationalStore};
use runner::config::{GATEWAY_URL_ENV, LOG_LEVEL_ENV};
use runner::{RunnerConfig, SuiteRunner, dry_run};

#[derive(Parser)]
#[command(name = "runner")]
#[command(about = "Declarative contract tests for message-driven flows")]
struct Args {
    /// Descriptor files, or directories of descriptor files
    #[arg(required = true)]
    cases: Vec<PathBuf>,

    /// Gateway base URL (falls back to CONTRACT_GATEWAY_URL)
    #[arg(long)]
    gateway_url: Option<String>,

    /// Log level (falls back to CONTRACT_LOG_LEVEL, then info)
    #[arg(long)]
    log_level: Option<String>,

    /// Enable debug output
    #[arg(long)]
    verbose: bool,

    /// Stop at the first failing case
    #[arg(long)]
    fail_fast: bool,

    /// Fail rendering when a placeholder has no value
    #[arg(long)]
    strict_placeholders: bool,

    /// Expected-response value that disables comparison of a field
    #[arg(long)]
    ignore_marker: Option<String>,

    /// Fixed interval between store polls in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Reply wait for cases that do not set one, in milliseconds
    #[arg(long)]
    reply_timeout_ms: Option<u64>,

    /// Store convergence wait for groups that do not set one, in milliseconds
    #[arg(long)]
    verification_timeout_ms: Option<u64>,

    /// Render every case without contacting the gateway
    #[arg(long)]
    dry_run: bool,

    /// Write the suite report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = build_config(&args);
    init_runner_tracing(&config.log_level, args.verbose);
    config.validate().context("invalid runner configuration")?;

    tracing::info!("🧪 Starting contract test runner");

    let source = FsCaseSource::new();
    let report = if config.dry_run {
        dry_run(&config, &source, &SystemValueSource::new()).await?
    } else {
        let gateway = GatewayClient::new(config.require_gateway_url()?);
        tracing::info!("🌐 Gateway: {}", gateway.base_url());

        let channel = HttpChannel::new(gateway.clone());
        let relational = HttpRelationalStore::new(gateway.clone());
        let documents = HttpDocumentStore::new(gateway);

        SuiteRunner::new(&source, &channel, &relational, &documents, config.clone())
            .run()
            .await?
    };

    if let Some(path) = &args.report {
        let json = report.to_json().context("failed to serialize suite report")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!("📝 Report written to {}", path.display());
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn build_config(args: &Args) -> RunnerConfig {
    let mut builder = RunnerConfig::builder()
        .case_paths(args.cases.iter().cloned())
        .fail_fast(args.fail_fast)
        .dry_run(args.dry_run)
        .strict_placeholders(args.strict_placeholders);

    if let Some(url) = args.gateway_url.clone().or_else(|| std::env::var(GATEWAY_URL_ENV).ok()) {
        builder = builder.gateway_url(url);
    }
    if let Some(level) = args.log_level.clone().or_else(|| std::env::var(LOG_LEVEL_ENV).ok()) {
        builder = builder.log_level(level);
    }
    if let Some(marker) = &args.ignore_marker {
        builder = builder.ignore_marker(marker.clone());
    }
    if let Some(ms) = args.poll_interval_ms {
        builder = builder.poll_interval(Duration::from_millis(ms));
    }
    if let Some(ms) = args.reply_timeout_ms {
        builder = builder.reply_timeout(Duration::from_millis(ms));
    }
    if let Some(ms) = args.verification_timeout_ms {
        builder = builder.verification_timeout(Duration::from_millis(ms));
    }

    builder.build()
}

fn init_runner_tracing(log_level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { log_level };
    shared::logging::init_tracing_with_level(Some(level));
}
