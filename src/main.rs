use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use grantscout_intake::config::Config;
use grantscout_intake::domain::LeadPayload;
use grantscout_intake::infra::{build_sink, MemorySink};
use grantscout_intake::{logging, metrics, server, IntakeService};

#[derive(Parser)]
#[command(name = "grantscout_intake")]
#[command(about = "Lead intake service for the GrantScout contact form")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP intake server
    Serve {
        /// Path to a TOML config file (defaults to ./config.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,
        /// Directory for rotated JSON logs
        #[arg(long, default_value = "logs")]
        log_dir: String,
    },
    /// Validate a lead JSON file and print the normalized lead
    Check {
        /// Path to a JSON file shaped like the contact form body
        path: PathBuf,
        /// Also run the lead through an in-memory sink and print the stamped record
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_payload(path: &Path) -> Result<LeadPayload> {
    let data = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let json: Value =
        serde_json::from_str(&data).with_context(|| format!("Failed to parse JSON in {}", path.display()))?;
    LeadPayload::from_json(&json).with_context(|| format!("{} does not contain a JSON object", path.display()))
}

async fn serve(config_path: Option<PathBuf>, port: Option<u16>, log_dir: String) -> Result<()> {
    let _guard = logging::init_logging(&log_dir);
    metrics::init_metrics();

    let mut config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let host: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid listen host '{}'", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);

    let sink = build_sink(&config.intake)?;
    info!(
        sink = sink.name(),
        timeout_ms = config.intake.timeout_ms,
        retry_attempts = config.intake.retry_attempts,
        "Starting lead intake"
    );
    let service = Arc::new(IntakeService::new(sink, config.intake));

    server::start_server(service, addr).await
}

async fn check(path: PathBuf, dry_run: bool, config_path: Option<PathBuf>) -> Result<()> {
    logging::init_console_logging();

    let config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;
    let payload = load_payload(&path)?;

    let sink = Arc::new(MemorySink::new());
    let service = IntakeService::new(sink.clone(), config.intake);

    let lead = match service.validate(&payload) {
        Ok(lead) => lead,
        Err(e) => {
            eprintln!("invalid: {} ({})", e.user_message(), e);
            std::process::exit(1)
        }
    };
    println!("{}", serde_json::to_string_pretty(&lead)?);

    if dry_run {
        service.submit(lead).await?;
        for record in sink.records() {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, port, log_dir } => serve(config, port, log_dir).await,
        Commands::Check { path, dry_run, config } => check(path, dry_run, config).await,
    }
}
