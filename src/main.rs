use anyhow::Result;
use clap::Parser;
use shelly_exporter::{config, server};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to /etc/shelly-prom/config.json, then ./config.json)
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<String>,

    /// Port to listen on for metrics (overrides config)
    #[arg(short, long, env = "EXPORTER_PORT")]
    port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long, env = "EXPORTER_ADDR")]
    addr: Option<String>,

    /// Poll interval in seconds (overrides config)
    #[arg(short, long)]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Shelly Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let path = config::resolve_path(args.config.as_deref())?;
    let mut config = config::Config::load(&path)?;

    // Override with CLI arguments if provided
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(addr) = args.addr {
        config.listen_addr = addr;
    }
    if let Some(interval) = args.interval {
        config.interval_seconds = interval;
        config.validate()?;
    }

    info!("Configuration loaded from {}", path.display());
    info!(
        "Polling {} device(s) every {}s (timeout {}s)",
        config.shelly_plugs.len(),
        config.interval_seconds,
        config.timeout_seconds
    );
    info!(
        "Metrics endpoint: http://{}:{}/metrics",
        config.listen_addr, config.port
    );

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
