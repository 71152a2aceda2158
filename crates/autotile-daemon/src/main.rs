//! glazewm-autotile daemon
//!
//! Listens to GlazeWM focus events and flips the tiling direction to match
//! the shape of the focused window.

use std::path::PathBuf;

use anyhow::{Context, Result};
use autotile_daemon::glazewm_ipc::{GlazeDialer, Supervisor};
use autotile_daemon::logging;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "autotiled")]
#[command(about = "Aspect-ratio autotiling daemon for GlazeWM")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = autotile_config::DEFAULT_CONFIG_PATH)]
    config: String,

    /// GlazeWM IPC endpoint (overrides config setting)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Delay between connection attempts in milliseconds (overrides config setting)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    retry_delay_ms: Option<u64>,

    /// Log file path (overrides config setting)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log to stderr instead of a file
    #[arg(long)]
    stderr: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Expand tilde in config path
    let config_path: PathBuf = shellexpand::tilde(&args.config).into_owned().into();

    // Config warnings surface on stderr until the log sink is open
    let mut config = tracing::subscriber::with_default(logging::bootstrap_subscriber(), || {
        autotile_config::load_config(&config_path)
    })
    .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;

    if let Some(endpoint) = args.endpoint {
        autotile_config::validate_endpoint(&endpoint)?;
        config.endpoint = endpoint;
    }
    if let Some(retry_delay_ms) = args.retry_delay_ms {
        config.retry_delay_ms = retry_delay_ms;
    }
    if let Some(log_file) = args.log_file {
        config.log_file = Some(log_file);
    }

    let sink = if args.stderr {
        None
    } else {
        logging::resolve_log_path(config.log_file.as_deref())
            .and_then(|path| match logging::open_log_file(&path) {
                Ok(file) => Some(file),
                Err(e) => {
                    eprintln!("autotiled: cannot open log file {}: {}", path.display(), e);
                    None
                }
            })
    };
    logging::init(config.log_level, sink);

    tracing::info!(
        endpoint = %config.endpoint,
        retry_delay_ms = config.retry_delay_ms,
        "glazewm-autotile starting"
    );

    let dialer = GlazeDialer::new(config.endpoint.clone(), config.connect_timeout())?;
    let mut supervisor = Supervisor::new(dialer, config.retry_delay());

    let reason = supervisor.run().await;
    tracing::info!(?reason, "glazewm-autotile stopped");

    Ok(())
}
