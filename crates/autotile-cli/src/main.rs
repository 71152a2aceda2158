//! glazewm-autotile CLI
//!
//! Inspection tool for the autotiler: checks the configuration and explains
//! what the daemon would do with a captured GlazeWM event.

use std::io::Read;
use std::path::{Path, PathBuf};

use autotile_daemon::glazewm_ipc::{react, OutboundFrame, Reaction};
use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;

#[derive(Parser, Debug)]
#[command(name = "autotile")]
#[command(about = "Inspection tool for glazewm-autotile")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = autotile_config::DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the configuration file and print the effective settings
    Validate,

    /// Show the command the daemon would send for one GlazeWM event frame
    Decide {
        /// File holding the raw JSON frame (reads stdin when omitted or `-`)
        file: Option<PathBuf>,
    },

    /// Print the subscription frames sent after connecting
    Topics,
}

fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Expand tilde in config path
    let config_path: PathBuf = shellexpand::tilde(&cli.config).into_owned().into();

    match cli.command {
        Commands::Validate => cmd_validate(&config_path),
        Commands::Decide { file } => cmd_decide(file.as_deref()),
        Commands::Topics => cmd_topics(),
    }
}

fn cmd_validate(config_path: &Path) -> miette::Result<()> {
    if !config_path.exists() {
        println!(
            "No configuration at {}, defaults apply",
            config_path.display()
        );
    } else {
        println!("Validating configuration: {}", config_path.display());
    }

    let config = autotile_config::load_config(config_path).map_err(miette::Report::new)?;

    println!("Configuration is valid!");
    println!("  Endpoint:        {}", config.endpoint);
    println!("  Retry delay:     {} ms", config.retry_delay_ms);
    println!("  Connect timeout: {} ms", config.connect_timeout_ms);
    println!("  Log level:       {}", config.log_level);
    match &config.log_file {
        Some(path) => println!("  Log file:        {}", path.display()),
        None => println!(
            "  Log file:        {} (next to autotiled)",
            autotile_config::DEFAULT_LOG_FILE_NAME
        ),
    }

    Ok(())
}

fn cmd_decide(file: Option<&Path>) -> miette::Result<()> {
    let raw = match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).into_diagnostic()?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
            buf
        }
    };

    println!("{}", explain(raw.trim()));
    Ok(())
}

fn cmd_topics() -> miette::Result<()> {
    for frame in OutboundFrame::subscriptions() {
        println!("{}", frame);
    }
    Ok(())
}

/// Describe the daemon's reaction to one frame
fn explain(raw: &str) -> String {
    match react(raw) {
        Reaction::Exit => "exit: GlazeWM is shutting down".to_string(),
        Reaction::SetTilingDirection(direction) => {
            format!("send: {}", OutboundFrame::SetTilingDirection(direction))
        }
        Reaction::Ignore(reason) => format!("no command: {}", reason),
    }
}
