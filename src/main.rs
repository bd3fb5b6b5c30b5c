//! `propsd`: keeps a directory of `.properties` files loaded and fresh.
//!
//! ```text
//! propsd watch [--settings propsd.toml] [--dir config]
//! propsd get <set> <key> [--dir config]
//! propsd dump <set> [--dir config]
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use props_reload::config::{self, Settings};
use props_reload::lifecycle::{signals, startup};
use props_reload::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "propsd")]
#[command(about = "Polls a directory of .properties files and keeps them loaded", long_about = None)]
struct Cli {
    /// Settings file (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Override the configuration directory.
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the directory and keep reloading until SIGINT/SIGTERM
    Watch,
    /// Print one value
    Get { set: String, key: String },
    /// Print a whole set as JSON
    Dump { set: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings: Settings = config::load_or_default(cli.settings.as_deref())?;
    if let Some(dir) = cli.dir {
        settings.reload.directory = dir;
    }

    logging::init(&settings.observability)?;

    match cli.command {
        Commands::Watch => {
            watch(&settings).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Get { set, key } => {
            let store = startup::load_once(&settings.reload);
            match store.get_value(&set, &key) {
                Some(value) => {
                    println!("{}", value);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("{}.{} is not set", set, key);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Dump { set } => {
            let store = startup::load_once(&settings.reload);
            match store.get_properties(&set) {
                Some(props) => {
                    println!("{}", serde_json::to_string_pretty(&props.entries)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("no config set named {}", set);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

async fn watch(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("propsd v{} starting", env!("CARGO_PKG_VERSION"));

    if settings.observability.metrics_enabled {
        let addr = settings.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let mut handle = startup::start_reloading(&settings.reload);

    signals::wait_for_termination().await;
    handle.stop().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
