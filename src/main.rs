use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{CharacterCommand, ConfigCommand};
use config::Config;
use holocron::{Catalog, FileStorage, OverlayStore, SwapiClient};

#[derive(Parser)]
#[command(name = "holocron")]
#[command(version)]
#[command(about = "Browse Star Wars characters and keep local edits", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse, show and edit characters
    #[command(visible_alias = "ch")]
    Character(CharacterCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "holocron=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for init command
    let cli_config_path = cli.config.clone();

    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Character(cmd)) => {
            let remote = SwapiClient::with_timeout(
                config.api_url.value.clone(),
                Duration::from_secs(config.timeout_secs.value),
            )?;
            let overlay = OverlayStore::new(FileStorage::new(config.data_dir.value.clone()));
            let catalog = Catalog::new(remote, overlay);
            cmd.run(&catalog).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
