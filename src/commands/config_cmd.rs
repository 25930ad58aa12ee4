use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# holocron configuration

# Base url of the SWAPI-compatible character catalog
# api_url: https://swapi.py4e.com/api

# Directory holding locally edited characters
# (relative paths are resolved against this file's directory)
# data_dir: ~/.local/share/holocron

# Seconds to wait for the catalog before giving up
timeout_secs: 30
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("api_url: {}", config.api_url.value);
                        println!("  source: {}", config.api_url.source);
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        println!("timeout_secs: {}", config.timeout_secs.value);
                        println!("  source: {}", config.timeout_secs.source);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'holocron config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}
