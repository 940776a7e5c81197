//! CLI commands and argument parsing
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, subcommands, and their arguments.

use crate::config::settings::resolve_config_path;
use crate::config::{keys, manager, ConfigStore};
use crate::error::{EiamError, Result};
use crate::logging::LoggerHandle;
use crate::utils::format::DisplayUtils;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "eiam")]
#[command(about = "Manage the ephemeral-iam configuration")]
#[command(version, author)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "EIAM_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration values
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current configuration
    Print,
    /// Print information about config fields
    Info,
    /// View the value of a provided config item
    View {
        /// Config key
        #[arg(value_parser = PossibleValuesParser::new(keys::key_names()))]
        key: String,
    },
    /// Set the value of a provided config item
    Set {
        /// Config key followed by its new value
        #[arg(num_args = 0.., allow_hyphen_values = true, value_name = "KEY VALUE")]
        args: Vec<String>,
    },
}

impl Cli {
    /// Commands that never read or create the backing file
    pub fn is_standalone(&self) -> bool {
        matches!(
            self.command,
            Commands::Config {
                command: ConfigCommands::Info
            }
        )
    }

    pub async fn execute(self, store: &mut ConfigStore, logger: &mut LoggerHandle) -> Result<()> {
        let display = DisplayUtils::new(self.no_color);

        match self.command {
            Commands::Config { command } => {
                execute_config_command(command, store, logger, &display).await
            }
        }
    }
}

/// Load the configuration store and run the parsed command
pub async fn run(cli: Cli, logger: &mut LoggerHandle) -> Result<()> {
    if cli.is_standalone() {
        return execute_config_info(&DisplayUtils::new(cli.no_color));
    }

    let config_path = resolve_config_path(cli.config.as_deref())?;
    let mut store = ConfigStore::load_or_init(config_path).await?;

    // Bring the logger in line with the stored settings
    logger.set_level(store.logging_level())?;
    logger.set_format(store.logging_format())?;
    debug!("Loaded configuration from {}", store.path().display());

    cli.execute(&mut store, logger).await
}

async fn execute_config_command(
    command: ConfigCommands,
    store: &mut ConfigStore,
    logger: &mut LoggerHandle,
    display: &DisplayUtils,
) -> Result<()> {
    match command {
        ConfigCommands::Print => execute_config_print(store).await,
        ConfigCommands::Info => execute_config_info(display),
        ConfigCommands::View { key } => execute_config_view(store, &key, display),
        ConfigCommands::Set { args } => execute_config_set(store, logger, &args, display).await,
    }
}

async fn execute_config_print(store: &ConfigStore) -> Result<()> {
    let data = manager::print_config(store).await?;
    write_raw(&data).map_err(|e| EiamError::io("Failed to write configuration to stdout", e))
}

fn write_raw(data: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(b"\n")?;
    stdout.write_all(data)?;
    stdout.write_all(b"\n")?;
    stdout.flush()
}

fn execute_config_info(display: &DisplayUtils) -> Result<()> {
    println!("{}", display.format_key_table(&manager::config_info()));
    Ok(())
}

fn execute_config_view(store: &ConfigStore, key: &str, display: &DisplayUtils) -> Result<()> {
    let value = manager::view(store, key)?
        .map(|value| value.to_string())
        .unwrap_or_else(|| "<not set>".to_string());
    debug!("Viewing {key} from {}", store.path().display());
    println!("{}", display.format_key_value(key, &value));
    Ok(())
}

async fn execute_config_set(
    store: &mut ConfigStore,
    logger: &mut LoggerHandle,
    args: &[String],
    display: &DisplayUtils,
) -> Result<()> {
    let outcome = manager::set(store, logger, args).await?;
    if outcome.is_unchanged() {
        display.print_warning(&outcome.to_string())
    } else {
        display.print_success(&outcome.to_string())
    }
}
