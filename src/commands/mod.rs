//! Command-line surface.
//!
//! Stands in for the chat front end: one `upload` command plus registry
//! management for both service kinds. Handlers return text for `main` to
//! print and never write to stdout themselves.

pub mod service_cmd;
pub mod upload;

use clap::{ArgAction, Parser, Subcommand};
use thiserror::Error;

use crate::config_utils::StoreError;
use crate::pipeline::RunError;
use crate::registry::RegistryError;
use crate::settings::Settings;

/// Upload a link to every configured host and shorten every resulting URL.
#[derive(Parser)]
#[command(name = "multiuploader", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// More log output (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload and shorten a link.
    Upload {
        /// Absolute http(s) link to process.
        link: String,

        /// Name recorded in the upload log.
        #[arg(long)]
        user: Option<String>,

        /// Numeric id recorded in the upload log.
        #[arg(long)]
        user_id: Option<u64>,

        /// Print per-service failures after the report.
        #[arg(long)]
        diagnostics: bool,
    },

    /// Manage URL shorteners.
    Shortener {
        #[command(subcommand)]
        action: ShortenerCommand,
    },

    /// Manage upload platforms.
    Uploader {
        #[command(subcommand)]
        action: UploaderCommand,
    },
}

#[derive(Subcommand)]
pub enum ShortenerCommand {
    /// Register a shortener (base example: https://gplinks.in/api?api=).
    Add {
        name: String,
        base: String,
        api_key: String,
    },
    /// List all shorteners.
    #[command(alias = "ls")]
    List,
    /// Pause or resume a shortener by its list number.
    Toggle { index: usize },
    /// Remove a shortener by its list number.
    #[command(alias = "rm")]
    Remove { index: usize },
}

#[derive(Subcommand)]
pub enum UploaderCommand {
    /// Register an uploader (endpoint example: https://filepress.in/api/upload).
    Add {
        name: String,
        endpoint: String,
        api_key: String,
    },
    /// List all uploaders.
    #[command(alias = "ls")]
    List,
    /// Pause or resume an uploader by its list number.
    Toggle { index: usize },
    /// Remove an uploader by its list number.
    #[command(alias = "rm")]
    Remove { index: usize },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl CommandError {
    /// Message for the operator; details go to the log
    pub fn user_message(&self) -> String {
        match self {
            CommandError::Run(e) => e.user_message().to_string(),
            CommandError::Registry(RegistryError::InvalidIndex { kind, .. }) => {
                format!("Invalid {} index.", kind)
            }
            CommandError::Registry(RegistryError::Store(StoreError::Parse { path, .. })) => {
                format!("Registry file {} is not valid JSON for this tool; fix it first.", path.display())
            }
            CommandError::Registry(RegistryError::Store(_)) => {
                "Failed to update the service registry.".to_string()
            }
        }
    }
}

/// Text produced by a command
#[derive(Debug, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: Option<String>,
}

impl CommandOutput {
    fn text(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: None,
        }
    }
}

pub async fn dispatch(command: Commands, settings: &Settings) -> Result<CommandOutput, CommandError> {
    match command {
        Commands::Upload {
            link,
            user,
            user_id,
            diagnostics,
        } => upload::handle_upload(settings, &link, user, user_id, diagnostics).await,
        Commands::Shortener { action } => service_cmd::handle_shortener(settings, action).map(CommandOutput::text),
        Commands::Uploader { action } => service_cmd::handle_uploader(settings, action).map(CommandOutput::text),
    }
}
