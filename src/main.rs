use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use multiuploader_lib::commands::{self, Cli};
use multiuploader_lib::settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match Settings::from_env().and_then(|settings| settings.validate().map(|()| settings)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_tracing(&cli, &settings);
    tracing::debug!(data_dir = %settings.data_dir.display(), "settings loaded");

    match commands::dispatch(cli.command, &settings).await {
        Ok(output) => {
            println!("{}", output.stdout);
            if let Some(diagnostics) = output.stderr {
                eprintln!("{}", diagnostics);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// Stderr logging (text or JSON) plus a daily JSON log file when a log
/// directory is available. The returned guard flushes the file writer on drop.
fn init_tracing(cli: &Cli, settings: &Settings) -> Option<WorkerGuard> {
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = if cli.log_json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).with_target(false).boxed()
    };

    let (file_layer, guard) = match settings.logs_dir.as_deref().and_then(file_appender) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {}", e);
    }

    guard
}

fn file_appender(dir: &Path) -> Option<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("multiuploader")
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| eprintln!("Log file disabled ({}): {}", dir.display(), e))
        .ok()
}
