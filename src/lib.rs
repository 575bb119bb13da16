pub mod commands;
pub mod config_utils;
pub mod debug_logger;
pub mod normalize;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod services;
pub mod settings;
pub mod types;
pub mod upload_log;

#[cfg(test)]
mod test_harness;

use std::sync::Arc;

use debug_logger::DiagnosticsSink;
use pipeline::{Pipeline, RunError, RunSnapshot};
use registry::JsonRegistry;
use services::{FanOut, ServiceClient};
use settings::Settings;
use types::{ShortenerConfig, UploaderConfig};

pub fn shortener_registry(settings: &Settings) -> JsonRegistry<ShortenerConfig> {
    JsonRegistry::new(settings.shorteners_file())
}

pub fn uploader_registry(settings: &Settings) -> JsonRegistry<UploaderConfig> {
    JsonRegistry::new(settings.uploaders_file())
}

/// Validate `link`, run it through every active service and render the report.
///
/// Registries are read once, before any call goes out.
pub async fn process_link(
    settings: &Settings,
    link: &str,
    diagnostics: Arc<dyn DiagnosticsSink>,
) -> Result<String, RunError> {
    pipeline::validate_link(link)?;

    let snapshot = RunSnapshot::capture(&shortener_registry(settings), &uploader_registry(settings))?;
    let client = ServiceClient::from_settings(settings, diagnostics);
    let report = Pipeline::new(FanOut::new(client)).run(link, &snapshot).await?;

    Ok(report.render())
}
