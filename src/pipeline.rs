//! One orchestration run: link in, report out.

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::registry::{RegistryError, ServiceRegistry};
use crate::report::Report;
use crate::services::FanOut;
use crate::types::{ShortenerConfig, UploaderConfig};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid or unsupported link format.")]
    InvalidLink(String),
    #[error("No active upload platforms configured.")]
    NoActiveUploaders,
    #[error("failed to read service registry: {0}")]
    Registry(#[from] RegistryError),
}

impl RunError {
    /// Message shown to the person who asked for the run
    pub fn user_message(&self) -> &'static str {
        match self {
            RunError::InvalidLink(_) => "Invalid or unsupported link format.",
            RunError::NoActiveUploaders => "No active upload platforms configured.",
            RunError::Registry(_) => "An error occurred during processing.",
        }
    }
}

/// Active services, read once at the start of a run
#[derive(Debug, Clone, Default)]
pub struct RunSnapshot {
    pub shorteners: Vec<ShortenerConfig>,
    pub uploaders: Vec<UploaderConfig>,
}

impl RunSnapshot {
    pub fn capture<S, U>(shorteners: &S, uploaders: &U) -> Result<Self, RegistryError>
    where
        S: ServiceRegistry<ShortenerConfig> + ?Sized,
        U: ServiceRegistry<UploaderConfig> + ?Sized,
    {
        Ok(Self {
            shorteners: shorteners.list_active()?,
            uploaders: uploaders.list_active()?,
        })
    }
}

/// Accept only absolute `http`/`https` links
pub fn validate_link(link: &str) -> Result<(), RunError> {
    match url::Url::parse(link) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err(RunError::InvalidLink(link.to_string())),
    }
}

pub struct Pipeline {
    fan_out: FanOut,
}

impl Pipeline {
    pub fn new(fan_out: FanOut) -> Self {
        Self { fan_out }
    }

    /// Upload `link` everywhere, shorten everything, build the report.
    ///
    /// Fails only when no uploader is active; individual service failures
    /// just leave their entries out of the report.
    pub async fn run(&self, link: &str, snapshot: &RunSnapshot) -> Result<Report, RunError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id);

        async {
            if snapshot.uploaders.is_empty() {
                tracing::warn!("no active uploaders");
                return Err(RunError::NoActiveUploaders);
            }
            if snapshot.shorteners.is_empty() {
                tracing::info!("no active shorteners, shortened lists will be empty");
            }

            tracing::info!(
                uploaders = snapshot.uploaders.len(),
                shorteners = snapshot.shorteners.len(),
                "processing link"
            );

            let (original_shortened, records) = tokio::join!(
                self.fan_out.shorten_all(link, &snapshot.shorteners),
                self.fan_out.upload_all(link, &snapshot.uploaders, &snapshot.shorteners),
            );

            if records.is_empty() {
                tracing::warn!("every uploader failed");
            }
            tracing::info!(uploaded = records.len(), "run complete");

            Ok(Report::new(link, &original_shortened, &records))
        }
        .instrument(span)
        .await
    }
}
