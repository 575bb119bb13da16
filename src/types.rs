//! Core types for registered services and per-run results.
//!
//! The serialized shape of the service configs matches the registry files
//! (`shorteners.json`, `uploads.json`), so existing files keep loading.

use serde::{Deserialize, Serialize};

/// Whether a registered service takes part in runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Active,
    /// Anything other than `"active"` in a registry file reads as paused
    #[serde(other)]
    Paused,
}

impl ServiceStatus {
    /// The opposite status, used by the registry toggle
    pub fn toggled(self) -> Self {
        match self {
            ServiceStatus::Active => ServiceStatus::Paused,
            ServiceStatus::Paused => ServiceStatus::Active,
        }
    }

    /// Label shown in registry listings
    pub fn label(self) -> &'static str {
        match self {
            ServiceStatus::Active => "Active",
            ServiceStatus::Paused => "Paused",
        }
    }
}

/// A URL shortener: `GET {base}{credential}&url={target}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortenerConfig {
    pub name: String,
    pub base: String,
    #[serde(rename = "api")]
    pub credential: String,
    pub status: ServiceStatus,
}

/// A file host: `POST {endpoint}` with the source link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploaderConfig {
    pub name: String,
    pub endpoint: String,
    #[serde(rename = "api")]
    pub credential: String,
    pub status: ServiceStatus,
}

impl ShortenerConfig {
    pub fn new(name: impl Into<String>, base: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            credential: credential.into(),
            status: ServiceStatus::Active,
        }
    }
}

impl UploaderConfig {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            credential: credential.into(),
            status: ServiceStatus::Active,
        }
    }
}

/// Common view over both service kinds, used by the registry
pub trait ServiceEntry {
    /// Singular noun used in user-facing messages ("shortener", "uploader")
    const KIND: &'static str;

    fn name(&self) -> &str;
    fn status(&self) -> ServiceStatus;
    fn set_status(&mut self, status: ServiceStatus);

    fn is_active(&self) -> bool {
        self.status() == ServiceStatus::Active
    }
}

impl ServiceEntry for ShortenerConfig {
    const KIND: &'static str = "shortener";

    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> ServiceStatus {
        self.status
    }

    fn set_status(&mut self, status: ServiceStatus) {
        self.status = status;
    }
}

impl ServiceEntry for UploaderConfig {
    const KIND: &'static str = "uploader";

    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> ServiceStatus {
        self.status
    }

    fn set_status(&mut self, status: ServiceStatus) {
        self.status = status;
    }
}

/// One successful upload and the short links made for its hosted URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadRecord {
    #[serde(rename = "platform")]
    pub platform_name: String,
    #[serde(rename = "url")]
    pub hosted_url: String,
    #[serde(rename = "shortened")]
    pub shortened_urls: Vec<String>,
}
