//! Single-call executor
//!
//! One outbound HTTP call against one configured service. Every failure
//! (connection, timeout, non-2xx, non-JSON body, unrecognized JSON shape) is
//! reported to the diagnostics sink and collapses to `None`; nothing escapes
//! to the fan-out.

use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::debug_logger::DiagnosticsSink;
use crate::normalize::{normalize, summarize_payload, SHORTEN_RESULT_KEYS, UPLOAD_RESULT_KEYS};
use crate::settings::{Settings, DEFAULT_SHORTEN_TIMEOUT_SECS, DEFAULT_UPLOAD_TIMEOUT_SECS};
use crate::types::{ShortenerConfig, UploaderConfig};

/// Why a single call produced no result
#[derive(Debug, Error)]
pub(crate) enum CallError {
    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("response is not JSON: {0}")]
    NotJson(#[source] serde_json::Error),
    #[error("unrecognized response format: {0}")]
    UnrecognizedShape(String),
}

/// HTTP client shared by every call in a run
pub struct ServiceClient {
    client: reqwest::Client,
    shorten_timeout: Duration,
    upload_timeout: Duration,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl ServiceClient {
    /// Client with the default timeouts
    pub fn new(diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self::with_timeouts(
            Duration::from_secs(DEFAULT_SHORTEN_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
            diagnostics,
        )
    }

    pub fn from_settings(settings: &Settings, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self::with_timeouts(settings.shorten_timeout, settings.upload_timeout, diagnostics)
    }

    pub fn with_timeouts(
        shorten_timeout: Duration,
        upload_timeout: Duration,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        // Include version in User-Agent
        let user_agent = format!("MultiUploader/{}", env!("CARGO_PKG_VERSION"));

        let client = reqwest::Client::builder()
            .user_agent(&user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            shorten_timeout,
            upload_timeout,
            diagnostics,
        }
    }

    /// Shorten `target` with one shortener, or `None` on any failure
    pub async fn shorten(&self, shortener: &ShortenerConfig, target: &str) -> Option<String> {
        let outcome = self.request_shorten(shortener, target).await;
        self.settle(&shortener.name, outcome)
    }

    /// Hand `source` to one uploader and return the hosted URL, or `None` on any failure
    pub async fn upload(&self, uploader: &UploaderConfig, source: &str) -> Option<String> {
        let outcome = self.request_upload(uploader, source).await;
        self.settle(&uploader.name, outcome)
    }

    fn settle(&self, service: &str, outcome: Result<String, CallError>) -> Option<String> {
        match outcome {
            Ok(value) => {
                tracing::debug!(service, result = %value, "service call succeeded");
                Some(value)
            }
            Err(e) => {
                self.diagnostics.record(service, &e.to_string());
                None
            }
        }
    }

    async fn request_shorten(&self, shortener: &ShortenerConfig, target: &str) -> Result<String, CallError> {
        let request_url = shorten_request_url(shortener, target);
        tracing::debug!(service = %shortener.name, "shortening link");

        let request = self.client.get(request_url).timeout(self.shorten_timeout);
        let body = self.send_for_json(request, self.shorten_timeout).await?;

        normalize(&body, SHORTEN_RESULT_KEYS)
            .ok_or_else(|| CallError::UnrecognizedShape(summarize_payload(&body)))
    }

    async fn request_upload(&self, uploader: &UploaderConfig, source: &str) -> Result<String, CallError> {
        tracing::debug!(service = %uploader.name, endpoint = %uploader.endpoint, "uploading link");

        // Hosts disagree on where the key goes, so send it both ways
        let form = [("url", source), ("api_key", uploader.credential.as_str())];
        let request = self
            .client
            .post(&uploader.endpoint)
            .bearer_auth(&uploader.credential)
            .form(&form)
            .timeout(self.upload_timeout);
        let body = self.send_for_json(request, self.upload_timeout).await?;

        normalize(&body, UPLOAD_RESULT_KEYS)
            .ok_or_else(|| CallError::UnrecognizedShape(summarize_payload(&body)))
    }

    async fn send_for_json(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<Value, CallError> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                CallError::Timeout(timeout)
            } else {
                CallError::Transport(e)
            }
        };

        let response = request.send().await.map_err(map_err)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::Status {
                status,
                body: truncate(&body, 200),
            });
        }

        let text = response.text().await.map_err(map_err)?;
        serde_json::from_str(&text).map_err(CallError::NotJson)
    }
}

/// `{base}{credential}&url={target}`; base and credential are used verbatim
/// because configured bases usually end in an open query (`...?api=`)
pub fn shorten_request_url(shortener: &ShortenerConfig, target: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("{}{}&url={}", shortener.base, shortener.credential, encoded)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}
