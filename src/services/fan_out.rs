//! Fan-out over every active service
//!
//! Calls inside one fan-out run concurrently. `join_all` hands results back
//! in input order, so output order always follows config order regardless of
//! which service answers first.

use futures::future::join_all;

use crate::services::service_client::ServiceClient;
use crate::types::{ShortenerConfig, UploadRecord, UploaderConfig};

pub struct FanOut {
    client: ServiceClient,
}

impl FanOut {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Shorten `target` with every shortener, keeping successes in config order.
    ///
    /// Empty when there are no shorteners or every call failed; callers
    /// cannot tell the two apart from the result.
    pub async fn shorten_all(&self, target: &str, shorteners: &[ShortenerConfig]) -> Vec<String> {
        let calls = shorteners
            .iter()
            .map(|shortener| self.client.shorten(shortener, target));

        join_all(calls).await.into_iter().flatten().collect()
    }

    /// Upload `source` to every uploader; each success is then shortened
    /// with the full shortener list.
    ///
    /// Failed uploaders leave no record, so the result is never longer than
    /// `uploaders`.
    pub async fn upload_all(
        &self,
        source: &str,
        uploaders: &[UploaderConfig],
        shorteners: &[ShortenerConfig],
    ) -> Vec<UploadRecord> {
        let pipelines = uploaders
            .iter()
            .map(|uploader| self.upload_and_shorten(uploader, source, shorteners));

        join_all(pipelines).await.into_iter().flatten().collect()
    }

    async fn upload_and_shorten(
        &self,
        uploader: &UploaderConfig,
        source: &str,
        shorteners: &[ShortenerConfig],
    ) -> Option<UploadRecord> {
        let Some(hosted_url) = self.client.upload(uploader, source).await else {
            tracing::warn!(service = %uploader.name, "skipping uploader, upload failed");
            return None;
        };

        let shortened_urls = self.shorten_all(&hosted_url, shorteners).await;
        tracing::info!(
            service = %uploader.name,
            hosted_url = %hosted_url,
            shortened = shortened_urls.len(),
            "upload complete"
        );

        Some(UploadRecord {
            platform_name: uploader.name.clone(),
            hosted_url,
            shortened_urls,
        })
    }
}
