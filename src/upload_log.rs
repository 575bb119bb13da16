//! Append-only log of processed links (`logs.json`).

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config_utils::{self, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadLogEntry {
    pub user: String,
    pub user_id: Option<u64>,
    pub link: String,
    /// RFC 3339, UTC, `Z` suffix
    pub timestamp: String,
}

pub struct UploadLog {
    path: PathBuf,
}

impl UploadLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn entries(&self) -> Result<Vec<UploadLogEntry>, StoreError> {
        config_utils::load_json_or_default(&self.path)
    }

    /// Record one processed link
    pub fn append(&self, user: &str, user_id: Option<u64>, link: &str) -> Result<UploadLogEntry, StoreError> {
        let entry = UploadLogEntry {
            user: user.to_string(),
            user_id,
            link: link.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        let mut entries: Vec<UploadLogEntry> = config_utils::load_json(&self.path)?;
        entries.push(entry.clone());
        config_utils::save_json_atomic(&self.path, &entries)?;
        Ok(entry)
    }
}
