use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Keep the last 1000 entries to avoid unbounded growth
const MAX_ENTRIES: usize = 1000;

/// Receives per-service failures from the executor.
///
/// Implementations must not block; the executor calls this inline.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, service: &str, reason: &str);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub timestamp: String,
    pub service: String,
    pub reason: String,
}

/// In-memory diagnostics sink that also forwards every entry to `tracing`
pub struct DebugLogger {
    entries: Mutex<VecDeque<DiagnosticEntry>>,
}

impl DebugLogger {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Snapshot of the recorded entries, oldest first
    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn failure_count(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Render the entries as `service: reason` lines
    pub fn render(&self) -> String {
        self.entries()
            .iter()
            .map(|entry| format!("[{}] {}: {}", entry.timestamp, entry.service, entry.reason))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DiagnosticsSink for DebugLogger {
    fn record(&self, service: &str, reason: &str) {
        tracing::warn!(service, reason, "service call produced no result");

        let entry = DiagnosticEntry {
            timestamp: Utc::now().to_rfc3339(),
            service: service.to_string(),
            reason: reason.to_string(),
        };

        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() >= MAX_ENTRIES {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}
