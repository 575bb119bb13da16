//! Report formatting
//!
//! ```text
//! Drive link - <original>
//! Drive Shortner Link - ["...", "..."]
//!
//! FilePress - <hosted>
//! FilePress Shortner Link - ["..."]
//! ```
//!
//! The original link always comes first, even when no upload succeeded.
//! The heading is spelled "Shortner" and must stay that way.

use serde_json::Value;

use crate::types::UploadRecord;

/// Label of the section describing the input link
pub const ORIGINAL_LABEL: &str = "Drive";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Original,
    Upload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub label: String,
    pub primary_url: String,
    pub shortened_urls: Vec<String>,
}

impl ReportSection {
    fn heading(&self) -> String {
        match self.kind {
            SectionKind::Original => format!("{} link - {}", self.label, self.primary_url),
            SectionKind::Upload => format!("{} - {}", self.label, self.primary_url),
        }
    }

    fn render(&self) -> String {
        format!(
            "{}\n{} Shortner Link - {}",
            self.heading(),
            self.label,
            json_string_array(&self.shortened_urls)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(original_link: &str, original_shortened: &[String], records: &[UploadRecord]) -> Self {
        let original = ReportSection {
            kind: SectionKind::Original,
            label: ORIGINAL_LABEL.to_string(),
            primary_url: original_link.to_string(),
            shortened_urls: original_shortened.to_vec(),
        };

        let uploads = records.iter().map(|record| ReportSection {
            kind: SectionKind::Upload,
            label: record.platform_name.clone(),
            primary_url: record.hosted_url.clone(),
            shortened_urls: record.shortened_urls.clone(),
        });

        Self {
            sections: std::iter::once(original).chain(uploads).collect(),
        }
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(ReportSection::render)
            .collect::<Vec<_>>()
            .join("\n\n")
            .trim_end()
            .to_string()
    }
}

/// Render the full report text for one run
pub fn format_report(original_link: &str, original_shortened: &[String], records: &[UploadRecord]) -> String {
    Report::new(original_link, original_shortened, records).render()
}

/// JSON array with `", "` between elements, e.g. `["a", "b"]`
fn json_string_array(items: &[String]) -> String {
    let elements: Vec<String> = items.iter().map(|item| Value::from(item.as_str()).to_string()).collect();
    format!("[{}]", elements.join(", "))
}
