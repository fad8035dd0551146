//! Per-image reports, batch summaries and JSON export

use crate::aggregate::Status;
use crate::analyzers::Details;
use crate::error::StegResult;
use crate::pipeline::AggregateResult;
use crate::source::SourceImage;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Analysis of one image file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub filename: String,
    pub path: String,
    pub file_size: u64,
    pub dimensions: String,
    pub sha256: String,
    #[serde(flatten)]
    pub analysis: AggregateResult,
    pub timestamp: DateTime<Utc>,
}

impl ImageReport {
    pub fn new(path: &Path, source: &SourceImage, analysis: AggregateResult) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            filename,
            path: path.display().to_string(),
            file_size: source.file_size,
            dimensions: source.image.dimensions(),
            sha256: source.sha256.clone(),
            analysis,
            timestamp: Utc::now(),
        }
    }

    pub fn status(&self) -> Status {
        self.analysis.status
    }
}

/// Status counts over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub clean: usize,
    pub suspicious: usize,
    pub detected: usize,
}

impl BatchSummary {
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a ImageReport>) -> Self {
        let mut summary = Self::default();
        for report in reports {
            summary.record(report.status());
        }
        summary
    }

    pub fn record(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Clean => self.clean += 1,
            Status::Suspicious => self.suspicious += 1,
            Status::Detected => self.detected += 1,
        }
    }
}

/// One exported result; thumbnails and per-image timestamps are left out
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry<'a> {
    pub filename: &'a str,
    pub status: Status,
    pub confidence: f64,
    pub detected_method: Option<&'a str>,
    pub file_size: u64,
    pub dimensions: &'a str,
    pub sha256: &'a str,
    pub details: &'a Details,
}

/// Document written by an export
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    pub timestamp: DateTime<Utc>,
    pub total_images: usize,
    /// Counts of the statuses that actually occur
    pub summary: BTreeMap<Status, usize>,
    pub results: Vec<ExportEntry<'a>>,
}

impl<'a> ExportDocument<'a> {
    pub fn new(reports: &'a [ImageReport]) -> Self {
        let mut summary = BTreeMap::new();
        for report in reports {
            *summary.entry(report.status()).or_insert(0) += 1;
        }

        let results = reports
            .iter()
            .map(|r| ExportEntry {
                filename: &r.filename,
                status: r.status(),
                confidence: r.analysis.confidence,
                detected_method: r.analysis.detected_method.as_deref(),
                file_size: r.file_size,
                dimensions: &r.dimensions,
                sha256: &r.sha256,
                details: &r.analysis.details,
            })
            .collect();

        Self {
            timestamp: Utc::now(),
            total_images: reports.len(),
            summary,
            results,
        }
    }

    pub fn to_json(&self) -> StegResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> StegResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Default export file name for a given day
pub fn export_file_name(date: NaiveDate) -> String {
    format!("steganalysis_results_{}.json", date.format("%Y-%m-%d"))
}

/// Human-readable file size, e.g. `1.5 KB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
