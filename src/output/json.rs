//! JSON report output
//!
//! Serializes a full calibration run into a single JSON document so runs
//! can be archived per machine and compared across strategy or backend
//! changes.

use crate::probe::frames::FrameReport;
use crate::probe::granularity::GranularityReport;
use crate::probe::wait::WaitReport;
use crate::probe::HostInfo;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete calibration report document
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Producing tool name
    pub tool: String,
    /// Producing tool version
    pub version: String,
    /// Host context the run was captured on
    pub host: HostInfo,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub granularity: Option<GranularityReport>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub frames: Option<FrameReport>,
    /// One entry per probed wait-lock strategy
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub wait: Vec<WaitReport>,
}

impl ReportDocument {
    /// Create an empty document for the given host
    pub fn new(host: HostInfo) -> Self {
        Self {
            tool: "framepulse".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            host,
            granularity: None,
            frames: None,
            wait: Vec::new(),
        }
    }
}

/// Write a report document as pretty-printed JSON
pub fn write_json_report(path: &Path, document: &ReportDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document)
        .context("Failed to serialize report document")?;

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write report file: {}", path.display()))?;
    file.write_all(b"\n")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::HiresClock;
    use crate::probe::granularity::{self, GranularityConfig};
    use tempfile::TempDir;

    #[test]
    fn test_empty_document_serializes() {
        let clock = HiresClock::new();
        let doc = ReportDocument::new(HostInfo::capture(&clock));
        let json = serde_json::to_string(&doc).unwrap();

        assert!(json.contains("\"tool\":\"framepulse\""));
        // Absent sections are omitted, not null.
        assert!(!json.contains("granularity"));
        assert!(!json.contains("frames"));
    }

    #[test]
    fn test_write_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");

        let clock = HiresClock::new();
        let mut doc = ReportDocument::new(HostInfo::capture(&clock));
        doc.granularity = Some(granularity::run(
            &clock,
            &GranularityConfig { steps: 50 },
        ));

        write_json_report(&path, &doc).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: ReportDocument = serde_json::from_str(&contents).unwrap();

        assert_eq!(parsed.tool, "framepulse");
        assert_eq!(parsed.version, env!("CARGO_PKG_VERSION"));
        let gran = parsed.granularity.expect("granularity section expected");
        assert_eq!(gran.steps_observed, 50);
        assert!(parsed.wait.is_empty());
    }

    #[test]
    fn test_write_to_invalid_path_fails() {
        let clock = HiresClock::new();
        let doc = ReportDocument::new(HostInfo::capture(&clock));
        let result = write_json_report(Path::new("/nonexistent/dir/report.json"), &doc);
        assert!(result.is_err());
    }
}
