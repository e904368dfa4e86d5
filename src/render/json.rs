//! JSON rendering for extraction reports.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::extract::ExtractionReport;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any report-like value.
pub fn to_json<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Synthesis(format!("JSON serialization error: {}", e)))
}

/// Convert an extraction report to JSON.
pub fn report_to_json(report: &ExtractionReport, format: JsonFormat) -> Result<String> {
    to_json(report, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Metadata;

    fn sample_report() -> ExtractionReport {
        ExtractionReport {
            page_count: 3,
            size_bytes: 2048,
            size_mb: 0.0,
            metadata: Metadata {
                title: Some("Test".to_string()),
                tagged: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_report_to_json_pretty() {
        let json = report_to_json(&sample_report(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Test"));
        assert!(json.contains("\"tagged\": true"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_report_to_json_compact() {
        let json = report_to_json(&sample_report(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"page_count\":3"));
    }
}
