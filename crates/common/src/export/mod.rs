//! Report export to JSON or CSV files
//!
//! Both formats carry `timestamp, claim, verdict, evidence, sources`.
//! Analyzer extras (explanation, confidence, citations) are not exported.

use crate::errors::{AppError, Result};
use crate::models::{FactCheckReport, Source, Verdict};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

const SAFE_CLAIM_CHARS: usize = 50;
const JOIN_SEPARATOR: &str = " | ";
const CSV_HEADER: [&str; 5] = ["timestamp", "claim", "verdict", "evidence", "sources"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Case-insensitive; anything other than "csv" selects JSON.
impl FromStr for ExportFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Json
        })
    }
}

#[derive(Serialize)]
struct ExportPayload<'a> {
    timestamp: &'a str,
    claim: &'a str,
    verdict: Verdict,
    evidence: &'a [String],
    sources: &'a [Source],
}

impl<'a> From<&'a FactCheckReport> for ExportPayload<'a> {
    fn from(report: &'a FactCheckReport) -> Self {
        Self {
            timestamp: &report.timestamp,
            claim: &report.claim,
            verdict: report.verdict,
            evidence: &report.evidence,
            sources: &report.sources,
        }
    }
}

/// Pretty-printed JSON document
pub fn render_json(report: &FactCheckReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ExportPayload::from(report))?)
}

/// Header plus one data row, CRLF-terminated
pub fn render_csv(report: &FactCheckReport) -> String {
    let evidence = report.evidence.join(JOIN_SEPARATOR);
    let sources = report
        .sources
        .iter()
        .map(|s| format!("{} ({})", s.title, s.url))
        .collect::<Vec<_>>()
        .join(JOIN_SEPARATOR);

    let row = [
        report.timestamp.as_str(),
        report.claim.as_str(),
        report.verdict.as_str(),
        evidence.as_str(),
        sources.as_str(),
    ];

    let mut out = String::new();
    for record in [CSV_HEADER, row] {
        let line: Vec<String> = record.iter().map(|field| csv_field(field)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

/// Minimal quoting: only fields containing a comma, quote or line break are
/// quoted, with embedded quotes doubled.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// `fact_check_{YYYYmmdd_HHMMSS}_{safe_claim}.{ext}`
pub fn default_file_name(claim: &str, timestamp: DateTime<Utc>, format: ExportFormat) -> String {
    let safe_claim: String = claim
        .chars()
        .take(SAFE_CLAIM_CHARS)
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "fact_check_{}_{}.{}",
        timestamp.format("%Y%m%d_%H%M%S"),
        safe_claim,
        format.extension()
    )
}

/// Write `report` and return the written path.
///
/// Without an explicit `path` the file lands in `directory` (created if
/// missing) under [`default_file_name`].
pub fn export_report(
    report: &FactCheckReport,
    format: ExportFormat,
    directory: &Path,
    path: Option<&Path>,
) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            std::fs::create_dir_all(directory).map_err(|e| AppError::Export {
                message: format!("Failed to create {}: {}", directory.display(), e),
            })?;
            let timestamp = DateTime::parse_from_rfc3339(&report.timestamp)
                .map(|ts| ts.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            directory.join(default_file_name(&report.claim, timestamp, format))
        }
    };

    let contents = match format {
        ExportFormat::Json => render_json(report)?,
        ExportFormat::Csv => render_csv(report),
    };

    std::fs::write(&path, contents).map_err(|e| AppError::Export {
        message: format!("Failed to write {}: {}", path.display(), e),
    })?;

    info!(path = %path.display(), format = %format, "Report exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisResult;
    use chrono::TimeZone;

    fn report() -> FactCheckReport {
        let result = AnalysisResult {
            verdict: Verdict::Mixed,
            evidence: vec![
                "Pheidippides died after the run".to_string(),
                "Some say he \"survived\", others disagree".to_string(),
            ],
            sources: vec![
                Source {
                    title: "Marathon".to_string(),
                    document_id: 19619,
                    url: "https://en.wikipedia.org/?curid=19619".to_string(),
                },
                Source {
                    title: "Pheidippides".to_string(),
                    document_id: 24434,
                    url: "https://en.wikipedia.org/?curid=24434".to_string(),
                },
            ],
            explanation: Some("Sources disagree.".to_string()),
            confidence: Some(60),
            citations: None,
        };
        let ts = Utc.with_ymd_and_hms(2024, 5, 17, 9, 4, 33).unwrap();
        FactCheckReport::at("Did the marathon runner die?", result, ts)
    }

    #[test]
    fn test_format_parsing_defaults_to_json() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("xml".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
    }

    #[test]
    fn test_json_contains_only_core_fields() {
        let json = render_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["claim", "evidence", "sources", "timestamp", "verdict"]);
        assert_eq!(value["verdict"], "MIXED");
        assert_eq!(value["sources"][0]["pageid"], 19619);
        assert!(json.contains("\n  \"timestamp\""));
    }

    #[test]
    fn test_csv_layout_and_quoting() {
        let csv = render_csv(&report());
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines[0], "timestamp,claim,verdict,evidence,sources");
        assert_eq!(
            lines[1],
            "2024-05-17T09:04:33.000000+00:00,Did the marathon runner die?,MIXED,\
             \"Pheidippides died after the run | Some say he \"\"survived\"\", others disagree\",\
             Marathon (https://en.wikipedia.org/?curid=19619) | Pheidippides (https://en.wikipedia.org/?curid=24434)"
        );
        assert_eq!(lines[2], "");
    }

    #[test]
    fn test_csv_empty_lists() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let report = FactCheckReport::at("x", AnalysisResult::insufficient(), ts);
        let csv = render_csv(&report);
        assert!(csv.ends_with(",x,INSUFFICIENT_EVIDENCE,,\r\n"));
    }

    #[test]
    fn test_default_file_name() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 17, 9, 4, 33).unwrap();
        assert_eq!(
            default_file_name("Is Paris in France? (yes/no)", ts, ExportFormat::Csv),
            "fact_check_20240517_090433_Is Paris in France_ _yes_no_.csv"
        );

        let long = "a".repeat(80);
        let name = default_file_name(&long, ts, ExportFormat::Json);
        assert_eq!(name, format!("fact_check_20240517_090433_{}.json", "a".repeat(50)));
    }

    #[test]
    fn test_export_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("exports");

        let path = export_report(&report(), ExportFormat::Json, &target, None).unwrap();

        assert!(path.starts_with(&target));
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "fact_check_20240517_090433_Did the marathon runner die_.json"
        );
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["claim"], "Did the marathon runner die?");
    }

    #[test]
    fn test_export_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let written = export_report(&report(), ExportFormat::Csv, Path::new("unused"), Some(&path)).unwrap();

        assert_eq!(written, path);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("timestamp,claim,verdict,evidence,sources\r\n"));
        assert!(!Path::new("unused").exists());
    }
}
