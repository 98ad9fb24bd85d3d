use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use jobtrack_core::formatting::render_summary;
use jobtrack_core::models::AnalysisSummary;
use jobtrack_data::analysis::{AnalysisMetadata, AnalysisResult};
use serde::Serialize;

use crate::bootstrap::ensure_directory;

/// Summary plus metadata, as printed by `--output json` and saved by `--save`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub summary: &'a AnalysisSummary,
    pub metadata: &'a AnalysisMetadata,
}

impl<'a> From<&'a AnalysisResult> for Report<'a> {
    fn from(result: &'a AnalysisResult) -> Self {
        Report {
            summary: &result.summary,
            metadata: &result.metadata,
        }
    }
}

/// Files written by [`save_results`].
#[derive(Debug)]
pub struct SavedResults {
    pub summary_path: PathBuf,
    pub cleaned_path: PathBuf,
}

/// Render `result` in the requested output format (`text`, `json`, `wire`).
pub fn render(result: &AnalysisResult, output: &str) -> anyhow::Result<String> {
    let rendered = match output {
        "json" => serde_json::to_string_pretty(&Report::from(result))?,
        "wire" => serde_json::to_string_pretty(&result.summary.to_response())?,
        _ => render_summary(&result.summary),
    };
    Ok(rendered)
}

/// Write `summary-<stamp>.json` and `cleaned-<stamp>.csv` into `dir`.
pub fn save_results(dir: &Path, result: &AnalysisResult) -> anyhow::Result<SavedResults> {
    ensure_directory(dir)
        .with_context(|| format!("creating results directory {}", dir.display()))?;

    let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3f").to_string();
    let summary_path = dir.join(format!("summary-{stamp}.json"));
    let cleaned_path = dir.join(format!("cleaned-{stamp}.csv"));

    let json = serde_json::to_string_pretty(&Report::from(result))?;
    std::fs::write(&summary_path, json)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    let mut writer = csv::Writer::from_path(&cleaned_path)
        .with_context(|| format!("writing {}", cleaned_path.display()))?;
    for row in result.dataset.iter() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(SavedResults {
        summary_path,
        cleaned_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobtrack_core::models::{Cell, RawTable, SchemaVariant};
    use jobtrack_data::analysis::analyze_detailed;
    use tempfile::TempDir;

    fn sample_result() -> AnalysisResult {
        let rows: Vec<Vec<Cell>> = vec![
            ["Acme", "Engineer", "", "", "2024-03-01", "Yes", "", "", "", "Waiting..."],
            ["Beta", "Analyst", "", "", "bad", "No", "", "", "", "Rejected"],
        ]
        .iter()
        .map(|r| r.iter().map(|c| Cell::from(*c)).collect())
        .collect();
        analyze_detailed(&RawTable::new(10, rows), SchemaVariant::Canonical).unwrap()
    }

    #[test]
    fn test_render_text() {
        let text = render(&sample_result(), "text").unwrap();
        assert!(text.contains("Job Application Summary"));
        assert!(text.contains("Acme"));
    }

    #[test]
    fn test_render_json_includes_metadata() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&sample_result(), "json").unwrap()).unwrap();
        assert_eq!(json["summary"]["total_applications"], 1);
        assert_eq!(json["metadata"]["rows_unparseable_date"], 1);
        assert_eq!(json["metadata"]["schema"], "canonical");
    }

    #[test]
    fn test_render_wire_is_camel_case() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&sample_result(), "wire").unwrap()).unwrap();
        assert_eq!(json["totalApplications"], 1);
        assert_eq!(json["pendingApplications"], 1);
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_save_results_writes_both_files() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("results");

        let saved = save_results(&dir, &sample_result()).unwrap();

        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&saved.summary_path).unwrap()).unwrap();
        assert_eq!(summary["summary"]["applications_by_company"]["Acme"], 1);

        let cleaned = std::fs::read_to_string(&saved.cleaned_path).unwrap();
        let mut lines = cleaned.lines();
        assert!(lines.next().unwrap().starts_with("company,role_title"));
        assert!(lines.next().unwrap().contains("2024-03-01"));
        assert!(lines.next().is_none());
    }
}
