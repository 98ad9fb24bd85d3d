//! Main analysis pipeline: raw table → normalizer → aggregator.
//!
//! Each call owns its intermediate dataset and drops it on return; nothing is
//! shared between invocations.

use chrono::Utc;
use jobtrack_core::error::Result;
use jobtrack_core::models::{
    AnalysisSummary, CleanedDataset, LogicalSchema, RawTable, SchemaVariant,
};

use crate::aggregator::SummaryAggregator;
use crate::normalizer::Normalizer;

// ── Public types ──────────────────────────────────────────────────────────────

/// Bookkeeping produced alongside the summary.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Column layout the table was bound with.
    pub schema: SchemaVariant,
    /// Data rows in the raw table.
    pub rows_read: usize,
    /// Rows that made it into the cleaned dataset.
    pub rows_kept: usize,
    /// Rows dropped for an empty company, role title or application date.
    pub rows_missing_required: usize,
    /// Rows dropped because the application date could not be parsed.
    pub rows_unparseable_date: usize,
}

/// The complete output of [`analyze_detailed`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub dataset: CleanedDataset,
    pub summary: AnalysisSummary,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Analyze a ten-column table.
pub fn analyze(table: &RawTable) -> Result<AnalysisSummary> {
    analyze_with_schema(table, SchemaVariant::Canonical)
}

/// Analyze a table laid out as `variant`.
pub fn analyze_with_schema(table: &RawTable, variant: SchemaVariant) -> Result<AnalysisSummary> {
    let dataset = Normalizer::new(LogicalSchema::for_variant(variant)).normalize(table)?;
    Ok(SummaryAggregator::summarize(&dataset))
}

/// Run the full pipeline and keep the cleaned rows and exclusion counts.
///
/// 1. Normalize against the `variant` schema (fails on a shape mismatch).
/// 2. Summarize the cleaned dataset.
/// 3. Record how many rows each filter removed.
pub fn analyze_detailed(table: &RawTable, variant: SchemaVariant) -> Result<AnalysisResult> {
    let normalized = Normalizer::new(LogicalSchema::for_variant(variant)).normalize_detailed(table)?;
    let summary = SummaryAggregator::summarize(&normalized.dataset);

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        schema: variant,
        rows_read: table.len(),
        rows_kept: normalized.dataset.len(),
        rows_missing_required: normalized.exclusions.missing_required,
        rows_unparseable_date: normalized.exclusions.unparseable_date,
    };

    Ok(AnalysisResult {
        dataset: normalized.dataset,
        summary,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
