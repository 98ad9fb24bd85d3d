//! Counting and grouping over a cleaned dataset.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use jobtrack_core::models::{AnalysisSummary, CleanedDataset, NormalizedRow};

// Category literals as they appear in the sheet. Matching is exact and
// case-sensitive; anything else counts toward no category.
pub const REMOTE: &str = "Yes";
pub const ONSITE: &str = "No";
pub const STATUS_PENDING: &str = "Waiting...";
pub const STATUS_REJECTED: &str = "Rejected";
pub const STATUS_NOT_AVAILABLE: &str = "No Longer Available";

/// Month grouping key, `"YYYY-MM"`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

// ── SummaryAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that turns a cleaned dataset into an [`AnalysisSummary`].
pub struct SummaryAggregator;

impl SummaryAggregator {
    /// Compute every scalar counter and grouped map for `dataset`.
    pub fn summarize(dataset: &CleanedDataset) -> AnalysisSummary {
        let rows = dataset.rows();

        AnalysisSummary {
            total_applications: rows.len() as u64,
            remote_applications: Self::count_matching(rows, |r| &r.is_remote, REMOTE),
            onsite_applications: Self::count_matching(rows, |r| &r.is_remote, ONSITE),
            pending_applications: Self::count_matching(
                rows,
                |r| &r.response_status,
                STATUS_PENDING,
            ),
            not_available_applications: Self::count_matching(
                rows,
                |r| &r.response_status,
                STATUS_NOT_AVAILABLE,
            ),
            rejected_applications: Self::count_matching(
                rows,
                |r| &r.response_status,
                STATUS_REJECTED,
            ),
            applications_by_month: Self::count_by(rows, |r| month_key(r.application_date)),
            applications_by_company: Self::count_by(rows, |r| r.company.clone()),
            applications_by_role_title: Self::count_by(rows, |r| r.role_title.clone()),
        }
    }

    /// Frequency of each key produced by `key_fn`.
    ///
    /// Keys are compared exactly; no case or whitespace folding.
    pub fn count_by(
        rows: &[NormalizedRow],
        key_fn: impl Fn(&NormalizedRow) -> String,
    ) -> BTreeMap<String, u64> {
        let mut map: BTreeMap<String, u64> = BTreeMap::new();
        for row in rows {
            *map.entry(key_fn(row)).or_insert(0) += 1;
        }
        map
    }

    /// Number of rows whose optional `field` equals `literal` exactly.
    fn count_matching(
        rows: &[NormalizedRow],
        field: impl Fn(&NormalizedRow) -> &Option<String>,
        literal: &str,
    ) -> u64 {
        rows.iter()
            .filter(|&r| field(r).as_deref() == Some(literal))
            .count() as u64
    }
}

/// Summarize `dataset`.
pub fn summarize(dataset: &CleanedDataset) -> AnalysisSummary {
    SummaryAggregator::summarize(dataset)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
