use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A single value as found in the source spreadsheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// No value at all (an empty CSV field, a JSON `null`, a trimmed-off tail).
    #[default]
    Blank,
    /// Text exactly as exported.
    Text(String),
    /// A numeric cell, e.g. a spreadsheet serial date or a salary.
    Number(f64),
}

impl Cell {
    /// `true` for [`Cell::Blank`] and for text that is only whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Blank => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// The cell's string value, or `None` when the cell is empty.
    ///
    /// Text is returned verbatim. Integral numbers render without a trailing
    /// `.0` so that a company called `3` groups as `"3"`.
    pub fn to_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            Cell::Blank => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(format_number_cell(*n)),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Blank
        } else {
            Cell::Text(s.to_string())
        }
    }
}

fn format_number_cell(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ── RawTable ──────────────────────────────────────────────────────────────────

/// One record of the source table; column meaning comes from position only.
pub type RawRow = Vec<Cell>;

/// A header-less grid of cells with a known column count.
///
/// Rows shorter than `width` are read as if padded with [`Cell::Blank`];
/// sheet exports routinely drop trailing empty cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    width: usize,
    rows: Vec<RawRow>,
}

impl RawTable {
    /// Build a table with an explicit column count (normally the header width).
    pub fn new(width: usize, rows: Vec<RawRow>) -> Self {
        Self { width, rows }
    }

    /// Build a table whose width is that of its widest row.
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { width, rows }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// A logical column the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Company,
    RoleTitle,
    SalaryRate,
    JobLink,
    ApplicationDate,
    IsRemote,
    /// Only present in the older eleven-column export; bound and then ignored.
    IsReferral,
    ContactInfo,
    InterviewStage,
    InterviewInfo,
    ResponseStatus,
}

impl Field {
    /// The canonical field name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Company => "Company",
            Field::RoleTitle => "RoleTitle",
            Field::SalaryRate => "SalaryRate",
            Field::JobLink => "JobLink",
            Field::ApplicationDate => "ApplicationDate",
            Field::IsRemote => "IsRemote",
            Field::IsReferral => "IsReferral",
            Field::ContactInfo => "ContactInfo",
            Field::InterviewStage => "InterviewStage",
            Field::InterviewInfo => "InterviewInfo",
            Field::ResponseStatus => "ResponseStatus",
        }
    }
}

const CANONICAL_FIELDS: &[Field] = &[
    Field::Company,
    Field::RoleTitle,
    Field::SalaryRate,
    Field::JobLink,
    Field::ApplicationDate,
    Field::IsRemote,
    Field::ContactInfo,
    Field::InterviewStage,
    Field::InterviewInfo,
    Field::ResponseStatus,
];

const REFERRAL_FIELDS: &[Field] = &[
    Field::Company,
    Field::RoleTitle,
    Field::SalaryRate,
    Field::JobLink,
    Field::ApplicationDate,
    Field::IsRemote,
    Field::IsReferral,
    Field::ContactInfo,
    Field::InterviewStage,
    Field::InterviewInfo,
    Field::ResponseStatus,
];

/// Which positional column layout the export uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaVariant {
    /// The ten-column layout.
    #[default]
    Canonical,
    /// Eleven columns with an `IsReferral` column after `IsRemote`.
    WithReferral,
}

impl SchemaVariant {
    /// Parse the CLI spelling (`"canonical"` / `"with-referral"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "canonical" => Some(SchemaVariant::Canonical),
            "with-referral" => Some(SchemaVariant::WithReferral),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVariant::Canonical => "canonical",
            SchemaVariant::WithReferral => "with-referral",
        }
    }
}

/// Fixed, ordered list of fields bound to the raw table by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalSchema {
    fields: &'static [Field],
}

impl LogicalSchema {
    /// The ten-column schema.
    pub fn canonical() -> Self {
        Self::for_variant(SchemaVariant::Canonical)
    }

    pub fn for_variant(variant: SchemaVariant) -> Self {
        let fields = match variant {
            SchemaVariant::Canonical => CANONICAL_FIELDS,
            SchemaVariant::WithReferral => REFERRAL_FIELDS,
        };
        Self { fields }
    }

    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Number of columns a raw table must have.
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Column index of `field`, if this schema contains it.
    pub fn position(&self, field: Field) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }
}

impl Default for LogicalSchema {
    fn default() -> Self {
        Self::canonical()
    }
}

// ── NormalizedRow ─────────────────────────────────────────────────────────────

/// A raw row re-keyed by field name with a real application date.
///
/// `company`, `role_title` and `application_date` are always present; rows
/// lacking any of them never make it this far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub company: String,
    pub role_title: String,
    pub salary_rate: Option<String>,
    pub job_link: Option<String>,
    pub application_date: NaiveDate,
    pub is_remote: Option<String>,
    pub contact_info: Option<String>,
    pub interview_stage: Option<String>,
    pub interview_info: Option<String>,
    pub response_status: Option<String>,
}

// ── CleanedDataset ────────────────────────────────────────────────────────────

/// Rows that survived required-field and date filtering, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedDataset {
    rows: Vec<NormalizedRow>,
}

impl CleanedDataset {
    pub fn new(rows: Vec<NormalizedRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<NormalizedRow> {
        self.rows
    }
}

impl FromIterator<NormalizedRow> for CleanedDataset {
    fn from_iter<I: IntoIterator<Item = NormalizedRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CleanedDataset {
    type Item = &'a NormalizedRow;
    type IntoIter = std::slice::Iter<'a, NormalizedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// ── AnalysisSummary ───────────────────────────────────────────────────────────

/// Scalar and grouped counts over a cleaned dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_applications: u64,
    pub remote_applications: u64,
    pub onsite_applications: u64,
    pub pending_applications: u64,
    pub not_available_applications: u64,
    pub rejected_applications: u64,
    /// `"YYYY-MM"` → count. Months without applications are absent.
    pub applications_by_month: BTreeMap<String, u64>,
    pub applications_by_company: BTreeMap<String, u64>,
    pub applications_by_role_title: BTreeMap<String, u64>,
}

impl AnalysisSummary {
    /// Project onto the camelCase wire shape used by the HTTP API.
    pub fn to_response(&self) -> SummaryResponse {
        SummaryResponse {
            total_applications: self.total_applications,
            remote_applications: self.remote_applications,
            onsite_applications: self.onsite_applications,
            pending_applications: self.pending_applications,
            not_available_applications: self.not_available_applications,
            rejected_applications: self.rejected_applications,
            applications_by_month: self.applications_by_month.clone(),
            applications_by_company: self.applications_by_company.clone(),
            applications_by_role_title: self.applications_by_role_title.clone(),
        }
    }
}

/// Wire form of [`AnalysisSummary`] with camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_applications: u64,
    pub remote_applications: u64,
    pub onsite_applications: u64,
    pub pending_applications: u64,
    pub not_available_applications: u64,
    pub rejected_applications: u64,
    pub applications_by_month: BTreeMap<String, u64>,
    pub applications_by_company: BTreeMap<String, u64>,
    pub applications_by_role_title: BTreeMap<String, u64>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
