//! Schema normalization: positional binding, required-field and date filters.

use jobtrack_core::dates::ApplicationDateParser;
use jobtrack_core::error::{Result, TrackerError};
use jobtrack_core::models::{
    Cell, CleanedDataset, Field, LogicalSchema, NormalizedRow, RawTable,
};

static BLANK: Cell = Cell::Blank;

// ── Exclusions ────────────────────────────────────────────────────────────────

/// Rows dropped during normalization, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exclusions {
    /// `Company`, `RoleTitle` or `ApplicationDate` was empty.
    pub missing_required: usize,
    /// `ApplicationDate` was present but not a recognisable date.
    pub unparseable_date: usize,
}

impl Exclusions {
    pub fn total(&self) -> usize {
        self.missing_required + self.unparseable_date
    }
}

/// A cleaned dataset together with what was filtered out to get there.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub dataset: CleanedDataset,
    pub exclusions: Exclusions,
}

// ── Normalizer ────────────────────────────────────────────────────────────────

/// Maps a positional raw table onto a [`LogicalSchema`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    schema: LogicalSchema,
}

impl Normalizer {
    pub fn new(schema: LogicalSchema) -> Self {
        Self { schema }
    }

    /// Normalize `table`, discarding the exclusion counts.
    pub fn normalize(&self, table: &RawTable) -> Result<CleanedDataset> {
        self.normalize_detailed(table).map(|n| n.dataset)
    }

    /// Normalize `table`.
    ///
    /// Fails with [`TrackerError::SchemaMismatch`] before looking at any row
    /// content when the table is not exactly as wide as the schema, even if
    /// it has no data rows. Only a grid with no columns at all (an empty
    /// file) yields an empty dataset without the width check.
    pub fn normalize_detailed(&self, table: &RawTable) -> Result<Normalized> {
        if table.width() == 0 {
            return Ok(Normalized::default());
        }
        self.check_shape(table)?;

        let mut exclusions = Exclusions::default();
        let mut rows = Vec::with_capacity(table.len());

        for raw in table.rows() {
            let bound = BoundRow::new(self.schema, raw);
            match bound.into_normalized() {
                Ok(row) => rows.push(row),
                Err(Rejection::MissingRequired) => exclusions.missing_required += 1,
                Err(Rejection::UnparseableDate) => exclusions.unparseable_date += 1,
            }
        }

        Ok(Normalized {
            dataset: CleanedDataset::new(rows),
            exclusions,
        })
    }

    fn check_shape(&self, table: &RawTable) -> Result<()> {
        let expected = self.schema.width();
        if table.width() != expected {
            return Err(TrackerError::SchemaMismatch {
                expected,
                found: table.width(),
            });
        }
        if let Some(wide) = table.rows().iter().find(|r| r.len() > expected) {
            return Err(TrackerError::SchemaMismatch {
                expected,
                found: wide.len(),
            });
        }
        Ok(())
    }
}

/// Normalize against the canonical ten-column schema.
pub fn normalize(table: &RawTable) -> Result<CleanedDataset> {
    Normalizer::default().normalize(table)
}

// ── Row binding ───────────────────────────────────────────────────────────────

enum Rejection {
    MissingRequired,
    UnparseableDate,
}

/// A raw row viewed through the schema; cells past the row's end are blank.
struct BoundRow<'a> {
    schema: LogicalSchema,
    cells: &'a [Cell],
}

impl<'a> BoundRow<'a> {
    fn new(schema: LogicalSchema, cells: &'a [Cell]) -> Self {
        Self { schema, cells }
    }

    fn get(&self, field: Field) -> &'a Cell {
        self.schema
            .position(field)
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&BLANK)
    }

    fn text(&self, field: Field) -> Option<String> {
        self.get(field).to_text()
    }

    fn into_normalized(self) -> std::result::Result<NormalizedRow, Rejection> {
        let date_cell = self.get(Field::ApplicationDate);
        let (Some(company), Some(role_title)) =
            (self.text(Field::Company), self.text(Field::RoleTitle))
        else {
            return Err(Rejection::MissingRequired);
        };
        if date_cell.is_empty() {
            return Err(Rejection::MissingRequired);
        }
        let application_date =
            ApplicationDateParser::parse(date_cell).ok_or(Rejection::UnparseableDate)?;

        Ok(NormalizedRow {
            company,
            role_title,
            salary_rate: self.text(Field::SalaryRate),
            job_link: self.text(Field::JobLink),
            application_date,
            is_remote: self.text(Field::IsRemote),
            contact_info: self.text(Field::ContactInfo),
            interview_stage: self.text(Field::InterviewStage),
            interview_info: self.text(Field::InterviewInfo),
            response_status: self.text(Field::ResponseStatus),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use jobtrack_core::models::SchemaVariant;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    fn app(company: &str, role: &str, date: &str, remote: &str, status: &str) -> Vec<Cell> {
        row(&[company, role, "", "", date, remote, "", "", "", status])
    }

    // ── shape ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_table_is_not_an_error() {
        let dataset = normalize(&RawTable::default()).unwrap();
        assert!(dataset.is_empty());

        // Header-only export of the right width.
        let dataset = normalize(&RawTable::new(10, vec![])).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_header_only_table_of_wrong_width_is_schema_mismatch() {
        let err = normalize(&RawTable::new(4, vec![])).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::SchemaMismatch {
                expected: 10,
                found: 4
            }
        ));

        let referral = Normalizer::new(LogicalSchema::for_variant(SchemaVariant::WithReferral));
        assert!(referral.normalize(&RawTable::new(10, vec![])).is_err());
        assert!(referral.normalize(&RawTable::new(11, vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_narrow_table_is_schema_mismatch() {
        let table = RawTable::new(9, vec![row(&["Acme"; 9])]);
        let err = normalize(&table).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::SchemaMismatch {
                expected: 10,
                found: 9
            }
        ));
    }

    #[test]
    fn test_wide_table_is_schema_mismatch() {
        let table = RawTable::from_rows(vec![row(&["x"; 11])]);
        let err = normalize(&table).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::SchemaMismatch {
                expected: 10,
                found: 11
            }
        ));
    }

    #[test]
    fn test_overlong_row_is_schema_mismatch() {
        let mut long = app("Acme", "Engineer", "2024-03-01", "Yes", "");
        long.push(Cell::from("extra"));
        let table = RawTable::new(
            10,
            vec![app("Beta", "Analyst", "2024-03-01", "No", ""), long],
        );
        assert!(normalize(&table).is_err());
    }

    #[test]
    fn test_short_rows_are_padded_with_blanks() {
        let table = RawTable::new(10, vec![row(&["Acme", "Engineer", "", "", "2024-03-01"])]);
        let dataset = normalize(&table).unwrap();

        assert_eq!(dataset.len(), 1);
        let r = &dataset.rows()[0];
        assert_eq!(r.is_remote, None);
        assert_eq!(r.response_status, None);
    }

    // ── binding ───────────────────────────────────────────────────────────────

    #[test]
    fn test_fields_bound_by_position() {
        let table = RawTable::new(
            10,
            vec![row(&[
                "Acme",
                "Engineer",
                "$60/hr",
                "https://jobs.example/1",
                "03/15/2024",
                "Yes",
                "jane@acme.test",
                "Phone screen",
                "Went well",
                "Waiting...",
            ])],
        );
        let dataset = normalize(&table).unwrap();
        let r = &dataset.rows()[0];

        assert_eq!(r.company, "Acme");
        assert_eq!(r.role_title, "Engineer");
        assert_eq!(r.salary_rate.as_deref(), Some("$60/hr"));
        assert_eq!(r.job_link.as_deref(), Some("https://jobs.example/1"));
        assert_eq!(r.application_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(r.is_remote.as_deref(), Some("Yes"));
        assert_eq!(r.contact_info.as_deref(), Some("jane@acme.test"));
        assert_eq!(r.interview_stage.as_deref(), Some("Phone screen"));
        assert_eq!(r.interview_info.as_deref(), Some("Went well"));
        assert_eq!(r.response_status.as_deref(), Some("Waiting..."));
    }

    #[test]
    fn test_referral_column_is_ignored() {
        let schema = LogicalSchema::for_variant(SchemaVariant::WithReferral);
        let table = RawTable::new(
            11,
            vec![row(&[
                "Acme", "Engineer", "", "", "2024-03-01", "No", "Yes", "", "", "", "Rejected",
            ])],
        );
        let dataset = Normalizer::new(schema).normalize(&table).unwrap();
        let r = &dataset.rows()[0];

        assert_eq!(r.is_remote.as_deref(), Some("No"));
        assert_eq!(r.contact_info, None);
        assert_eq!(r.response_status.as_deref(), Some("Rejected"));
    }

    #[test]
    fn test_referral_layout_rejected_by_canonical_schema() {
        let table = RawTable::new(11, vec![row(&["x"; 11])]);
        assert!(matches!(
            normalize(&table),
            Err(TrackerError::SchemaMismatch { expected: 10, .. })
        ));
    }

    // ── filtering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_missing_required_fields_are_excluded() {
        let table = RawTable::new(
            10,
            vec![
                app("", "Engineer", "2024-03-01", "Yes", ""),
                app("Acme", "   ", "2024-03-01", "Yes", ""),
                app("Acme", "Engineer", "", "Yes", ""),
                app("Acme", "Engineer", "2024-03-01", "Yes", ""),
            ],
        );
        let normalized = Normalizer::default().normalize_detailed(&table).unwrap();

        assert_eq!(normalized.dataset.len(), 1);
        assert_eq!(normalized.exclusions.missing_required, 3);
        assert_eq!(normalized.exclusions.unparseable_date, 0);
    }

    #[test]
    fn test_unparseable_dates_are_excluded() {
        let table = RawTable::new(
            10,
            vec![
                app("Acme", "Engineer", "not-a-date", "Yes", ""),
                app("Beta", "Analyst", "2024-04-02", "No", ""),
            ],
        );
        let normalized = Normalizer::default().normalize_detailed(&table).unwrap();

        assert_eq!(normalized.dataset.len(), 1);
        assert_eq!(normalized.dataset.rows()[0].company, "Beta");
        assert_eq!(normalized.exclusions.unparseable_date, 1);
        assert_eq!(normalized.exclusions.total(), 1);
    }

    #[test]
    fn test_all_dates_unparseable_yields_empty_dataset() {
        let table = RawTable::new(
            10,
            vec![
                app("Acme", "Engineer", "soon", "Yes", ""),
                app("Beta", "Analyst", "yesterday", "No", ""),
            ],
        );
        let dataset = normalize(&table).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_numeric_cells() {
        let mut cells = app("", "Engineer", "", "Yes", "");
        cells[0] = Cell::Number(3.0);
        cells[4] = Cell::Number(45352.0);
        let dataset = normalize(&RawTable::new(10, vec![cells])).unwrap();

        let r = &dataset.rows()[0];
        assert_eq!(r.company, "3");
        assert_eq!(r.application_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_input_order_preserved() {
        let table = RawTable::new(
            10,
            vec![
                app("Gamma", "A", "2024-05-01", "", ""),
                app("Alpha", "B", "2024-01-01", "", ""),
                app("Beta", "C", "2024-03-01", "", ""),
            ],
        );
        let companies: Vec<String> = normalize(&table)
            .unwrap()
            .into_rows()
            .into_iter()
            .map(|r| r.company)
            .collect();
        assert_eq!(companies, vec!["Gamma", "Alpha", "Beta"]);
    }
}
