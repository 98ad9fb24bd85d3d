use std::collections::BTreeMap;
use std::fmt::Write;

use crate::models::{AnalysisSummary, LogicalSchema, SchemaVariant};

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use jobtrack_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Calculate `(part / whole) * 100`, rounded to one decimal place.
///
/// Returns `0.0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use jobtrack_core::formatting::share;
///
/// assert!((share(1, 4) - 25.0).abs() < 1e-9);
/// assert_eq!(share(3, 0), 0.0);
/// ```
pub fn share(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = (part as f64 / whole as f64) * 100.0;
    (raw * 10.0).round() / 10.0
}

/// Order a frequency map by descending count, ties broken by key.
pub fn ranked(map: &BTreeMap<String, u64>) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

/// One-line description of a column layout, e.g.
/// `canonical (10 columns: Company, RoleTitle, ...)`.
pub fn describe_layout(variant: SchemaVariant) -> String {
    let schema = LogicalSchema::for_variant(variant);
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name()).collect();
    format!(
        "{} ({} columns: {})",
        variant.as_str(),
        schema.width(),
        names.join(", ")
    )
}

/// Render the plain-text report printed by the CLI.
///
/// Months are listed chronologically; companies and roles by frequency.
pub fn render_summary(summary: &AnalysisSummary) -> String {
    let total = summary.total_applications;
    let mut out = String::new();

    let _ = writeln!(out, "Job Application Summary");
    let _ = writeln!(out, "=======================");
    let _ = writeln!(out, "{:<24}{:>8}", "Total applications", format_count(total));
    write_counter(&mut out, "Remote", summary.remote_applications, total);
    write_counter(&mut out, "Onsite", summary.onsite_applications, total);
    write_counter(&mut out, "Pending", summary.pending_applications, total);
    write_counter(&mut out, "Rejected", summary.rejected_applications, total);
    write_counter(
        &mut out,
        "No longer available",
        summary.not_available_applications,
        total,
    );

    let by_month: Vec<(&str, u64)> = summary
        .applications_by_month
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    write_section(&mut out, "By month", &by_month);
    write_section(&mut out, "By company", &ranked(&summary.applications_by_company));
    write_section(&mut out, "By role", &ranked(&summary.applications_by_role_title));

    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn write_counter(out: &mut String, label: &str, count: u64, total: u64) {
    let _ = writeln!(
        out,
        "  {:<22}{:>8}  ({:.1}%)",
        label,
        format_count(count),
        share(count, total)
    );
}

fn write_section(out: &mut String, title: &str, entries: &[(&str, u64)]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", title);
    if entries.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    for (key, count) in entries {
        let _ = writeln!(out, "  {:<30}{:>8}", key, format_count(*count));
    }
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
