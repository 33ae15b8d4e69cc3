//! High-level import pipeline: upload bytes in, validated outcomes out.
//!
//! Per import operation the flow is a straight line with one suspension
//! point:
//!
//! ```text
//! Idle -> Parsing -> ParseError (terminal)
//!                 -> Parsed -> Submitting -> SubmitError (terminal, retryable)
//!                                         -> Complete(summary)
//! ```
//!
//! The stages are encoded in the type flow `&[u8]` -> [`ParsedImport`] ->
//! [`ImportSummary`]: a summary cannot exist without a successful parse, and
//! a failed submission leaves the parsed rows untouched so the identical
//! submission can be retried. There is no cancellation; an in-flight
//! submission runs to completion or failure. Each invocation owns its row
//! set — concurrent imports share no mutable state.

use std::collections::HashMap;

use crate::api::logs::{log_info, log_success, log_warning};
use crate::error::{ImportResult, ParseResult};
use crate::import::mapper::map_row;
use crate::import::parser::parse_upload;
use crate::import::submit::{submit_outcomes, ImportSummary};
use crate::import::validator::validate_row;
use crate::models::Resource;
use crate::store::ResourceStore;

/// Per-row result of the mapping and validation stages.
///
/// `record` is present iff `errors` is empty.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// 1-based source line number.
    pub line: usize,
    /// Trimmed header -> trimmed cell, for the preview table.
    pub cells: HashMap<String, String>,
    pub errors: Vec<String>,
    pub record: Option<Resource>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A fully parsed and validated upload, ready for submission.
#[derive(Debug, Clone)]
pub struct ParsedImport {
    pub headers: Vec<String>,
    pub rows: Vec<ValidationOutcome>,
}

impl ParsedImport {
    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.rows.len() - self.valid_count()
    }
}

/// Parse an uploaded file and run every row through mapping and validation.
///
/// Fails only on [`crate::error::ParseError`] (empty input, unsupported
/// format, missing required columns); row-level problems land on the
/// individual outcomes.
pub fn parse_and_validate(bytes: &[u8], file_name: &str) -> ParseResult<ParsedImport> {
    let sheet = parse_upload(bytes, file_name)?;

    let rows = sheet
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mapped = map_row(&sheet.headers, row, i + 2);
            let errors = validate_row(&mapped);
            let record = errors.is_empty().then_some(mapped.record);
            ValidationOutcome { line: mapped.line, cells: mapped.cells, errors, record }
        })
        .collect();

    Ok(ParsedImport { headers: sheet.headers, rows })
}

/// Run a complete import operation: parse, validate, and submit the valid
/// rows to the storage actor.
///
/// Returns the parsed rows together with the summary; the summary is `None`
/// when no row was valid and submission was skipped.
pub async fn run_import<S: ResourceStore>(
    bytes: &[u8],
    file_name: &str,
    store: &S,
) -> ImportResult<(ParsedImport, Option<ImportSummary>)> {
    log_info(format!("Parsing {file_name} ({} bytes)", bytes.len()));
    let parsed = parse_and_validate(bytes, file_name)?;

    let valid = parsed.valid_count();
    let invalid = parsed.invalid_count();
    log_success(format!("Parsed {} rows: {valid} valid, {invalid} with errors", parsed.rows.len()));

    let summary = submit_outcomes(&parsed.rows, store).await?;
    match &summary {
        Some(s) => log_success(format!("Imported {} of {} records", s.success, s.total)),
        None => log_warning("No valid records to import; submission skipped"),
    }

    Ok((parsed, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillabilityStatus, NonBillableStatus};

    const FULL_HEADER: &str = "Employee ID,Name,Email ID,Contact Number,Location,Client,Project,\
Project ID,Project Manager,Reporting Manager,Delivery Head,Billability Status,\
Non-Billable Category,Total Experience,DOJ,Assignment Start Date,Assignment End Date,\
Practice,Primary Skills,Secondary Skills,Status";

    #[test]
    fn test_scenario_billable_row_maps_clean() {
        let csv = format!(
            "{FULL_HEADER}\nEMP001,John Smith,john@x.com,+91-9876543210,Bangalore,Acme Corp,\
Digital Transformation,PRJ-001,Alice Johnson,Bob Williams,Carol Davis,Billable,,5 years,\
2020-01-15,2024-01-01,2024-12-31,Engineering,Java;Spring Boot,Docker;AWS,Active"
        );
        let parsed = parse_and_validate(csv.as_bytes(), "staff.csv").unwrap();

        assert_eq!(parsed.rows.len(), 1);
        let outcome = &parsed.rows[0];
        assert!(outcome.errors.is_empty());
        let record = outcome.record.as_ref().unwrap();
        assert_eq!(record.billability_status, BillabilityStatus::Billable);
        assert_eq!(record.non_billable_status, None);
        assert_eq!(record.project_id.as_deref(), Some("PRJ-001"));
        assert_eq!(record.primary_skills, vec!["Java", "Spring Boot"]);
    }

    #[test]
    fn test_scenario_bogus_category_rejects_row() {
        let csv = format!(
            "{FULL_HEADER}\nEMP001,John Smith,john@x.com,,,,,,,,,Non-Billable,Bogus Value,,,,,,,,"
        );
        let parsed = parse_and_validate(csv.as_bytes(), "staff.csv").unwrap();

        let outcome = &parsed.rows[0];
        assert!(!outcome.errors.is_empty());
        assert!(outcome.errors[0].contains("Category"));
        assert!(outcome.record.is_none());
    }

    #[test]
    fn test_recognized_category_lands_in_record() {
        let csv = format!(
            "{FULL_HEADER}\nEMP002,Priya Sharma,priya@x.com,,,,,,,,,Non-Billable,\
Available for Deployment,,,,,,,,"
        );
        let parsed = parse_and_validate(csv.as_bytes(), "staff.csv").unwrap();

        let record = parsed.rows[0].record.as_ref().unwrap();
        assert_eq!(record.billability_status, BillabilityStatus::NonBillable);
        assert_eq!(
            record.non_billable_status,
            Some(NonBillableStatus::AvailableForDeployment)
        );
    }

    #[test]
    fn test_record_presence_matches_error_list() {
        let csv = format!(
            "{FULL_HEADER}\nEMP001,John,j@x.com,,,,,,,,,Billable,,,,,,,,,\n\
,,missing@x.com,,,,,,,,,Billable,,,,,,,,,"
        );
        let parsed = parse_and_validate(csv.as_bytes(), "staff.csv").unwrap();

        for outcome in &parsed.rows {
            assert_eq!(outcome.errors.is_empty(), outcome.record.is_some());
        }
        assert_eq!(parsed.valid_count(), 1);
        assert_eq!(parsed.invalid_count(), 1);
    }

    #[test]
    fn test_parse_twice_identical_except_ids() {
        let csv = format!("{FULL_HEADER}\nEMP001,John,j@x.com,,,,,,,,,Billable,,,,,,,,,");
        let first = parse_and_validate(csv.as_bytes(), "staff.csv").unwrap();
        let second = parse_and_validate(csv.as_bytes(), "staff.csv").unwrap();

        assert_eq!(first.headers, second.headers);
        assert_eq!(first.rows[0].cells, second.rows[0].cells);
        assert_eq!(first.rows[0].errors, second.rows[0].errors);

        let a = first.rows[0].record.as_ref().unwrap();
        let b = second.rows[0].record.as_ref().unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.employee_id, b.employee_id);
    }

    #[test]
    fn test_line_numbers_start_at_two() {
        let csv = format!("{FULL_HEADER}\nEMP001,A,a@x.com\nEMP002,B,b@x.com");
        let parsed = parse_and_validate(csv.as_bytes(), "staff.csv").unwrap();
        assert_eq!(parsed.rows[0].line, 2);
        assert_eq!(parsed.rows[1].line, 3);
    }
}
