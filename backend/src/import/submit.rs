//! Batch submitter: one bulk-create call for the valid rows of an import.
//!
//! Outcomes are partitioned into valid and invalid sets with original row
//! order preserved. The valid records go to the storage actor in a single
//! call; there is no partial-success bookkeeping, so a failed call leaves the
//! whole batch unsubmitted and the identical submission can be retried.

use serde::{Deserialize, Serialize};

use crate::error::SubmitResult;
use crate::import::pipeline::ValidationOutcome;
use crate::store::ResourceStore;

/// One rejected row in the final summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailedRow {
    /// 1-based source line number.
    pub row: usize,
    pub errors: Vec<String>,
}

/// Aggregate report for one completed import operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// All rows seen, valid and invalid.
    pub total: usize,
    /// Rows submitted to the storage actor.
    pub success: usize,
    /// Rows skipped due to validation errors.
    pub failed: usize,
    /// Rejected rows in original order.
    pub failed_rows: Vec<FailedRow>,
}

/// Submit the valid records of `outcomes` in one bulk-create call.
///
/// Returns `Ok(None)` without touching the store when no row is valid — the
/// caller skips the summary step in that case. A store failure propagates as
/// [`crate::error::SubmitError`] with no summary produced.
pub async fn submit_outcomes<S: ResourceStore>(
    outcomes: &[ValidationOutcome],
    store: &S,
) -> SubmitResult<Option<ImportSummary>> {
    let records: Vec<_> = outcomes.iter().filter_map(|o| o.record.clone()).collect();
    let failed_rows: Vec<FailedRow> = outcomes
        .iter()
        .filter(|o| !o.errors.is_empty())
        .map(|o| FailedRow { row: o.line, errors: o.errors.clone() })
        .collect();

    if records.is_empty() {
        return Ok(None);
    }

    let success = records.len();
    store.bulk_create_resources(records).await?;

    Ok(Some(ImportSummary {
        total: outcomes.len(),
        success,
        failed: failed_rows.len(),
        failed_rows,
    }))
}
