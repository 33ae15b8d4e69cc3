//! REST API types for the TeamTrack frontend.
//!
//! Responses use camelCase throughout, matching the storage actor's record
//! format so the frontend handles one naming convention only.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::import::pipeline::ParsedImport;
use crate::import::submit::{FailedRow, ImportSummary};
use crate::models::{UserProfile, UserRole};

/// One previewed row of an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreviewRow {
    /// 1-based source line number.
    pub line: usize,
    /// Trimmed header -> trimmed cell.
    pub cells: HashMap<String, String>,
    pub errors: Vec<String>,
    pub valid: bool,
}

/// Aggregate counts for a previewed upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Response to `POST /api/resources/import`.
///
/// `summary` is present only when the request committed and a submission
/// actually ran (an all-invalid upload commits nothing).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// Unique job identifier.
    pub job_id: String,

    /// "ready" when every row validated, "warning" otherwise.
    pub status: String,

    /// Trimmed header names, in file order.
    pub headers: Vec<String>,

    pub rows: Vec<ImportPreviewRow>,
    pub stats: ImportStats,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ImportSummaryBody>,
}

/// Wire form of [`ImportSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummaryBody {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub failed_rows: Vec<FailedRow>,
}

impl From<&ImportSummary> for ImportSummaryBody {
    fn from(summary: &ImportSummary) -> Self {
        Self {
            total: summary.total,
            success: summary.success,
            failed: summary.failed,
            failed_rows: summary.failed_rows.clone(),
        }
    }
}

impl ImportResponse {
    pub fn from_parts(parsed: &ParsedImport, summary: Option<&ImportSummary>) -> Self {
        let valid = parsed.valid_count();
        let invalid = parsed.invalid_count();

        Self {
            job_id: Uuid::new_v4().to_string(),
            status: if invalid == 0 { "ready" } else { "warning" }.to_string(),
            headers: parsed.headers.iter().map(|h| h.trim().to_string()).collect(),
            rows: parsed
                .rows
                .iter()
                .map(|outcome| ImportPreviewRow {
                    line: outcome.line,
                    cells: outcome.cells.clone(),
                    errors: outcome.errors.clone(),
                    valid: outcome.is_valid(),
                })
                .collect(),
            stats: ImportStats { total: parsed.rows.len(), valid, invalid },
            summary: summary.map(ImportSummaryBody::from),
        }
    }
}

/// Request body for `POST /api/auth/demo-login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoLoginRequest {
    pub role: UserRole,
}

/// Response to a successful demo login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub profile: UserProfile,
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_and_validate;

    #[test]
    fn test_preview_response_counts() {
        let csv = "Employee ID,Name,Email ID\nEMP001,Alice,alice@x.com\n,,missing@x.com";
        let parsed = parse_and_validate(csv.as_bytes(), "staff.csv").unwrap();
        let response = ImportResponse::from_parts(&parsed, None);

        assert_eq!(response.status, "warning");
        assert_eq!(response.stats.total, 2);
        assert_eq!(response.stats.valid, 1);
        assert_eq!(response.stats.invalid, 1);
        assert!(response.rows[0].valid);
        assert!(!response.rows[1].valid);
        assert!(response.summary.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["stats"]["total"], 2);
        assert!(json.get("summary").is_none());
        assert_eq!(json["jobId"].as_str().unwrap().len(), 36);
    }

    #[test]
    fn test_all_valid_is_ready() {
        let csv = "Employee ID,Name,Email ID\nEMP001,Alice,alice@x.com";
        let parsed = parse_and_validate(csv.as_bytes(), "staff.csv").unwrap();
        let response = ImportResponse::from_parts(&parsed, None);
        assert_eq!(response.status, "ready");
    }
}
