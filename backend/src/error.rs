//! Error types for the TeamTrack import pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ParseError`] - tabular input errors (fatal to the whole import)
//! - [`StoreError`] - storage actor call failures
//! - [`SubmitError`] - bulk submission failures (retryable)
//! - [`ImportError`] - top-level orchestration errors
//! - [`SessionError`] - session lookup and authorization failures
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Row-level validation problems are deliberately NOT errors: they are
//! collected as plain messages on the row's outcome, and the batch proceeds.

use thiserror::Error;

// =============================================================================
// Parse Errors
// =============================================================================

/// Errors while turning an uploaded file into headers and rows.
///
/// Any of these is fatal to the import: no row is mapped or validated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// Nothing to parse: no header row could be read.
    #[error("the file is empty or has no header row")]
    Empty,

    /// One or more of the required columns is absent from the header row.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// File extension does not select a supported parser mode.
    #[error("unsupported file format: '{0}' (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),

    /// Workbook could not be decoded.
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),
}

// =============================================================================
// Storage Actor Errors
// =============================================================================

/// Errors from the storage actor client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure.
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage actor answered with a non-success status.
    #[error("storage actor returned HTTP {0}")]
    Status(u16),
}

// =============================================================================
// Submit Errors
// =============================================================================

/// Failure of the single bulk-create call.
///
/// Fatal to the batch: no rows were stored and no summary exists. The same
/// submission may be retried unchanged once the transient condition clears.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("bulk create failed: {0}")]
    Store(#[from] StoreError),
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Top-level import orchestration errors.
///
/// Returned by [`crate::import::pipeline::run_import`]; wraps the fatal
/// error classes of the two pipeline stages.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("submit error: {0}")]
    Submit(#[from] SubmitError),
}

// =============================================================================
// Session Errors
// =============================================================================

/// Session lookup and authorization failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    /// No session exists for the presented token.
    #[error("invalid or expired session token")]
    InvalidToken,

    /// The session's role does not permit the requested operation.
    #[error("role '{0}' is not permitted to manage resources")]
    Forbidden(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for storage actor calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for bulk submissions.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Result type for import orchestration.
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_all() {
        let err = ParseError::MissingColumns(vec!["Employee ID".into(), "Email ID".into()]);
        let msg = err.to_string();
        assert!(msg.contains("Employee ID"));
        assert!(msg.contains("Email ID"));
    }

    #[test]
    fn test_error_conversion_chain() {
        // ParseError -> ImportError
        let parse_err = ParseError::Empty;
        let import_err: ImportError = parse_err.into();
        assert!(import_err.to_string().contains("empty"));

        // StoreError -> SubmitError -> ImportError
        let store_err = StoreError::Status(503);
        let submit_err: SubmitError = store_err.into();
        let import_err: ImportError = submit_err.into();
        assert!(import_err.to_string().contains("503"));
    }
}
