//! # TeamTrack backend - resource bulk import and export
//!
//! TeamTrack tracks employees ("resources"), projects and logged hours; this
//! crate is the backend for its bulk-import workflow: uploaded CSV/XLSX files
//! are parsed, mapped to typed records, validated row by row, and the valid
//! set is submitted to the external storage actor in a single bulk call.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV/XLSX   │────▶│   Parser    │────▶│   Mapper +  │────▶│   Batch     │
//! │   upload    │     │ (ext-keyed) │     │  Validator  │     │  Submitter  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                                    │
//!                                                         storage actor (external)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use teamtrack::import::run_import;
//! use teamtrack::store::InMemoryResourceStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryResourceStore::new();
//!     let bytes = std::fs::read("staff.csv").unwrap();
//!     let (parsed, summary) = run_import(&bytes, "staff.csv", &store).await.unwrap();
//!     println!("{} of {} rows imported", parsed.valid_count(), parsed.rows.len());
//!     let _ = summary;
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Resource, status enums, user identity)
//! - [`import`] - Parser, mapper, validator, submitter, pipeline
//! - [`export`] - Import template and CSV export
//! - [`store`] - Storage actor clients
//! - [`session`] - Demo session context
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Import pipeline
pub mod import;

// Template & export
pub mod export;

// Storage actor clients
pub mod store;

// Session context
pub mod session;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ImportError, ParseError, SessionError, StoreError, SubmitError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    BillabilityStatus, CategoryRejection, NonBillableStatus, Resource, ResourceStatus, Time,
    UserProfile, UserRole,
};

// =============================================================================
// Re-exports - Import pipeline
// =============================================================================

pub use import::{
    parse_and_validate, run_import, submit_outcomes, FailedRow, FileKind, ImportSummary,
    ParsedImport, SheetData, ValidationOutcome, REQUIRED_COLUMNS,
};

// =============================================================================
// Re-exports - Template & export
// =============================================================================

pub use export::{
    export_file_name, resources_to_csv, sample_template_csv, COLUMN_HEADERS, TEMPLATE_FILE_NAME,
};

// =============================================================================
// Re-exports - Stores & sessions
// =============================================================================

pub use session::SessionStore;
pub use store::{AnyStore, HttpResourceStore, InMemoryResourceStore, ResourceStore};

// Server
pub mod server {
    pub use crate::api::server::{start_server, AppState};
}
