//! Bulk-import pipeline.
//!
//! Raw file bytes flow through four stages:
//!
//! ```text
//! bytes -> parser -> (headers, rows) -> mapper -> validator -> submit
//! ```
//!
//! [`parser`] turns delimited text or a workbook into string cells,
//! [`mapper`] derives typed candidate records, [`validator`] produces the
//! per-row error lists, and [`submit`] sends the valid set to the storage
//! actor in one bulk call. [`pipeline`] wires the stages together.

pub mod mapper;
pub mod parser;
pub mod pipeline;
pub mod submit;
pub mod validator;

pub use parser::{FileKind, SheetData, REQUIRED_COLUMNS};
pub use pipeline::{parse_and_validate, run_import, ParsedImport, ValidationOutcome};
pub use submit::{submit_outcomes, FailedRow, ImportSummary};
