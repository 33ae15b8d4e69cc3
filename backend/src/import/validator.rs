//! Row validator: human-readable error messages for one mapped row.
//!
//! Two rule classes only:
//!
//! - required fields: Employee ID, Name and Email ID must be non-empty;
//! - cross-field: a non-billable row must carry a recognized category.
//!
//! There is no email-format check, no duplicate-identifier check and no
//! cross-row consistency check; duplicate employee codes across rows pass
//! through untouched.

use crate::import::mapper::MappedRow;

pub const ERR_EMPLOYEE_ID_REQUIRED: &str = "Employee ID is required";
pub const ERR_NAME_REQUIRED: &str = "Name is required";
pub const ERR_EMAIL_REQUIRED: &str = "Email ID is required";

/// Validate one mapped row, returning its (possibly empty) error list.
///
/// The category rule consumes the mapper's resolution result directly — the
/// raw cell is never re-inspected here.
pub fn validate_row(row: &MappedRow) -> Vec<String> {
    let mut errors = Vec::new();

    if row.record.employee_id.is_empty() {
        errors.push(ERR_EMPLOYEE_ID_REQUIRED.to_string());
    }
    if row.record.name.is_empty() {
        errors.push(ERR_NAME_REQUIRED.to_string());
    }
    if row.record.email.is_empty() {
        errors.push(ERR_EMAIL_REQUIRED.to_string());
    }
    if let Err(rejection) = &row.category {
        errors.push(rejection.to_string());
    }

    errors
}
