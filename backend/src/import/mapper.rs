//! Field mapper: one raw row to a typed candidate [`Resource`].
//!
//! Headers are paired positionally with cells (both trimmed, missing cells
//! become empty strings), then each typed field is derived with the lenient
//! parsers from [`crate::models`]. Mapping never fails: garbled enum cells
//! fall through to documented defaults, unparseable dates become the epoch
//! sentinel, and the one condition worth reporting — an unresolvable
//! non-billable category — is carried as a typed rejection for the validator
//! to surface.

use chrono::{NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{
    BillabilityStatus, CategoryRejection, NonBillableStatus, Resource, ResourceStatus, Time,
};

/// Date formats accepted for DOJ and assignment dates, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// A raw row mapped to candidate fields.
#[derive(Debug, Clone)]
pub struct MappedRow {
    /// 1-based source line number, for error reporting.
    pub line: usize,
    /// Trimmed header -> trimmed cell, used for the preview table.
    pub cells: HashMap<String, String>,
    /// Candidate record; only attached to the outcome when validation passes.
    pub record: Resource,
    /// Category resolution result, shared with the row validator.
    pub category: Result<Option<NonBillableStatus>, CategoryRejection>,
}

/// Map one raw row to candidate fields.
pub fn map_row(headers: &[String], row: &[String], line: usize) -> MappedRow {
    let mut cells = HashMap::new();
    for (i, header) in headers.iter().enumerate() {
        let value = row.get(i).map(|c| c.trim()).unwrap_or("");
        cells.insert(header.trim().to_string(), value.to_string());
    }

    let get = |key: &str| cells.get(key).cloned().unwrap_or_default();

    let billability_status = BillabilityStatus::parse(&get("Billability Status"));
    let category = match billability_status {
        BillabilityStatus::NonBillable => {
            NonBillableStatus::resolve(&get("Non-Billable Category")).map(Some)
        }
        // Billable rows ignore the category cell entirely.
        BillabilityStatus::Billable => Ok(None),
    };

    let project_id = match get("Project ID") {
        id if id.is_empty() => None,
        id => Some(id),
    };

    let record = Resource {
        id: generate_resource_id(),
        employee_id: get("Employee ID"),
        name: get("Name"),
        email: get("Email ID"),
        contact_number: get("Contact Number"),
        location: get("Location"),
        client: get("Client"),
        project: get("Project"),
        project_id,
        project_manager: get("Project Manager"),
        reporting_manager: get("Reporting Manager"),
        delivery_head: get("Delivery Head"),
        billability_status,
        non_billable_status: category.clone().unwrap_or(None),
        total_experience: get("Total Experience"),
        doj: parse_time(&get("DOJ")),
        assignment_start_date: parse_time(&get("Assignment Start Date")),
        assignment_end_date: parse_time(&get("Assignment End Date")),
        practice: get("Practice"),
        primary_skills: parse_skills(&get("Primary Skills")),
        secondary_skills: parse_skills(&get("Secondary Skills")),
        status: ResourceStatus::parse(&get("Status")),
        role: String::new(),
        department: String::new(),
        skill_tags: Vec::new(),
    };

    MappedRow { line, cells, record, category }
}

/// Parse a date cell to [`Time`] nanoseconds (midnight UTC).
///
/// Empty or unparseable cells map to the `0` sentinel rather than failing
/// the row.
pub fn parse_time(raw: &str) -> Time {
    let value = raw.trim();
    if value.is_empty() {
        return 0;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date
                .and_time(NaiveTime::MIN)
                .and_utc()
                .timestamp_nanos_opt()
                .unwrap_or(0);
        }
    }
    0
}

/// Split a skills cell on semicolons, trimming segments and dropping empties.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Generate a fresh opaque record identifier: millisecond timestamp plus a
/// random suffix, unique within a batch with overwhelming probability.
pub fn generate_resource_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(7).collect();
    format!("res_{millis}_{suffix}")
}
