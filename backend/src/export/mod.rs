//! Template generation and CSV export.
//!
//! Both artifacts share the fixed 21-column order of the RMG template. The
//! downloadable template carries three illustrative sample rows and is
//! byte-stable: existing user documentation refers to its exact content.
//! Export is the inverse of the field mapper: enums back to their human
//! labels, times back to `YYYY-MM-DD`, skill lists re-joined with
//! semicolons.

use chrono::{TimeZone, Utc};

use crate::models::{Resource, Time};

/// Full ordered column headers of the RMG template.
pub const COLUMN_HEADERS: [&str; 21] = [
    "Employee ID",
    "Name",
    "Email ID",
    "Contact Number",
    "Location",
    "Client",
    "Project",
    "Project ID",
    "Project Manager",
    "Reporting Manager",
    "Delivery Head",
    "Billability Status",
    "Non-Billable Category",
    "Total Experience",
    "DOJ",
    "Assignment Start Date",
    "Assignment End Date",
    "Practice",
    "Primary Skills",
    "Secondary Skills",
    "Status",
];

/// Sample rows shipped with the downloadable template.
const SAMPLE_ROWS: [[&str; 21]; 3] = [
    [
        "EMP001",
        "John Smith",
        "john.smith@company.com",
        "+91-9876543210",
        "Bangalore",
        "Acme Corp",
        "Digital Transformation",
        "PRJ-001",
        "Alice Johnson",
        "Bob Williams",
        "Carol Davis",
        "Billable",
        "",
        "5 years",
        "2020-01-15",
        "2024-01-01",
        "2024-12-31",
        "Engineering",
        "Java;Spring Boot;Microservices",
        "Docker;Kubernetes;AWS",
        "Active",
    ],
    [
        "EMP002",
        "Priya Sharma",
        "priya.sharma@company.com",
        "+91-9876543211",
        "Hyderabad",
        "",
        "",
        "",
        "Alice Johnson",
        "Bob Williams",
        "Carol Davis",
        "Non-Billable",
        "Available for Deployment",
        "3 years",
        "2021-06-01",
        "2024-01-01",
        "2024-06-30",
        "QA",
        "Automation Testing;Selenium;Java",
        "Jenkins;Azure DevOps",
        "Active",
    ],
    [
        "EMP003",
        "Rahul Verma",
        "rahul.verma@company.com",
        "+91-9876543212",
        "Mumbai",
        "Beta Ltd",
        "UI Modernization",
        "PRJ-002",
        "David Lee",
        "Eve Martin",
        "Frank Wilson",
        "Billable",
        "",
        "7 years",
        "2018-03-10",
        "2024-02-01",
        "2024-11-30",
        "Frontend",
        "UI;UX;React;TypeScript",
        "Figma;Adobe XD",
        "Active",
    ],
];

/// File name offered for the downloadable template.
pub const TEMPLATE_FILE_NAME: &str = "resource_import_template.csv";

/// Quote a value only when it needs it; embedded quotes are doubled.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn join_row<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cells
        .into_iter()
        .map(|c| escape_csv(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// The downloadable import template: header plus three sample rows.
pub fn sample_template_csv() -> String {
    let mut lines = vec![join_row(COLUMN_HEADERS)];
    lines.extend(SAMPLE_ROWS.iter().map(join_row));
    lines.join("\n")
}

/// Format a [`Time`] for export; the `0` sentinel exports as empty.
pub fn format_time(time: Time) -> String {
    if time == 0 {
        return String::new();
    }
    Utc.timestamp_nanos(time).format("%Y-%m-%d").to_string()
}

/// One export row in template column order.
pub fn resource_to_row(resource: &Resource) -> Vec<String> {
    vec![
        resource.employee_id.clone(),
        resource.name.clone(),
        resource.email.clone(),
        resource.contact_number.clone(),
        resource.location.clone(),
        resource.client.clone(),
        resource.project.clone(),
        resource.project_id.clone().unwrap_or_default(),
        resource.project_manager.clone(),
        resource.reporting_manager.clone(),
        resource.delivery_head.clone(),
        resource.billability_status.label().to_string(),
        resource
            .non_billable_status
            .map(|s| s.label().to_string())
            .unwrap_or_default(),
        resource.total_experience.clone(),
        format_time(resource.doj),
        format_time(resource.assignment_start_date),
        format_time(resource.assignment_end_date),
        resource.practice.clone(),
        resource.primary_skills.join(";"),
        resource.secondary_skills.join(";"),
        resource.status.label().to_string(),
    ]
}

/// Export records as CSV in template column order.
pub fn resources_to_csv(resources: &[Resource]) -> String {
    let mut lines = vec![join_row(COLUMN_HEADERS)];
    lines.extend(resources.iter().map(|r| join_row(resource_to_row(r))));
    lines.join("\n")
}

/// File name offered for an export, stamped with the given date.
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("resources_export_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_and_validate;
    use crate::models::{BillabilityStatus, NonBillableStatus, ResourceStatus};

    #[test]
    fn test_template_header_line() {
        let template = sample_template_csv();
        let first_line = template.lines().next().unwrap();
        assert_eq!(
            first_line,
            "Employee ID,Name,Email ID,Contact Number,Location,Client,Project,Project ID,\
Project Manager,Reporting Manager,Delivery Head,Billability Status,Non-Billable Category,\
Total Experience,DOJ,Assignment Start Date,Assignment End Date,Practice,Primary Skills,\
Secondary Skills,Status"
        );
    }

    #[test]
    fn test_template_shape() {
        let template = sample_template_csv();
        assert_eq!(template.lines().count(), 4);
        assert!(!template.ends_with('\n'));
        assert!(template.contains("EMP001,John Smith,john.smith@company.com"));
        assert!(template.contains("Non-Billable,Available for Deployment"));
    }

    #[test]
    fn test_template_parses_clean_through_the_pipeline() {
        let template = sample_template_csv();
        let parsed = parse_and_validate(template.as_bytes(), TEMPLATE_FILE_NAME).unwrap();
        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(parsed.valid_count(), 3);
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "");
        let time = crate::import::mapper::parse_time("2020-01-15");
        assert_eq!(format_time(time), "2020-01-15");
    }

    #[test]
    fn test_round_trip_preserves_every_field_except_id() {
        let template = sample_template_csv();
        let originals: Vec<_> = parse_and_validate(template.as_bytes(), "seed.csv")
            .unwrap()
            .rows
            .into_iter()
            .filter_map(|o| o.record)
            .collect();

        let exported = resources_to_csv(&originals);
        let reimported: Vec<_> = parse_and_validate(exported.as_bytes(), "export.csv")
            .unwrap()
            .rows
            .into_iter()
            .filter_map(|o| o.record)
            .collect();

        assert_eq!(originals.len(), reimported.len());
        for (a, b) in originals.iter().zip(&reimported) {
            assert_ne!(a.id, b.id);
            let mut b = b.clone();
            b.id = a.id.clone();
            assert_eq!(*a, b);
        }
    }

    #[test]
    fn test_export_row_inverse_mapping() {
        let resource = Resource {
            id: "res_1".into(),
            employee_id: "EMP009".into(),
            name: "Dana, Lee".into(),
            email: "dana@x.com".into(),
            contact_number: String::new(),
            location: "Pune".into(),
            client: String::new(),
            project: String::new(),
            project_id: None,
            project_manager: String::new(),
            reporting_manager: String::new(),
            delivery_head: String::new(),
            billability_status: BillabilityStatus::NonBillable,
            non_billable_status: Some(NonBillableStatus::ProjectBuffer),
            total_experience: "2 years".into(),
            doj: 0,
            assignment_start_date: 0,
            assignment_end_date: 0,
            practice: String::new(),
            primary_skills: vec!["Rust".into(), "SQL".into()],
            secondary_skills: vec![],
            status: ResourceStatus::Inactive,
            role: String::new(),
            department: String::new(),
            skill_tags: vec![],
        };

        let csv = resources_to_csv(&[resource]);
        let data_line = csv.lines().nth(1).unwrap();
        assert!(data_line.contains("\"Dana, Lee\""));
        assert!(data_line.contains("Non-Billable,Project Buffer"));
        assert!(data_line.contains("Rust;SQL"));
        assert!(data_line.ends_with("Inactive"));
    }

    #[test]
    fn test_export_file_name() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "resources_export_2024-03-07.csv");
    }
}
