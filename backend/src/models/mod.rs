//! Domain models for the TeamTrack import pipeline.
//!
//! This module contains the core data structures shared across the pipeline:
//!
//! - [`Resource`] - canonical employee record, wire-compatible with the storage actor
//! - [`BillabilityStatus`] / [`NonBillableStatus`] / [`ResourceStatus`] - closed enums
//!   with lenient parsers for raw spreadsheet cells
//! - [`UserRole`] / [`UserProfile`] - session identity
//!
//! All types serialize in camelCase to match the storage actor's record format.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nanoseconds since the Unix epoch; `0` is the "unset" sentinel.
///
/// Matches the storage actor's `Time` representation.
pub type Time = i64;

// =============================================================================
// Billability
// =============================================================================

/// Whether a resource's time is billed to a client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BillabilityStatus {
    Billable,
    NonBillable,
}

impl BillabilityStatus {
    /// Parse a raw cell value.
    ///
    /// Total function: "billable" (case-insensitive) is billable, every other
    /// value — empty, garbled, anything — falls through to non-billable. The
    /// default arm is the documented lenient behavior, not an accident.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            v if v.eq_ignore_ascii_case("billable") => Self::Billable,
            _ => Self::NonBillable,
        }
    }

    /// Human label used in CSV export and the import template.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Billable => "Billable",
            Self::NonBillable => "Non-Billable",
        }
    }
}

// =============================================================================
// Non-Billable Category
// =============================================================================

/// Sub-category of a non-billable resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NonBillableStatus {
    AvailableForDeployment,
    BiBench,
    PartialBench,
    BenchBlocked,
    Maternity,
    SolutionInvestment,
    DeliverySupport,
    ProjectBuffer,
}

/// Why a raw category cell could not be resolved to a [`NonBillableStatus`].
///
/// Produced once by [`NonBillableStatus::resolve`] and consumed by both the
/// field mapper (which leaves the typed field unset) and the row validator
/// (which surfaces the message) — the two stages never re-derive the
/// condition from raw text independently.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CategoryRejection {
    #[error("Non-Billable Category is required when Billability Status is Non-Billable")]
    Missing,

    #[error("Unrecognized Non-Billable Category: '{0}'")]
    Unrecognized(String),
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

impl NonBillableStatus {
    /// Resolve a raw category cell to a category, or a typed rejection.
    ///
    /// Normalization lowercases and strips all whitespace, so
    /// "Available for Deployment", "availableFORdeployment" and
    /// "available  for  deployment" all resolve to the same variant.
    pub fn resolve(raw: &str) -> Result<Self, CategoryRejection> {
        let normalized = WHITESPACE.replace_all(&raw.to_lowercase(), "").to_string();
        match normalized.as_str() {
            "" => Err(CategoryRejection::Missing),
            "availablefordeployment" => Ok(Self::AvailableForDeployment),
            "bibench" => Ok(Self::BiBench),
            "partialbench" => Ok(Self::PartialBench),
            "benchblocked" => Ok(Self::BenchBlocked),
            "maternity" => Ok(Self::Maternity),
            "solutioninvestment" => Ok(Self::SolutionInvestment),
            "deliverysupport" => Ok(Self::DeliverySupport),
            "projectbuffer" => Ok(Self::ProjectBuffer),
            _ => Err(CategoryRejection::Unrecognized(raw.trim().to_string())),
        }
    }

    /// Human label used in CSV export and the import template.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AvailableForDeployment => "Available for Deployment",
            Self::BiBench => "BI Bench",
            Self::PartialBench => "Partial Bench",
            Self::BenchBlocked => "Bench Blocked",
            Self::Maternity => "Maternity",
            Self::SolutionInvestment => "Solution Investment",
            Self::DeliverySupport => "Delivery Support",
            Self::ProjectBuffer => "Project Buffer",
        }
    }
}

// =============================================================================
// Resource Status
// =============================================================================

/// Whether a resource is currently active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ResourceStatus {
    Active,
    Inactive,
}

impl ResourceStatus {
    /// Parse a raw cell value: "inactive" (case-insensitive) is inactive,
    /// everything else — including empty — is active.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            v if v.eq_ignore_ascii_case("inactive") => Self::Inactive,
            _ => Self::Active,
        }
    }

    /// Human label used in CSV export and the import template.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

// =============================================================================
// Resource
// =============================================================================

/// Canonical employee record.
///
/// Constructed by the field mapper, immutable once validated; ownership
/// transfers to the storage actor on successful submission.
///
/// Invariants: `non_billable_status` is present iff `billability_status` is
/// non-billable, and `employee_id`, `name`, `email` are non-empty on any
/// record that reaches the store (the row validator enforces both).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub location: String,
    pub client: String,
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub project_manager: String,
    pub reporting_manager: String,
    pub delivery_head: String,
    pub billability_status: BillabilityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_billable_status: Option<NonBillableStatus>,
    pub total_experience: String,
    pub doj: Time,
    pub assignment_start_date: Time,
    pub assignment_end_date: Time,
    pub practice: String,
    pub primary_skills: Vec<String>,
    pub secondary_skills: Vec<String>,
    pub status: ResourceStatus,

    // Deprecated actor fields, kept so the wire format matches the storage
    // actor exactly. Always empty on imported records.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub skill_tags: Vec<String>,
}

// =============================================================================
// User Identity
// =============================================================================

/// Application role carried by a user session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    Admin,
    Pmo,
    Pm,
    DeliveryHead,
    Employee,
    Management,
}

impl UserRole {
    /// Bulk resource creation is permitted for admins and PMO users only.
    pub fn can_manage_resources(&self) -> bool {
        matches!(self, Self::Admin | Self::Pmo)
    }

    /// Wire name of the role, as the storage actor spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Pmo => "pmo",
            Self::Pm => "pm",
            Self::DeliveryHead => "deliveryHead",
            Self::Employee => "employee",
            Self::Management => "management",
        }
    }
}

/// Profile attached to an authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub app_role: UserRole,
}
