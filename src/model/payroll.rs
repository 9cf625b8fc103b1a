use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle of a payroll record. PENDING is the freshly computed, still
/// mutable state; APPROVED is terminal and locks every field.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[sqlx(rename_all = "lowercase")]
pub enum PayrollStatus {
    Pending,
    Approved,
}

impl PayrollStatus {
    /// The only legal transition is PENDING -> APPROVED.
    pub fn can_approve(self) -> bool {
        self == PayrollStatus::Pending
    }
}

/// One computed payroll for (employee, period, organization). Created by the
/// calculator in PENDING state; the approval transition is the only mutation
/// afterwards. Monetary fields are rounded to 2 decimals at computation time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub organization_id: u64,

    #[schema(example = "2026-04-01", value_type = String, format = "date")]
    pub period_start: NaiveDate,

    #[schema(example = "2026-04-30", value_type = String, format = "date")]
    pub period_end: NaiveDate,

    #[schema(example = "2025-2026")]
    pub financial_year: String,

    // Input snapshot
    #[schema(example = 30000.0)]
    pub basic: f64,
    #[schema(example = 5000.0)]
    pub hra: f64,
    #[schema(example = 2000.0)]
    pub allowances: f64,
    #[schema(example = 27.0)]
    pub worked_days: f64,
    #[schema(example = 3.0)]
    pub lop_days: f64,
    #[schema(example = 0.0)]
    pub overtime_hours: f64,
    #[schema(example = 0.0)]
    pub overtime_pay: f64,

    // Computed figures
    #[schema(example = 34000.0)]
    pub gross_salary: f64,
    #[schema(example = 3240.0)]
    pub provident_fund: f64,
    #[schema(example = 255.0)]
    pub health_insurance: f64,
    #[schema(example = 200.0)]
    pub professional_tax: f64,
    #[schema(example = 0.0)]
    pub monthly_tax: f64,
    #[schema(example = 3000.0)]
    pub lop_amount: f64,
    #[schema(example = 30305.0)]
    pub net_salary: f64,

    #[schema(example = "pending")]
    pub status: PayrollStatus,

    #[schema(example = 7, nullable = true)]
    pub approved_by: Option<u64>,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub approved_at: Option<DateTime<Utc>>,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn only_pending_can_approve() {
        assert!(PayrollStatus::Pending.can_approve());
        assert!(!PayrollStatus::Approved.can_approve());
    }

    #[test]
    fn status_round_trips_through_db_strings() {
        assert_eq!(PayrollStatus::Pending.to_string(), "pending");
        assert_eq!(
            PayrollStatus::from_str("approved").unwrap(),
            PayrollStatus::Approved
        );
    }
}
