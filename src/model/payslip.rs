use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Frozen employee-facing breakdown of one approved payroll. Exactly one row
/// exists per payroll (unique key on `payroll_id`); regeneration overwrites
/// the breakdown, issue timestamp, and document reference in place.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayslipSnapshot {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub payroll_id: u64,

    // Earnings
    #[schema(example = 30000.0)]
    pub basic: f64,
    #[schema(example = 5000.0)]
    pub hra: f64,
    #[schema(example = 2000.0)]
    pub allowances: f64,
    #[schema(example = 0.0)]
    pub overtime_pay: f64,

    // Deductions
    #[schema(example = 3240.0)]
    pub provident_fund: f64,
    #[schema(example = 255.0)]
    pub health_insurance: f64,
    #[schema(example = 200.0)]
    pub professional_tax: f64,
    #[schema(example = 0.0)]
    pub tax: f64,
    #[schema(example = 3000.0)]
    pub lop_amount: f64,

    #[schema(example = 30305.0)]
    pub net_salary: f64,

    #[schema(example = "01 Apr 2026 - 30 Apr 2026")]
    pub period_label: String,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub issued_at: Option<DateTime<Utc>>,

    /// Handle passed to the external document renderer
    #[schema(example = "3f2a1c04-7d52-4e88-9a61-2d9f6b1c0a11")]
    pub document_ref: String,
}

/// Declaration-side annual statement, the payslip's analogue keyed by
/// (employee, financial year) instead of by payroll.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct TaxStatement {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2025-2026")]
    pub financial_year: String,

    #[schema(example = 408000.0)]
    pub annual_income: f64,

    #[schema(example = 150000.0)]
    pub investments: f64,

    #[schema(example = 258000.0)]
    pub taxable_income: f64,

    #[schema(example = 400.0)]
    pub tax: f64,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub issued_at: Option<DateTime<Utc>>,

    #[schema(example = "8b0c5a2e-1f43-47a9-b7e2-64f0d3a9c5de")]
    pub document_ref: String,
}
