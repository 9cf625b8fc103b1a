use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of attendance as recorded by the external attendance subsystem.
/// `status` is the subsystem's vocabulary; this engine only cares whether a
/// day counts as loss of pay.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceFact {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub status: String,
    pub overtime_hours: f64,
}

impl AttendanceFact {
    pub fn is_loss_of_pay(&self) -> bool {
        self.status.eq_ignore_ascii_case("lop")
    }
}

/// Unpaid-absence summary for a pay period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LopBreakdown {
    pub lop_days: f64,
    pub lop_amount: f64,
}

/// Overtime summary for a pay period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OvertimeBreakdown {
    pub overtime_hours: f64,
    pub overtime_pay: f64,
}
