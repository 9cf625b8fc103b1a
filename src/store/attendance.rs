use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::engine::round2;
use crate::model::attendance::{AttendanceFact, LopBreakdown, OvertimeBreakdown};

/// Attendance rows for one employee and period, as captured by the external
/// attendance subsystem. A failure here fails the whole computation: absence
/// proration is safety-critical to net pay, so it is never silently zeroed.
pub async fn get_attendance(
    pool: &MySqlPool,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<AttendanceFact>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceFact>(
        r#"
        SELECT employee_id, date, status, overtime_hours
        FROM attendance
        WHERE employee_id = ?
        AND date BETWEEN ? AND ?
        ORDER BY date
        "#,
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// Count unpaid-absence days and price them at the daily basic rate.
pub fn calculate_lop(facts: &[AttendanceFact], daily_basic: f64) -> LopBreakdown {
    let lop_days = facts.iter().filter(|f| f.is_loss_of_pay()).count() as f64;
    LopBreakdown {
        lop_days,
        lop_amount: round2(lop_days * daily_basic),
    }
}

/// Sum recorded overtime hours and price them at the hourly rate. Negative
/// hours in a row are treated as unrecorded.
pub fn calculate_overtime(facts: &[AttendanceFact], hourly_rate: f64) -> OvertimeBreakdown {
    let overtime_hours: f64 = facts.iter().map(|f| f.overtime_hours.max(0.0)).sum();
    OvertimeBreakdown {
        overtime_hours,
        overtime_pay: round2(overtime_hours * hourly_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(day: u32, status: &str, overtime_hours: f64) -> AttendanceFact {
        AttendanceFact {
            employee_id: 1001,
            date: NaiveDate::from_ymd_opt(2026, 4, day).unwrap(),
            status: status.into(),
            overtime_hours,
        }
    }

    #[test]
    fn lop_counts_only_loss_of_pay_days() {
        let facts = vec![
            fact(1, "present", 0.0),
            fact(2, "lop", 0.0),
            fact(3, "leave", 0.0),
            fact(4, "LOP", 0.0),
        ];
        let lop = calculate_lop(&facts, 1_000.0);
        assert_eq!(lop.lop_days, 2.0);
        assert_eq!(lop.lop_amount, 2_000.0);
    }

    #[test]
    fn overtime_sums_hours_across_the_period() {
        let facts = vec![
            fact(1, "present", 2.0),
            fact(2, "present", 1.5),
            fact(3, "present", -3.0),
        ];
        let ot = calculate_overtime(&facts, 125.0);
        assert_eq!(ot.overtime_hours, 3.5);
        assert_eq!(ot.overtime_pay, 437.5);
    }

    #[test]
    fn empty_period_yields_zeroes() {
        let lop = calculate_lop(&[], 1_000.0);
        assert_eq!(lop.lop_days, 0.0);
        assert_eq!(lop.lop_amount, 0.0);
        let ot = calculate_overtime(&[], 125.0);
        assert_eq!(ot.overtime_pay, 0.0);
    }
}
