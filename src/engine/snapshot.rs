use crate::engine::{EngineError, round2};
use crate::model::payroll::{PayrollRecord, PayrollStatus};

/// Earnings side of a payslip. The set of earning kinds is closed, so these
/// are named fields rather than an open map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarningsBreakdown {
    pub basic: f64,
    pub hra: f64,
    pub allowances: f64,
    pub overtime_pay: f64,
}

impl EarningsBreakdown {
    pub fn total(&self) -> f64 {
        self.basic + self.hra + self.allowances + self.overtime_pay
    }
}

/// Deductions side of a payslip. LOP appears here so that the full basic
/// figure can be shown under earnings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeductionsBreakdown {
    pub provident_fund: f64,
    pub health_insurance: f64,
    pub professional_tax: f64,
    pub tax: f64,
    pub lop_amount: f64,
}

impl DeductionsBreakdown {
    pub fn total(&self) -> f64 {
        self.provident_fund + self.health_insurance + self.professional_tax + self.tax
            + self.lop_amount
    }
}

/// A frozen payslip breakdown ready to be upserted and handed to the
/// document renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PayslipBreakdown {
    pub earnings: EarningsBreakdown,
    pub deductions: DeductionsBreakdown,
    pub net_salary: f64,
    pub period_label: String,
}

/// Freeze an approved payroll into its employee-facing breakdown. Always
/// recomputed from the payroll record, never from a prior snapshot, so
/// regeneration cannot drift from the locked record. A non-approved record
/// is a state conflict.
pub fn build_breakdown(record: &PayrollRecord) -> Result<PayslipBreakdown, EngineError> {
    if record.status != PayrollStatus::Approved {
        return Err(EngineError::NotApproved(record.id));
    }

    let earnings = EarningsBreakdown {
        basic: round2(record.basic),
        hra: round2(record.hra),
        allowances: round2(record.allowances),
        overtime_pay: round2(record.overtime_pay),
    };
    let deductions = DeductionsBreakdown {
        provident_fund: round2(record.provident_fund),
        health_insurance: round2(record.health_insurance),
        professional_tax: round2(record.professional_tax),
        tax: round2(record.monthly_tax),
        lop_amount: round2(record.lop_amount),
    };

    // The record's own net is authoritative; recompute only when it is
    // unusable, flooring at zero.
    let net_salary = if record.net_salary.is_finite() {
        round2(record.net_salary)
    } else {
        round2((earnings.total() - deductions.total()).max(0.0))
    };

    let period_label = format!(
        "{} - {}",
        record.period_start.format("%d %b %Y"),
        record.period_end.format("%d %b %Y")
    );

    Ok(PayslipBreakdown {
        earnings,
        deductions,
        net_salary,
        period_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn approved_record() -> PayrollRecord {
        PayrollRecord {
            id: 42,
            employee_id: 1001,
            organization_id: 1,
            period_start: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
            financial_year: "2026-2027".into(),
            basic: 30_000.0,
            hra: 5_000.0,
            allowances: 2_000.0,
            worked_days: 27.0,
            lop_days: 3.0,
            overtime_hours: 0.0,
            overtime_pay: 0.0,
            gross_salary: 34_000.0,
            provident_fund: 3_240.0,
            health_insurance: 255.0,
            professional_tax: 200.0,
            monthly_tax: 600.0,
            lop_amount: 3_000.0,
            net_salary: 29_705.0,
            status: PayrollStatus::Approved,
            approved_by: Some(7),
            approved_at: None,
            created_at: None,
        }
    }

    #[test]
    fn pending_payroll_is_a_state_conflict() {
        let mut record = approved_record();
        record.status = PayrollStatus::Pending;
        assert_eq!(build_breakdown(&record), Err(EngineError::NotApproved(42)));
    }

    #[test]
    fn breakdown_mirrors_the_record() {
        let breakdown = build_breakdown(&approved_record()).unwrap();
        assert_eq!(breakdown.earnings.basic, 30_000.0);
        assert_eq!(breakdown.earnings.total(), 37_000.0);
        assert_eq!(breakdown.deductions.lop_amount, 3_000.0);
        assert_eq!(breakdown.deductions.total(), 7_295.0);
        assert_eq!(breakdown.net_salary, 29_705.0);
        assert_eq!(breakdown.period_label, "01 Apr 2026 - 30 Apr 2026");
    }

    #[test]
    fn rebuilding_from_the_same_record_is_identical() {
        let record = approved_record();
        let first = build_breakdown(&record).unwrap();
        let second = build_breakdown(&record).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unusable_net_is_recomputed_and_floored() {
        let mut record = approved_record();
        record.net_salary = f64::NAN;
        let breakdown = build_breakdown(&record).unwrap();
        // earnings 37000 - deductions 7295
        assert_eq!(breakdown.net_salary, 29_705.0);

        record.net_salary = f64::NAN;
        record.monthly_tax = 50_000.0;
        let floored = build_breakdown(&record).unwrap();
        assert_eq!(floored.net_salary, 0.0);
    }
}
