use crate::config::PayrollPolicy;
use crate::engine::{deductions, round2, slab};
use crate::model::attendance::{LopBreakdown, OvertimeBreakdown};
use crate::model::salary::SalaryStructure;
use crate::model::statutory::StatutoryRates;
use crate::model::tax::TaxRule;

/// Everything one payroll computation needs, fetched up front by the caller.
/// The attendance-derived figures come from the attendance collaborator; the
/// optional lookups degrade to zero when absent.
#[derive(Debug)]
pub struct PayrollInputs<'a> {
    pub salary: &'a SalaryStructure,
    pub lop: LopBreakdown,
    pub overtime: OvertimeBreakdown,
    pub statutory: Option<&'a StatutoryRates>,
    pub tax_rule: Option<&'a TaxRule>,
    /// Declared investments for the financial year; 0 when no declaration
    pub investments: f64,
}

/// Result of one payroll computation. Every monetary field is rounded to 2
/// decimals independently; lifecycle status is attached at persistence time.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollComputation {
    pub worked_days: f64,
    pub lop_days: f64,
    pub lop_amount: f64,
    pub overtime_hours: f64,
    pub overtime_pay: f64,
    pub earned_basic: f64,
    pub gross_salary: f64,
    pub provident_fund: f64,
    pub health_insurance: f64,
    pub professional_tax: f64,
    pub monthly_tax: f64,
    pub net_salary: f64,
}

impl PayrollComputation {
    pub fn total_deductions(&self) -> f64 {
        self.provident_fund + self.health_insurance + self.professional_tax + self.monthly_tax
    }
}

/// Fixed reference-month convention: one day of basic pay.
pub fn daily_basic(policy: &PayrollPolicy, basic: f64) -> f64 {
    basic / policy.days_in_month
}

/// One hour of basic pay, used to price overtime.
pub fn hourly_rate(policy: &PayrollPolicy, basic: f64) -> f64 {
    daily_basic(policy, basic) / policy.hours_per_day
}

/// The aggregation pipeline: prorate basic pay by unpaid absence, add
/// allowances and overtime, compose statutory deductions, project the gross
/// to an annual figure for tax, and net everything out. Gross and earned
/// basic are rounded before the deduction bases are taken so that
/// `net == gross - sum(deductions)` holds exactly on the rounded figures.
pub fn compute_payroll(policy: &PayrollPolicy, inputs: &PayrollInputs<'_>) -> PayrollComputation {
    let salary = inputs.salary;

    let daily = daily_basic(policy, salary.basic);
    let lop_days = inputs.lop.lop_days.max(0.0);
    let worked_days = (policy.days_in_month - lop_days).max(0.0);
    let earned_basic = round2(daily * worked_days);

    let overtime_pay = round2(inputs.overtime.overtime_pay);
    let gross_salary = round2(earned_basic + salary.hra + salary.allowances + overtime_pay);

    let statutory = deductions::compose_deductions(earned_basic, gross_salary, inputs.statutory);

    let annual_gross = gross_salary * 12.0;
    let taxable_income = (annual_gross - policy.standard_deduction - inputs.investments).max(0.0);
    let annual_tax = match inputs.tax_rule {
        Some(rule) => slab::evaluate_rule(taxable_income, rule),
        None => 0.0,
    };
    let monthly_tax = round2(annual_tax / 12.0);

    let net_salary = round2(gross_salary - statutory.total() - monthly_tax);

    PayrollComputation {
        worked_days,
        lop_days,
        lop_amount: round2(inputs.lop.lop_amount),
        overtime_hours: inputs.overtime.overtime_hours,
        overtime_pay,
        earned_basic,
        gross_salary,
        provident_fund: statutory.provident_fund,
        health_insurance: statutory.health_insurance,
        professional_tax: statutory.professional_tax,
        monthly_tax,
        net_salary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tax::TaxBracket;

    fn policy() -> PayrollPolicy {
        PayrollPolicy {
            days_in_month: 30.0,
            hours_per_day: 8.0,
            standard_deduction: 50_000.0,
            default_regime: "new".into(),
        }
    }

    fn salary(basic: f64, hra: f64, allowances: f64) -> SalaryStructure {
        SalaryStructure {
            employee_id: 1001,
            basic,
            hra,
            allowances,
        }
    }

    fn no_absence() -> LopBreakdown {
        LopBreakdown {
            lop_days: 0.0,
            lop_amount: 0.0,
        }
    }

    fn no_overtime() -> OvertimeBreakdown {
        OvertimeBreakdown {
            overtime_hours: 0.0,
            overtime_pay: 0.0,
        }
    }

    #[test]
    fn rate_conventions_are_thirty_days_and_eight_hours() {
        let p = policy();
        assert_eq!(daily_basic(&p, 30_000.0), 1_000.0);
        assert_eq!(hourly_rate(&p, 30_000.0), 125.0);
    }

    #[test]
    fn bare_computation_with_no_configuration() {
        // basic 30000, hra 5000, allowances 2000, 3 LOP days, nothing
        // configured: gross 34000, all deductions zero.
        let s = salary(30_000.0, 5_000.0, 2_000.0);
        let out = compute_payroll(
            &policy(),
            &PayrollInputs {
                salary: &s,
                lop: LopBreakdown {
                    lop_days: 3.0,
                    lop_amount: 3_000.0,
                },
                overtime: no_overtime(),
                statutory: None,
                tax_rule: None,
                investments: 0.0,
            },
        );

        assert_eq!(out.earned_basic, 27_000.0);
        assert_eq!(out.worked_days, 27.0);
        assert_eq!(out.gross_salary, 34_000.0);
        assert_eq!(out.net_salary, 34_000.0);
        assert_eq!(out.total_deductions(), 0.0);
    }

    #[test]
    fn statutory_and_progressive_tax_flow_through() {
        let s = salary(30_000.0, 5_000.0, 2_000.0);
        let rates = StatutoryRates {
            country: "IN".into(),
            state: "KA".into(),
            pf_percent: 12.0,
            esi_percent: 0.75,
            professional_tax: 200.0,
            active: true,
        };
        let rule = TaxRule::Progressive(vec![
            TaxBracket {
                min: 0.0,
                max: Some(250_000.0),
                rate: 0.0,
            },
            TaxBracket {
                min: 250_000.0,
                max: Some(500_000.0),
                rate: 5.0,
            },
            TaxBracket {
                min: 500_000.0,
                max: None,
                rate: 20.0,
            },
        ]);

        let out = compute_payroll(
            &policy(),
            &PayrollInputs {
                salary: &s,
                lop: no_absence(),
                overtime: no_overtime(),
                statutory: Some(&rates),
                tax_rule: Some(&rule),
                investments: 0.0,
            },
        );

        // gross 37000, annual 444000, minus 50000 standard deduction
        // = 394000 taxable, tax = 144000 * 5% = 7200, monthly 600.
        assert_eq!(out.gross_salary, 37_000.0);
        assert_eq!(out.monthly_tax, 600.0);
        assert_eq!(out.provident_fund, 3_600.0);
        assert_eq!(out.health_insurance, 277.5);
        assert_eq!(out.professional_tax, 200.0);
        assert_eq!(out.net_salary, 37_000.0 - 3_600.0 - 277.5 - 200.0 - 600.0);
    }

    #[test]
    fn investments_reduce_taxable_income() {
        let s = salary(30_000.0, 5_000.0, 2_000.0);
        let rule = TaxRule::Flat(10.0);

        let without = compute_payroll(
            &policy(),
            &PayrollInputs {
                salary: &s,
                lop: no_absence(),
                overtime: no_overtime(),
                statutory: None,
                tax_rule: Some(&rule),
                investments: 0.0,
            },
        );
        let with = compute_payroll(
            &policy(),
            &PayrollInputs {
                salary: &s,
                lop: no_absence(),
                overtime: no_overtime(),
                statutory: None,
                tax_rule: Some(&rule),
                investments: 120_000.0,
            },
        );

        // 120000 less taxable at 10% is 12000 a year, 1000 a month.
        assert!((without.monthly_tax - with.monthly_tax - 1_000.0).abs() < 0.01);
    }

    #[test]
    fn taxable_income_never_goes_negative() {
        let s = salary(3_000.0, 0.0, 0.0);
        let out = compute_payroll(
            &policy(),
            &PayrollInputs {
                salary: &s,
                lop: no_absence(),
                overtime: no_overtime(),
                statutory: None,
                tax_rule: Some(&TaxRule::Flat(10.0)),
                investments: 100_000.0,
            },
        );
        assert_eq!(out.monthly_tax, 0.0);
    }

    #[test]
    fn overtime_raises_gross_and_net() {
        let s = salary(30_000.0, 0.0, 0.0);
        let out = compute_payroll(
            &policy(),
            &PayrollInputs {
                salary: &s,
                lop: no_absence(),
                overtime: OvertimeBreakdown {
                    overtime_hours: 4.0,
                    overtime_pay: 500.0,
                },
                statutory: None,
                tax_rule: None,
                investments: 0.0,
            },
        );
        assert_eq!(out.gross_salary, 30_500.0);
        assert_eq!(out.net_salary, 30_500.0);
    }

    #[test]
    fn net_equals_gross_minus_stated_deductions() {
        let s = salary(41_237.0, 7_119.0, 1_503.0);
        let rates = StatutoryRates {
            country: "IN".into(),
            state: "MH".into(),
            pf_percent: 12.0,
            esi_percent: 1.75,
            professional_tax: 175.0,
            active: true,
        };
        let out = compute_payroll(
            &policy(),
            &PayrollInputs {
                salary: &s,
                lop: LopBreakdown {
                    lop_days: 2.0,
                    lop_amount: 2_749.13,
                },
                overtime: OvertimeBreakdown {
                    overtime_hours: 3.5,
                    overtime_pay: 601.37,
                },
                statutory: Some(&rates),
                tax_rule: Some(&TaxRule::Flat(10.0)),
                investments: 25_000.0,
            },
        );

        let recomposed = out.gross_salary - out.total_deductions();
        assert!(
            (out.net_salary - recomposed).abs() < 0.01,
            "net {} drifted from gross minus deductions {}",
            out.net_salary,
            recomposed
        );
    }

    #[test]
    fn lop_days_beyond_the_month_clamp_at_zero_pay() {
        let s = salary(30_000.0, 0.0, 0.0);
        let out = compute_payroll(
            &policy(),
            &PayrollInputs {
                salary: &s,
                lop: LopBreakdown {
                    lop_days: 45.0,
                    lop_amount: 30_000.0,
                },
                overtime: no_overtime(),
                statutory: None,
                tax_rule: None,
                investments: 0.0,
            },
        );
        assert_eq!(out.earned_basic, 0.0);
        assert_eq!(out.worked_days, 0.0);
    }
}
