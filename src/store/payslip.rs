use sqlx::MySqlPool;

use crate::engine::snapshot::PayslipBreakdown;
use crate::model::payslip::{PayslipSnapshot, TaxStatement};

/// Upsert the single payslip for a payroll. The unique key on `payroll_id`
/// makes regeneration idempotent: a second call overwrites the breakdown,
/// issue timestamp, and document reference instead of inserting a duplicate.
pub async fn upsert_payslip(
    pool: &MySqlPool,
    payroll_id: u64,
    breakdown: &PayslipBreakdown,
    document_ref: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO payslips
            (payroll_id, basic, hra, allowances, overtime_pay,
             provident_fund, health_insurance, professional_tax, tax, lop_amount,
             net_salary, period_label, issued_at, document_ref)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), ?)
        ON DUPLICATE KEY UPDATE
            basic = VALUES(basic),
            hra = VALUES(hra),
            allowances = VALUES(allowances),
            overtime_pay = VALUES(overtime_pay),
            provident_fund = VALUES(provident_fund),
            health_insurance = VALUES(health_insurance),
            professional_tax = VALUES(professional_tax),
            tax = VALUES(tax),
            lop_amount = VALUES(lop_amount),
            net_salary = VALUES(net_salary),
            period_label = VALUES(period_label),
            issued_at = NOW(),
            document_ref = VALUES(document_ref)
        "#,
    )
    .bind(payroll_id)
    .bind(breakdown.earnings.basic)
    .bind(breakdown.earnings.hra)
    .bind(breakdown.earnings.allowances)
    .bind(breakdown.earnings.overtime_pay)
    .bind(breakdown.deductions.provident_fund)
    .bind(breakdown.deductions.health_insurance)
    .bind(breakdown.deductions.professional_tax)
    .bind(breakdown.deductions.tax)
    .bind(breakdown.deductions.lop_amount)
    .bind(breakdown.net_salary)
    .bind(&breakdown.period_label)
    .bind(document_ref)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_payslip(
    pool: &MySqlPool,
    payroll_id: u64,
) -> Result<Option<PayslipSnapshot>, sqlx::Error> {
    sqlx::query_as::<_, PayslipSnapshot>(
        r#"
        SELECT id, payroll_id, basic, hra, allowances, overtime_pay,
               provident_fund, health_insurance, professional_tax, tax, lop_amount,
               net_salary, period_label, issued_at, document_ref
        FROM payslips
        WHERE payroll_id = ?
        "#,
    )
    .bind(payroll_id)
    .fetch_optional(pool)
    .await
}

/// Declaration-side analogue of the payslip upsert, keyed by
/// (employee, financial_year).
pub async fn upsert_statement(
    pool: &MySqlPool,
    employee_id: u64,
    financial_year: &str,
    annual_income: f64,
    investments: f64,
    taxable_income: f64,
    tax: f64,
    document_ref: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tax_statements
            (employee_id, financial_year, annual_income, investments,
             taxable_income, tax, issued_at, document_ref)
        VALUES (?, ?, ?, ?, ?, ?, NOW(), ?)
        ON DUPLICATE KEY UPDATE
            annual_income = VALUES(annual_income),
            investments = VALUES(investments),
            taxable_income = VALUES(taxable_income),
            tax = VALUES(tax),
            issued_at = NOW(),
            document_ref = VALUES(document_ref)
        "#,
    )
    .bind(employee_id)
    .bind(financial_year)
    .bind(annual_income)
    .bind(investments)
    .bind(taxable_income)
    .bind(tax)
    .bind(document_ref)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_statement(
    pool: &MySqlPool,
    employee_id: u64,
    financial_year: &str,
) -> Result<Option<TaxStatement>, sqlx::Error> {
    sqlx::query_as::<_, TaxStatement>(
        r#"
        SELECT id, employee_id, financial_year, annual_income, investments,
               taxable_income, tax, issued_at, document_ref
        FROM tax_statements
        WHERE employee_id = ?
        AND financial_year = ?
        "#,
    )
    .bind(employee_id)
    .bind(financial_year)
    .fetch_optional(pool)
    .await
}
