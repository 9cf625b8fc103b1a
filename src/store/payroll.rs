use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::engine::calculator::PayrollComputation;
use crate::model::payroll::PayrollRecord;
use crate::model::salary::SalaryStructure;

const RECORD_COLUMNS: &str = r#"
    id, employee_id, organization_id, period_start, period_end, financial_year,
    basic, hra, allowances, worked_days, lop_days, overtime_hours, overtime_pay,
    gross_salary, provident_fund, health_insurance, professional_tax,
    monthly_tax, lop_amount, net_salary, status, approved_by, approved_at,
    created_at
"#;

/// Persist a freshly computed payroll in PENDING state. Returns the new id.
/// Two nearly-simultaneous computations for the same employee and period may
/// both land; de-duplication by period is an external policy, not enforced
/// here.
pub async fn insert(
    pool: &MySqlPool,
    employee_id: u64,
    organization_id: u64,
    period_start: NaiveDate,
    period_end: NaiveDate,
    financial_year: &str,
    salary: &SalaryStructure,
    computed: &PayrollComputation,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO payroll_records
            (employee_id, organization_id, period_start, period_end, financial_year,
             basic, hra, allowances, worked_days, lop_days, overtime_hours, overtime_pay,
             gross_salary, provident_fund, health_insurance, professional_tax,
             monthly_tax, lop_amount, net_salary, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(employee_id)
    .bind(organization_id)
    .bind(period_start)
    .bind(period_end)
    .bind(financial_year)
    .bind(salary.basic)
    .bind(salary.hra)
    .bind(salary.allowances)
    .bind(computed.worked_days)
    .bind(computed.lop_days)
    .bind(computed.overtime_hours)
    .bind(computed.overtime_pay)
    .bind(computed.gross_salary)
    .bind(computed.provident_fund)
    .bind(computed.health_insurance)
    .bind(computed.professional_tax)
    .bind(computed.monthly_tax)
    .bind(computed.lop_amount)
    .bind(computed.net_salary)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn fetch(pool: &MySqlPool, id: u64) -> Result<Option<PayrollRecord>, sqlx::Error> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM payroll_records WHERE id = ?");
    sqlx::query_as::<_, PayrollRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Result of the approval compare-and-set.
pub enum ApproveOutcome {
    Approved(PayrollRecord),
    /// The record exists but was no longer PENDING.
    AlreadyApproved,
    NotFound,
}

/// Single atomic compare-and-set: PENDING -> APPROVED, stamping approver and
/// time in the same statement. The status predicate makes double approval
/// impossible under concurrent requests; zero affected rows is then either a
/// missing record or a lost race, distinguished by a follow-up read.
pub async fn approve(
    pool: &MySqlPool,
    id: u64,
    approver_id: u64,
) -> Result<ApproveOutcome, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE payroll_records
        SET status = 'approved', approved_by = ?, approved_at = NOW()
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(approver_id)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return match fetch(pool, id).await? {
            Some(_) => Ok(ApproveOutcome::AlreadyApproved),
            None => Ok(ApproveOutcome::NotFound),
        };
    }

    match fetch(pool, id).await? {
        Some(record) => Ok(ApproveOutcome::Approved(record)),
        None => Ok(ApproveOutcome::NotFound),
    }
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/// Paginated listing with optional employee and status filters.
pub async fn list(
    pool: &MySqlPool,
    employee_id: Option<u64>,
    status: Option<&str>,
    page: u64,
    per_page: u64,
) -> Result<(Vec<PayrollRecord>, i64), sqlx::Error> {
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }
    if let Some(status) = status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    let count_sql = format!("SELECT COUNT(*) FROM payroll_records{where_sql}");
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }
    let total = count_q.fetch_one(pool).await?;

    let data_sql = format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM payroll_records
        {where_sql}
        ORDER BY period_start DESC, id DESC
        LIMIT ? OFFSET ?
        "#
    );
    let mut data_q = sqlx::query_as::<_, PayrollRecord>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }
    let records = data_q.bind(per_page).bind(offset).fetch_all(pool).await?;

    Ok((records, total))
}
