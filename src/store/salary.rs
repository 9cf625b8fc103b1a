use sqlx::MySqlPool;

use crate::model::salary::SalaryStructure;

/// The employee's salary structure, managed by the external HR subsystem.
/// `None` means the computation must be refused, not defaulted.
pub async fn fetch(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<SalaryStructure>, sqlx::Error> {
    sqlx::query_as::<_, SalaryStructure>(
        r#"
        SELECT employee_id, basic, hra, allowances
        FROM salary_structures
        WHERE employee_id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}
