use sqlx::MySqlPool;

use crate::model::tax::{TaxDeclaration, TaxSlabSet};

/// Slab set for the canonical (regime, financial year) key.
pub async fn fetch_slab_set(
    pool: &MySqlPool,
    regime: &str,
    financial_year: &str,
) -> Result<Option<TaxSlabSet>, sqlx::Error> {
    sqlx::query_as::<_, TaxSlabSet>(
        r#"
        SELECT id, regime, financial_year, brackets, flat_rate
        FROM tax_slab_sets
        WHERE regime = ?
        AND financial_year = ?
        "#,
    )
    .bind(regime)
    .bind(financial_year)
    .fetch_optional(pool)
    .await
}

/// Last-writer-wins upsert keyed by (regime, financial_year). `brackets` is
/// the JSON-encoded bracket list, already validated by the caller.
pub async fn upsert_slab_set(
    pool: &MySqlPool,
    regime: &str,
    financial_year: &str,
    brackets: Option<&str>,
    flat_rate: Option<f64>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tax_slab_sets (regime, financial_year, brackets, flat_rate)
        VALUES (?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            brackets = VALUES(brackets),
            flat_rate = VALUES(flat_rate)
        "#,
    )
    .bind(regime)
    .bind(financial_year)
    .bind(brackets)
    .bind(flat_rate)
    .execute(pool)
    .await?;

    Ok(())
}

/// Declaration for (employee, financial year), if one was filed.
pub async fn fetch_declaration(
    pool: &MySqlPool,
    employee_id: u64,
    financial_year: &str,
) -> Result<Option<TaxDeclaration>, sqlx::Error> {
    sqlx::query_as::<_, TaxDeclaration>(
        r#"
        SELECT employee_id, financial_year, annual_income, investments,
               taxable_income, calculated_tax, proofs, updated_at
        FROM tax_declarations
        WHERE employee_id = ?
        AND financial_year = ?
        "#,
    )
    .bind(employee_id)
    .bind(financial_year)
    .fetch_optional(pool)
    .await
}

/// Replace-in-place upsert keyed by (employee, financial_year). No history
/// is kept; the caller has already recomputed taxable income and the tax
/// snapshot.
pub async fn upsert_declaration(
    pool: &MySqlPool,
    declaration: &TaxDeclaration,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tax_declarations
            (employee_id, financial_year, annual_income, investments,
             taxable_income, calculated_tax, proofs, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, NOW())
        ON DUPLICATE KEY UPDATE
            annual_income = VALUES(annual_income),
            investments = VALUES(investments),
            taxable_income = VALUES(taxable_income),
            calculated_tax = VALUES(calculated_tax),
            proofs = VALUES(proofs),
            updated_at = NOW()
        "#,
    )
    .bind(declaration.employee_id)
    .bind(&declaration.financial_year)
    .bind(declaration.annual_income)
    .bind(declaration.investments)
    .bind(declaration.taxable_income)
    .bind(declaration.calculated_tax)
    .bind(&declaration.proofs)
    .execute(pool)
    .await?;

    Ok(())
}
