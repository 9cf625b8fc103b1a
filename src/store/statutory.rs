use sqlx::MySqlPool;

use crate::model::statutory::StatutoryRates;

/// Active statutory configuration for a (country, state) pair. At most one
/// active row exists per pair; none at all is a legal state.
pub async fn fetch_active(
    pool: &MySqlPool,
    country: &str,
    state: &str,
) -> Result<Option<StatutoryRates>, sqlx::Error> {
    sqlx::query_as::<_, StatutoryRates>(
        r#"
        SELECT country, state, pf_percent, esi_percent, professional_tax, active
        FROM statutory_rates
        WHERE country = ?
        AND state = ?
        AND active = 1
        "#,
    )
    .bind(country)
    .bind(state)
    .fetch_optional(pool)
    .await
}

/// Last-writer-wins upsert keyed by (country, state).
pub async fn upsert(pool: &MySqlPool, rates: &StatutoryRates) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO statutory_rates
            (country, state, pf_percent, esi_percent, professional_tax, active)
        VALUES (?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            pf_percent = VALUES(pf_percent),
            esi_percent = VALUES(esi_percent),
            professional_tax = VALUES(professional_tax),
            active = VALUES(active)
        "#,
    )
    .bind(&rates.country)
    .bind(&rates.state)
    .bind(rates.pf_percent)
    .bind(rates.esi_percent)
    .bind(rates.professional_tax)
    .bind(rates.active)
    .execute(pool)
    .await?;

    Ok(())
}
