use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::model::statutory::StatutoryRates;

/// Active statutory rates keyed by lowercase "country:state". Statutory
/// configuration changes rarely, so a short TTL keeps the cache honest
/// without hammering the table on every payroll run.
pub static RATES_CACHE: Lazy<Cache<String, StatutoryRates>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(3600))
        .build()
});

pub fn rates_key(country: &str, state: &str) -> String {
    format!("{}:{}", country.to_lowercase(), state.to_lowercase())
}

pub async fn get(country: &str, state: &str) -> Option<StatutoryRates> {
    RATES_CACHE.get(&rates_key(country, state)).await
}

pub async fn put(rates: StatutoryRates) {
    RATES_CACHE
        .insert(rates_key(&rates.country, &rates.state), rates)
        .await;
}

/// Drop the cached entry after an upsert so the next lookup sees the new row.
pub async fn invalidate(country: &str, state: &str) {
    RATES_CACHE.invalidate(&rates_key(country, state)).await;
}

/// Load every active statutory row into the cache at startup.
pub async fn warmup_rates_cache(pool: &MySqlPool) -> Result<()> {
    let mut stream = sqlx::query_as::<_, StatutoryRates>(
        r#"
        SELECT country, state, pf_percent, esi_percent, professional_tax, active
        FROM statutory_rates
        WHERE active = 1
        "#,
    )
    .fetch(pool);

    let mut total_count = 0usize;
    while let Some(row) = stream.next().await {
        put(row?).await;
        total_count += 1;
    }

    tracing::info!(
        "Statutory rates cache warmup complete: {} jurisdictions",
        total_count
    );

    Ok(())
}
