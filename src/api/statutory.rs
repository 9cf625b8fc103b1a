use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::statutory::StatutoryRates;
use crate::store;
use crate::utils::rates_cache;

#[derive(Deserialize, ToSchema)]
pub struct UpsertStatutoryRates {
    #[schema(example = "IN")]
    pub country: String,

    #[schema(example = "KA")]
    pub state: String,

    #[schema(example = 12.0)]
    pub pf_percent: f64,

    #[schema(example = 0.75)]
    pub esi_percent: f64,

    #[schema(example = 200.0)]
    pub professional_tax: f64,

    #[schema(example = true)]
    pub active: bool,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct StatutoryQuery {
    #[schema(example = "IN")]
    pub country: String,

    #[schema(example = "KA")]
    pub state: String,
}

fn valid_percent(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

/// Create or replace the statutory configuration for a (country, state)
/// jurisdiction.
#[utoipa::path(
    put,
    path = "/api/v1/statutory",
    request_body = UpsertStatutoryRates,
    responses(
        (status = 200, description = "Rates stored", body = StatutoryRates),
        (status = 400, description = "Rates out of range"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Statutory"
)]
pub async fn upsert_rates(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpsertStatutoryRates>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if !valid_percent(payload.pf_percent)
        || !valid_percent(payload.esi_percent)
        || !payload.professional_tax.is_finite()
        || payload.professional_tax < 0.0
    {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Percentages must be within [0, 100] and professional_tax >= 0"
        })));
    }

    let rates = StatutoryRates {
        country: payload.country.clone(),
        state: payload.state.clone(),
        pf_percent: payload.pf_percent,
        esi_percent: payload.esi_percent,
        professional_tax: payload.professional_tax,
        active: payload.active,
    };

    store::statutory::upsert(pool.get_ref(), &rates)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to store statutory rates");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // The next payroll run must see the new configuration.
    rates_cache::invalidate(&payload.country, &payload.state).await;

    Ok(HttpResponse::Ok().json(rates))
}

#[utoipa::path(
    get,
    path = "/api/v1/statutory",
    params(StatutoryQuery),
    responses(
        (status = 200, body = StatutoryRates),
        (status = 404, description = "No active configuration for that jurisdiction")
    ),
    security(("bearer_auth" = [])),
    tag = "Statutory"
)]
pub async fn get_rates(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<StatutoryQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_payroll_officer()?;

    let rates = store::statutory::fetch_active(pool.get_ref(), &query.country, &query.state)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch statutory rates");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match rates {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "No active statutory configuration for that jurisdiction"
        }))),
    }
}
