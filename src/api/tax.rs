use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::engine::{round2, slab};
use crate::model::tax::{TaxBracket, TaxDeclaration, TaxSlabSet};
use crate::store;

#[derive(Deserialize, ToSchema)]
pub struct UpsertSlabSet {
    #[schema(example = "new")]
    pub regime: String,

    #[schema(example = "2026-2027")]
    pub financial_year: String,

    /// Progressive bracket table; wins over `flat_rate` when non-empty
    pub brackets: Option<Vec<TaxBracket>>,

    /// Legacy flat percentage in [0, 100]
    #[schema(example = 10.0, nullable = true)]
    pub flat_rate: Option<f64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SlabQuery {
    #[schema(example = "new")]
    pub regime: String,

    #[schema(example = "2026-2027")]
    pub financial_year: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct FinancialYearQuery {
    #[schema(example = "2026-2027")]
    pub financial_year: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpsertDeclaration {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-2027")]
    pub financial_year: String,

    #[schema(example = 408000.0)]
    pub annual_income: f64,

    #[schema(example = 150000.0)]
    pub investments: f64,

    /// Regime used for the tax snapshot; the configured default when absent
    #[schema(example = "new", nullable = true)]
    pub regime: Option<String>,

    /// Proof-file references
    pub proofs: Option<Vec<String>>,
}

/// Create or replace the slab set for (regime, financial year). Brackets are
/// validated before persisting so a stored set is always evaluable.
#[utoipa::path(
    put,
    path = "/api/v1/tax/slabs",
    request_body = UpsertSlabSet,
    responses(
        (status = 200, description = "Slab set stored", body = TaxSlabSet),
        (status = 400, description = "Invalid brackets or rate"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Tax"
)]
pub async fn upsert_slabs(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpsertSlabSet>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let brackets_json = match payload.brackets.as_deref() {
        Some(list) if !list.is_empty() => {
            if let Err(e) = slab::validate_slabs(list) {
                return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                    "message": e.to_string()
                })));
            }
            Some(serde_json::to_string(list).map_err(|e| {
                tracing::error!(error = %e, "Failed to encode brackets");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?)
        }
        _ => None,
    };

    if let Some(rate) = payload.flat_rate {
        if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "flat_rate must be within [0, 100]"
            })));
        }
    }

    if brackets_json.is_none() && payload.flat_rate.is_none() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "A slab set needs brackets or a flat rate"
        })));
    }

    store::tax::upsert_slab_set(
        pool.get_ref(),
        &payload.regime,
        &payload.financial_year,
        brackets_json.as_deref(),
        payload.flat_rate,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to store slab set");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match store::tax::fetch_slab_set(pool.get_ref(), &payload.regime, &payload.financial_year).await
    {
        Ok(Some(row)) => Ok(HttpResponse::Ok().json(row)),
        _ => Err(actix_web::error::ErrorInternalServerError(
            "Internal Server Error",
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/tax/slabs",
    params(SlabQuery),
    responses(
        (status = 200, body = TaxSlabSet),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Tax"
)]
pub async fn get_slabs(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<SlabQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_payroll_officer()?;

    let row = store::tax::fetch_slab_set(pool.get_ref(), &query.regime, &query.financial_year)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch slab set");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match row {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "No slab set for that regime and financial year"
        }))),
    }
}

/// File or replace the declaration for (employee, financial year). Taxable
/// income and the tax snapshot are recomputed on every write so the stored
/// figures never drift from the inputs.
#[utoipa::path(
    put,
    path = "/api/v1/tax/declarations",
    request_body = UpsertDeclaration,
    responses(
        (status = 200, description = "Declaration stored", body = TaxDeclaration),
        (status = 400, description = "Negative figures"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Tax"
)]
pub async fn upsert_declaration(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<UpsertDeclaration>,
) -> actix_web::Result<impl Responder> {
    // Employees may file their own declaration; officers may file any.
    if auth.is_employee() && auth.employee_id != Some(payload.employee_id) {
        return Err(actix_web::error::ErrorForbidden("Not your declaration"));
    }

    if !payload.annual_income.is_finite()
        || payload.annual_income < 0.0
        || !payload.investments.is_finite()
        || payload.investments < 0.0
    {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "annual_income and investments must be >= 0"
        })));
    }

    let taxable_income = round2((payload.annual_income - payload.investments).max(0.0));

    let regime = payload
        .regime
        .clone()
        .unwrap_or_else(|| config.policy.default_regime.clone());
    let rule = store::tax::fetch_slab_set(pool.get_ref(), &regime, &payload.financial_year)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Slab lookup failed; declaration tax snapshot is 0");
            None
        })
        .and_then(|row| row.rule());
    let calculated_tax = rule
        .map(|r| slab::evaluate_rule(taxable_income, &r))
        .unwrap_or(0.0);

    let proofs = match &payload.proofs {
        Some(list) => Some(serde_json::to_string(list).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode proofs");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?),
        None => None,
    };

    let declaration = TaxDeclaration {
        employee_id: payload.employee_id,
        financial_year: payload.financial_year.clone(),
        annual_income: round2(payload.annual_income),
        investments: round2(payload.investments),
        taxable_income,
        calculated_tax,
        proofs,
        updated_at: None,
    };

    store::tax::upsert_declaration(pool.get_ref(), &declaration)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id = payload.employee_id, "Failed to store declaration");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match store::tax::fetch_declaration(
        pool.get_ref(),
        payload.employee_id,
        &payload.financial_year,
    )
    .await
    {
        Ok(Some(row)) => Ok(HttpResponse::Ok().json(row)),
        _ => Err(actix_web::error::ErrorInternalServerError(
            "Internal Server Error",
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/tax/declarations/{employee_id}",
    params(
        ("employee_id", description = "Employee ID"),
        FinancialYearQuery
    ),
    responses(
        (status = 200, body = TaxDeclaration),
        (status = 403),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Tax"
)]
pub async fn get_declaration(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<FinancialYearQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    if auth.is_employee() {
        if auth.employee_id != Some(employee_id) {
            return Err(actix_web::error::ErrorForbidden("Not your declaration"));
        }
    } else {
        auth.require_payroll_officer()?;
    }

    let row = store::tax::fetch_declaration(pool.get_ref(), employee_id, &query.financial_year)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch declaration");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match row {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "No declaration for that employee and financial year"
        }))),
    }
}

/// Generate (or regenerate) the annual tax statement from the stored
/// declaration. Keyed by (employee, financial year); regeneration overwrites
/// the single statement.
#[utoipa::path(
    post,
    path = "/api/v1/tax/declarations/{employee_id}/statement",
    params(
        ("employee_id", description = "Employee ID"),
        FinancialYearQuery
    ),
    responses(
        (status = 200, description = "Statement generated"),
        (status = 404, description = "No declaration filed")
    ),
    security(("bearer_auth" = [])),
    tag = "Tax"
)]
pub async fn generate_statement(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<FinancialYearQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_payroll_officer()?;

    let employee_id = path.into_inner();

    let declaration =
        store::tax::fetch_declaration(pool.get_ref(), employee_id, &query.financial_year)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, employee_id, "Failed to fetch declaration");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    let Some(declaration) = declaration else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "No declaration for that employee and financial year"
        })));
    };

    let document_ref = Uuid::new_v4().to_string();
    store::payslip::upsert_statement(
        pool.get_ref(),
        declaration.employee_id,
        &declaration.financial_year,
        declaration.annual_income,
        declaration.investments,
        declaration.taxable_income,
        declaration.calculated_tax,
        &document_ref,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to store statement");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match store::payslip::fetch_statement(pool.get_ref(), employee_id, &query.financial_year).await
    {
        Ok(Some(statement)) => Ok(HttpResponse::Ok().json(statement)),
        _ => Err(actix_web::error::ErrorInternalServerError(
            "Internal Server Error",
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/tax/declarations/{employee_id}/statement",
    params(
        ("employee_id", description = "Employee ID"),
        FinancialYearQuery
    ),
    responses(
        (status = 200, description = "Statement found"),
        (status = 403),
        (status = 404, description = "Statement not generated yet")
    ),
    security(("bearer_auth" = [])),
    tag = "Tax"
)]
pub async fn get_statement(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<FinancialYearQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    if auth.is_employee() {
        if auth.employee_id != Some(employee_id) {
            return Err(actix_web::error::ErrorForbidden("Not your statement"));
        }
    } else {
        auth.require_payroll_officer()?;
    }

    let row = store::payslip::fetch_statement(pool.get_ref(), employee_id, &query.financial_year)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch statement");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match row {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Statement not generated yet"
        }))),
    }
}
