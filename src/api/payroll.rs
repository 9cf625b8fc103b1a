use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::engine::calculator::{self, PayrollInputs};
use crate::engine::snapshot;
use crate::model::payroll::PayrollRecord;
use crate::store;
use crate::store::payroll::ApproveOutcome;
use crate::utils::rates_cache;

#[derive(Deserialize, ToSchema)]
pub struct ComputePayroll {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub organization_id: u64,

    #[schema(example = "2026-04-01", value_type = String, format = "date")]
    pub period_start: NaiveDate,

    #[schema(example = "2026-04-30", value_type = String, format = "date")]
    pub period_end: NaiveDate,

    #[schema(example = "2026-2027")]
    pub financial_year: String,

    #[schema(example = "IN")]
    pub country: String,

    #[schema(example = "KA")]
    pub state: String,

    /// Tax regime; the configured default applies when absent
    #[schema(example = "new", nullable = true)]
    pub regime: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u64>,

    #[schema(example = 10)]
    pub per_page: Option<u64>,

    #[schema(example = 1001)]
    pub employee_id: Option<u64>,

    #[schema(example = "pending")]
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<PayrollRecord>,
    pub page: u64,
    pub per_page: u64,
    pub total: i64,
}

/// Run the full computation pipeline and persist a PENDING payroll.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/compute",
    request_body = ComputePayroll,
    responses(
        (status = 201, description = "Payroll computed", body = PayrollRecord),
        (status = 400, description = "Invalid period"),
        (status = 401),
        (status = 403),
        (status = 422, description = "No salary structure configured for the employee")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn compute_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<ComputePayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_payroll_officer()?;

    if payload.period_start > payload.period_end {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "period_start cannot be after period_end"
        })));
    }

    let policy = &config.policy;

    let salary = store::salary::fetch(pool.get_ref(), payload.employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id = payload.employee_id, "Salary structure lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(salary) = salary else {
        return Ok(HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "message": format!(
                "No salary structure configured for employee {}",
                payload.employee_id
            )
        })));
    };

    // Attendance is safety-critical to net pay; a lookup failure fails the
    // computation instead of degrading to zero.
    let facts = store::attendance::get_attendance(
        pool.get_ref(),
        payload.employee_id,
        payload.period_start,
        payload.period_end,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = payload.employee_id, "Attendance lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let daily_basic = calculator::daily_basic(policy, salary.basic);
    let hourly_rate = calculator::hourly_rate(policy, salary.basic);
    let lop = store::attendance::calculate_lop(&facts, daily_basic);
    let overtime = store::attendance::calculate_overtime(&facts, hourly_rate);

    // Configuration lookups degrade to zero when absent or failing.
    let statutory = match rates_cache::get(&payload.country, &payload.state).await {
        Some(rates) => Some(rates),
        None => {
            let fetched =
                store::statutory::fetch_active(pool.get_ref(), &payload.country, &payload.state)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::warn!(error = %e, "Statutory lookup failed; deductions default to 0");
                        None
                    });
            if let Some(rates) = &fetched {
                rates_cache::put(rates.clone()).await;
            }
            fetched
        }
    };

    let regime = payload
        .regime
        .clone()
        .unwrap_or_else(|| policy.default_regime.clone());
    let slab_set = store::tax::fetch_slab_set(pool.get_ref(), &regime, &payload.financial_year)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, regime = %regime, "Slab lookup failed; tax defaults to 0");
            None
        });
    let tax_rule = slab_set.as_ref().and_then(|row| row.rule());

    let investments =
        store::tax::fetch_declaration(pool.get_ref(), payload.employee_id, &payload.financial_year)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Declaration lookup failed; investments default to 0");
                None
            })
            .map(|d| d.investments)
            .unwrap_or(0.0);

    let computed = calculator::compute_payroll(
        policy,
        &PayrollInputs {
            salary: &salary,
            lop,
            overtime,
            statutory: statutory.as_ref(),
            tax_rule: tax_rule.as_ref(),
            investments,
        },
    );

    let payroll_id = store::payroll::insert(
        pool.get_ref(),
        payload.employee_id,
        payload.organization_id,
        payload.period_start,
        payload.period_end,
        &payload.financial_year,
        &salary,
        &computed,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = payload.employee_id, "Failed to store payroll");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match store::payroll::fetch(pool.get_ref(), payroll_id).await {
        Ok(Some(record)) => Ok(HttpResponse::Created().json(record)),
        _ => Err(actix_web::error::ErrorInternalServerError(
            "Internal Server Error",
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, body = PayrollRecord),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_payroll_officer()?;

    let payroll_id = path.into_inner();

    let record = store::payroll::fetch(pool.get_ref(), payroll_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to fetch payroll");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match record {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll not found"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, body = PaginatedPayrollResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_payroll_officer()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let (data, total) = store::payroll::list(
        pool.get_ref(),
        query.employee_id,
        query.status.as_deref(),
        page,
        per_page,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch payroll list");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Approve a PENDING payroll, locking it permanently.
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/approve",
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payroll approved", body = PayrollRecord),
        (status = 404, description = "Payroll not found"),
        (status = 409, description = "Payroll already approved", body = Object, example = json!({
            "message": "Payroll already approved"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn approve_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_payroll_officer()?;

    let payroll_id = path.into_inner();

    let outcome = store::payroll::approve(pool.get_ref(), payroll_id, auth.user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Approve payroll failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match outcome {
        ApproveOutcome::Approved(record) => Ok(HttpResponse::Ok().json(record)),
        ApproveOutcome::AlreadyApproved => Ok(HttpResponse::Conflict().json(serde_json::json!({
            "message": "Payroll already approved"
        }))),
        ApproveOutcome::NotFound => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll not found"
        }))),
    }
}

/// Generate (or regenerate) the payslip for an approved payroll. The
/// breakdown is always recomputed from the payroll record and upserted, so
/// repeated calls never create duplicates.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/{payroll_id}/payslip",
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payslip generated"),
        (status = 404, description = "Payroll not found"),
        (status = 409, description = "Payroll is not approved", body = Object, example = json!({
            "message": "payroll 42 is not approved"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Payslip"
)]
pub async fn generate_payslip(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_payroll_officer()?;

    let payroll_id = path.into_inner();

    let record = store::payroll::fetch(pool.get_ref(), payroll_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to fetch payroll");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(record) = record else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll not found"
        })));
    };

    let breakdown = match snapshot::build_breakdown(&record) {
        Ok(b) => b,
        Err(e) => {
            return Ok(HttpResponse::Conflict().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
    };

    let document_ref = Uuid::new_v4().to_string();
    store::payslip::upsert_payslip(pool.get_ref(), record.id, &breakdown, &document_ref)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to store payslip");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match store::payslip::fetch_payslip(pool.get_ref(), record.id).await {
        Ok(Some(slip)) => Ok(HttpResponse::Ok().json(slip)),
        _ => Err(actix_web::error::ErrorInternalServerError(
            "Internal Server Error",
        )),
    }
}

/// Fetch the stored payslip. Employees may read their own; payroll officers
/// may read any.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}/payslip",
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payslip found"),
        (status = 403),
        (status = 404, description = "Payslip not generated yet")
    ),
    security(("bearer_auth" = [])),
    tag = "Payslip"
)]
pub async fn get_payslip(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();

    let record = store::payroll::fetch(pool.get_ref(), payroll_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to fetch payroll");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(record) = record else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll not found"
        })));
    };

    if auth.is_employee() {
        if auth.employee_id != Some(record.employee_id) {
            return Err(actix_web::error::ErrorForbidden("Not your payslip"));
        }
    } else {
        auth.require_payroll_officer()?;
    }

    match store::payslip::fetch_payslip(pool.get_ref(), payroll_id).await {
        Ok(Some(slip)) => Ok(HttpResponse::Ok().json(slip)),
        Ok(None) => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payslip not generated yet"
        }))),
        Err(e) => {
            tracing::error!(error = %e, payroll_id, "Failed to fetch payslip");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}
