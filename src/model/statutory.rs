use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Statutory deduction rates for one (country, state) jurisdiction.
/// At most one active row exists per pair; a missing row is not an error,
/// deductions simply default to zero.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "country": "IN",
        "state": "KA",
        "pf_percent": 12.0,
        "esi_percent": 0.75,
        "professional_tax": 200.0,
        "active": true
    })
)]
pub struct StatutoryRates {
    #[schema(example = "IN")]
    pub country: String,

    #[schema(example = "KA")]
    pub state: String,

    /// Provident fund, percent of earned basic
    #[schema(example = 12.0)]
    pub pf_percent: f64,

    /// Health insurance, percent of gross salary
    #[schema(example = 0.75)]
    pub esi_percent: f64,

    /// Flat monthly professional tax amount
    #[schema(example = 200.0)]
    pub professional_tax: f64,

    pub active: bool,
}
