use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Monthly salary structure owned by the employee profile (managed by an
/// external HR subsystem; read-only input here). All figures are >= 0.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "employee_id": 1001,
        "basic": 30000.0,
        "hra": 5000.0,
        "allowances": 2000.0
    })
)]
pub struct SalaryStructure {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 30000.0)]
    pub basic: f64,

    /// Housing allowance
    #[schema(example = 5000.0)]
    pub hra: f64,

    #[schema(example = 2000.0)]
    pub allowances: f64,
}
