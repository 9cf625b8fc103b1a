use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    pub policy: PayrollPolicy,
}

/// Calculation conventions, lifted out of the calculator so they are
/// testable and regionally overridable instead of buried as literals.
#[derive(Debug, Clone)]
pub struct PayrollPolicy {
    /// Reference-month length for daily-rate derivation (not calendar-aware)
    pub days_in_month: f64,
    /// Working hours per day, prices overtime
    pub hours_per_day: f64,
    /// Flat annual standard deduction subtracted before tax
    pub standard_deduction: f64,
    /// Regime assumed when a computation request names none
    pub default_regime: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            policy: PayrollPolicy {
                days_in_month: env::var("PAYROLL_DAYS_IN_MONTH")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap(),
                hours_per_day: env::var("PAYROLL_HOURS_PER_DAY")
                    .unwrap_or_else(|_| "8".to_string())
                    .parse()
                    .unwrap(),
                standard_deduction: env::var("PAYROLL_STANDARD_DEDUCTION")
                    .unwrap_or_else(|_| "50000".to_string())
                    .parse()
                    .unwrap(),
                default_regime: env::var("PAYROLL_DEFAULT_REGIME")
                    .unwrap_or_else(|_| "new".to_string()),
            },
        }
    }
}
