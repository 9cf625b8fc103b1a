pub mod calculator;
pub mod deductions;
pub mod slab;
pub mod snapshot;

use thiserror::Error;

/// Failures the computation core reports to its callers. Missing statutory
/// or slab configuration is deliberately absent from this list: those lookups
/// degrade to zero instead of failing.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid tax slabs: {0}")]
    InvalidSlabs(String),

    #[error("no salary structure configured for employee {0}")]
    MissingSalaryStructure(u64),

    #[error("payroll {0} is not approved")]
    NotApproved(u64),
}

/// Round half-up to 2 decimal places. Non-finite values clamp to 0 so one
/// bad figure cannot poison a whole payroll run; callers log the anomaly.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn rounds_half_up_at_two_decimals() {
        assert_eq!(round2(12.346), 12.35);
        assert_eq!(round2(12.344), 12.34);
        // 0.125 is exact in binary, so this is a clean half-way case
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn non_finite_clamps_to_zero() {
        assert_eq!(round2(f64::NAN), 0.0);
        assert_eq!(round2(f64::INFINITY), 0.0);
        assert_eq!(round2(f64::NEG_INFINITY), 0.0);
    }
}
