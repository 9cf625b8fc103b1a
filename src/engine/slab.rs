use crate::engine::{EngineError, round2};
use crate::model::tax::{TaxBracket, TaxRule};

/// A slab set is usable when it is non-empty and each bracket has min >= 0,
/// max > min when bounded, and a rate within [0, 100]. Brackets may be
/// unsorted or leave gaps; a gap simply means that income range is untaxed.
/// Overlapping ranges are tolerated but over-count tax, so upserts should
/// avoid them.
pub fn validate_slabs(brackets: &[TaxBracket]) -> Result<(), EngineError> {
    if brackets.is_empty() {
        return Err(EngineError::InvalidSlabs("bracket list is empty".into()));
    }

    for (i, bracket) in brackets.iter().enumerate() {
        if !bracket.min.is_finite() || bracket.min < 0.0 {
            return Err(EngineError::InvalidSlabs(format!(
                "bracket {i}: min must be >= 0"
            )));
        }
        if let Some(max) = bracket.max {
            if !max.is_finite() || max <= bracket.min {
                return Err(EngineError::InvalidSlabs(format!(
                    "bracket {i}: max must be greater than min"
                )));
            }
        }
        if !bracket.rate.is_finite() || !(0.0..=100.0).contains(&bracket.rate) {
            return Err(EngineError::InvalidSlabs(format!(
                "bracket {i}: rate must be within [0, 100]"
            )));
        }
    }

    Ok(())
}

fn clamp_income(taxable_income: f64) -> f64 {
    if taxable_income.is_finite() {
        taxable_income.max(0.0)
    } else {
        0.0
    }
}

/// Progressive marginal taxation. Brackets are evaluated in ascending order
/// of `min`; the portion of income inside (min, max] is taxed at that
/// bracket's rate. Rounding happens once at the final sum, never per
/// bracket, so rounding error does not compound.
pub fn compute_tax(taxable_income: f64, brackets: &[TaxBracket]) -> f64 {
    let income = clamp_income(taxable_income);

    let mut ordered: Vec<&TaxBracket> = brackets.iter().collect();
    ordered.sort_by(|a, b| a.min.total_cmp(&b.min));

    let mut tax = 0.0;
    for bracket in ordered {
        if income <= bracket.min {
            continue;
        }
        let upper = bracket.max.unwrap_or(f64::INFINITY);
        let portion = income.min(upper) - bracket.min;
        if portion > 0.0 {
            tax += portion * bracket.rate / 100.0;
        }
    }

    round2(tax)
}

/// Evaluate whichever shape of rule is configured for the year.
pub fn evaluate_rule(taxable_income: f64, rule: &TaxRule) -> f64 {
    match rule {
        TaxRule::Progressive(brackets) => compute_tax(taxable_income, brackets),
        TaxRule::Flat(rate) => round2(clamp_income(taxable_income) * rate / 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket(min: f64, max: Option<f64>, rate: f64) -> TaxBracket {
        TaxBracket { min, max, rate }
    }

    fn standard_slabs() -> Vec<TaxBracket> {
        vec![
            bracket(0.0, Some(250_000.0), 0.0),
            bracket(250_000.0, Some(500_000.0), 5.0),
            bracket(500_000.0, None, 20.0),
        ]
    }

    #[test]
    fn worked_example_600k() {
        // 0 + 250000 * 5% + 100000 * 20% = 32500
        assert_eq!(compute_tax(600_000.0, &standard_slabs()), 32_500.0);
    }

    #[test]
    fn zero_income_is_zero_tax() {
        assert_eq!(compute_tax(0.0, &standard_slabs()), 0.0);
    }

    #[test]
    fn income_on_a_boundary_contributes_nothing_to_that_bracket() {
        // Exactly 250000: the 5% slab starts there and must contribute 0.
        assert_eq!(compute_tax(250_000.0, &standard_slabs()), 0.0);
        // Exactly 500000: fully fills the 5% slab, none of the 20% one.
        assert_eq!(compute_tax(500_000.0, &standard_slabs()), 12_500.0);
    }

    #[test]
    fn negative_and_non_finite_income_clamp_to_zero() {
        assert_eq!(compute_tax(-1000.0, &standard_slabs()), 0.0);
        assert_eq!(compute_tax(f64::NAN, &standard_slabs()), 0.0);
    }

    #[test]
    fn unsorted_brackets_are_sorted_before_evaluation() {
        let mut slabs = standard_slabs();
        slabs.reverse();
        assert_eq!(compute_tax(600_000.0, &slabs), 32_500.0);
    }

    #[test]
    fn gaps_between_brackets_are_untaxed() {
        let slabs = vec![
            bracket(0.0, Some(100_000.0), 10.0),
            // nothing configured between 100k and 200k
            bracket(200_000.0, None, 10.0),
        ];
        assert_eq!(compute_tax(150_000.0, &slabs), 10_000.0);
        assert_eq!(compute_tax(250_000.0, &slabs), 15_000.0);
    }

    #[test]
    fn tax_is_monotonic_in_income() {
        let slabs = standard_slabs();
        let mut previous = 0.0;
        for step in 0..200 {
            let income = step as f64 * 10_000.0;
            let tax = compute_tax(income, &slabs);
            assert!(
                tax >= previous,
                "tax regressed at income {income}: {tax} < {previous}"
            );
            previous = tax;
        }
    }

    #[test]
    fn validate_rejects_empty_list() {
        assert!(validate_slabs(&[]).is_err());
    }

    #[test]
    fn validate_rejects_max_not_above_min() {
        let slabs = vec![bracket(100.0, Some(100.0), 5.0)];
        assert!(validate_slabs(&slabs).is_err());
        let slabs = vec![bracket(100.0, Some(50.0), 5.0)];
        assert!(validate_slabs(&slabs).is_err());
    }

    #[test]
    fn validate_rejects_rate_outside_percent_range() {
        assert!(validate_slabs(&[bracket(0.0, None, 101.0)]).is_err());
        assert!(validate_slabs(&[bracket(0.0, None, -1.0)]).is_err());
    }

    #[test]
    fn validate_rejects_negative_min() {
        assert!(validate_slabs(&[bracket(-10.0, None, 5.0)]).is_err());
    }

    #[test]
    fn validate_accepts_unsorted_and_gappy_sets() {
        let slabs = vec![bracket(500_000.0, None, 20.0), bracket(0.0, Some(250_000.0), 0.0)];
        assert!(validate_slabs(&slabs).is_ok());
    }

    #[test]
    fn flat_rule_applies_percentage() {
        assert_eq!(evaluate_rule(258_000.0, &TaxRule::Flat(10.0)), 25_800.0);
        assert_eq!(evaluate_rule(-5.0, &TaxRule::Flat(10.0)), 0.0);
    }

    #[test]
    fn rounds_once_at_the_final_sum_not_per_bracket() {
        // Each bracket contributes 0.004, which would round to 0.00 on its
        // own; the sum 0.008 rounds to 0.01.
        let slabs = vec![
            bracket(0.0, Some(4.0), 0.1),
            bracket(4.0, Some(8.0), 0.1),
        ];
        assert_eq!(compute_tax(8.0, &slabs), 0.01);
    }
}
