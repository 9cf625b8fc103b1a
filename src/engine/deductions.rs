use crate::engine::round2;
use crate::model::statutory::StatutoryRates;

/// Statutory deduction amounts for one payroll, each rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatutoryDeductions {
    pub provident_fund: f64,
    pub health_insurance: f64,
    pub professional_tax: f64,
}

impl StatutoryDeductions {
    pub fn total(&self) -> f64 {
        self.provident_fund + self.health_insurance + self.professional_tax
    }
}

/// Provident fund is charged on earned basic, health insurance on gross
/// salary, professional tax is a flat amount. A jurisdiction with no active
/// statutory configuration is not an error: every component is zero and the
/// computation proceeds.
pub fn compose_deductions(
    earned_basic: f64,
    gross_salary: f64,
    rates: Option<&StatutoryRates>,
) -> StatutoryDeductions {
    let Some(rates) = rates else {
        return StatutoryDeductions::default();
    };

    StatutoryDeductions {
        provident_fund: round2(earned_basic * rates.pf_percent / 100.0),
        health_insurance: round2(gross_salary * rates.esi_percent / 100.0),
        professional_tax: round2(rates.professional_tax),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn karnataka_rates() -> StatutoryRates {
        StatutoryRates {
            country: "IN".into(),
            state: "KA".into(),
            pf_percent: 12.0,
            esi_percent: 0.75,
            professional_tax: 200.0,
            active: true,
        }
    }

    #[test]
    fn charges_each_component_on_its_own_base() {
        let d = compose_deductions(27_000.0, 34_000.0, Some(&karnataka_rates()));
        assert_eq!(d.provident_fund, 3_240.0); // 12% of earned basic
        assert_eq!(d.health_insurance, 255.0); // 0.75% of gross
        assert_eq!(d.professional_tax, 200.0); // flat
        assert_eq!(d.total(), 3_695.0);
    }

    #[test]
    fn missing_configuration_defaults_to_zero() {
        let d = compose_deductions(27_000.0, 34_000.0, None);
        assert_eq!(d, StatutoryDeductions::default());
        assert_eq!(d.total(), 0.0);
    }
}
