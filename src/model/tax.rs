use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One marginal slab: the income portion in (min, max] is taxed at `rate`
/// percent. An absent `max` means the slab is open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "min": 250000.0, "max": 500000.0, "rate": 5.0 }))]
pub struct TaxBracket {
    #[schema(example = 250000.0)]
    pub min: f64,

    #[schema(example = 500000.0, nullable = true)]
    pub max: Option<f64>,

    /// Percent in [0, 100]
    #[schema(example = 5.0)]
    pub rate: f64,
}

/// How annual tax is derived for a (regime, financial year) pair. Stored
/// slab sets carry either a bracket table or a legacy flat percentage; the
/// two are one capability with two shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum TaxRule {
    Progressive(Vec<TaxBracket>),
    Flat(f64),
}

/// Persisted slab set, unique per (regime, financial_year). Brackets are
/// stored as a JSON array; legacy rows carry only `flat_rate`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct TaxSlabSet {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "new")]
    pub regime: String,

    #[schema(example = "2025-2026")]
    pub financial_year: String,

    /// JSON-encoded `Vec<TaxBracket>`; null or empty for flat-rate rows
    #[schema(value_type = String, nullable = true)]
    pub brackets: Option<String>,

    #[schema(example = 10.0, nullable = true)]
    pub flat_rate: Option<f64>,
}

impl TaxSlabSet {
    /// A non-empty bracket list wins over a legacy flat rate; a row with
    /// neither yields no rule and the caller treats tax as zero. Rows are
    /// validated on upsert, so a parse failure here means the table was
    /// edited by hand; it is logged and the row degrades to the flat rate.
    pub fn rule(&self) -> Option<TaxRule> {
        if let Some(raw) = self.brackets.as_deref() {
            match serde_json::from_str::<Vec<TaxBracket>>(raw) {
                Ok(list) if !list.is_empty() => return Some(TaxRule::Progressive(list)),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        regime = %self.regime,
                        financial_year = %self.financial_year,
                        "Unparseable bracket JSON in slab set"
                    );
                }
            }
        }
        self.flat_rate.map(TaxRule::Flat)
    }
}

/// Investment declaration, unique per (employee, financial year); later
/// writes to the same key replace the row in place, no history is kept.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "employee_id": 1001,
        "financial_year": "2025-2026",
        "annual_income": 408000.0,
        "investments": 150000.0,
        "taxable_income": 258000.0,
        "calculated_tax": 400.0,
        "proofs": "[\"80c-receipt.pdf\"]"
    })
)]
pub struct TaxDeclaration {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2025-2026")]
    pub financial_year: String,

    #[schema(example = 408000.0)]
    pub annual_income: f64,

    #[schema(example = 150000.0)]
    pub investments: f64,

    /// max(0, annual_income - investments), recomputed on every write
    #[schema(example = 258000.0)]
    pub taxable_income: f64,

    /// Tax snapshot against the slab set current at write time
    #[schema(example = 400.0)]
    pub calculated_tax: f64,

    /// JSON-encoded list of proof-file references
    #[schema(value_type = String, nullable = true)]
    pub proofs: Option<String>,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slab_row(brackets: Option<&str>, flat_rate: Option<f64>) -> TaxSlabSet {
        TaxSlabSet {
            id: 1,
            regime: "new".into(),
            financial_year: "2025-2026".into(),
            brackets: brackets.map(str::to_owned),
            flat_rate,
        }
    }

    #[test]
    fn brackets_win_over_flat_rate() {
        let row = slab_row(
            Some(r#"[{"min":0,"max":250000,"rate":0},{"min":250000,"max":null,"rate":5}]"#),
            Some(10.0),
        );
        match row.rule() {
            Some(TaxRule::Progressive(list)) => assert_eq!(list.len(), 2),
            other => panic!("expected progressive rule, got {:?}", other),
        }
    }

    #[test]
    fn empty_brackets_fall_back_to_flat_rate() {
        let row = slab_row(Some("[]"), Some(10.0));
        assert_eq!(row.rule(), Some(TaxRule::Flat(10.0)));
    }

    #[test]
    fn row_with_neither_yields_no_rule() {
        let row = slab_row(None, None);
        assert_eq!(row.rule(), None);
    }

    #[test]
    fn garbage_json_degrades_to_flat_rate() {
        let row = slab_row(Some("not json"), Some(7.5));
        assert_eq!(row.rule(), Some(TaxRule::Flat(7.5)));
    }
}
