//! Limits and thresholds used by the calculators.
//!
//! The whole structure is deserializable so the application can embed it in
//! its settings file; every field falls back to its default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Smallest monthly saving, also the smallest savings target.
    pub min_monthly_saving: Money,
    /// Longest duration accepted or produced, in months.
    pub max_loan_duration_months: u32,
    pub min_loan_amount: Money,
    pub max_loan_amount: Money,
    pub min_monthly_payment: Money,
    /// How many schedule entries a loan result exposes.
    pub schedule_preview_months: usize,
    pub savings: SavingsConfig,
    pub budget: BudgetConfig,
    pub zakat: ZakatConfig,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            min_monthly_saving: Money::from_major(10),
            max_loan_duration_months: 360,
            min_loan_amount: Money::from_major(100),
            max_loan_amount: Money::from_major(10_000_000),
            min_monthly_payment: Money::from_major(1),
            schedule_preview_months: 12,
            savings: SavingsConfig::default(),
            budget: BudgetConfig::default(),
            zakat: ZakatConfig::default(),
        }
    }
}

/// Savings plan suggestion parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsConfig {
    pub faster_plan_months: u32,
    pub comfortable_trigger_percent: u32,
    pub comfortable_rate_percent: u32,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            faster_plan_months: 12,
            comfortable_trigger_percent: 10,
            comfortable_rate_percent: 5,
        }
    }
}

/// Budget recommendation thresholds, in percent of the monthly income.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub low_savings_rate_percent: u32,
    pub high_savings_rate_percent: u32,
    pub housing_max_share_percent: u32,
    pub food_max_share_percent: u32,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            low_savings_rate_percent: 10,
            high_savings_rate_percent: 20,
            housing_max_share_percent: 35,
            food_max_share_percent: 15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZakatConfig {
    /// Nisab used when the caller supplies none and the currency has no
    /// override. A placeholder, not a live gold-price threshold.
    pub default_nisab: Money,
    pub nisab_by_currency: BTreeMap<Currency, Money>,
    /// Levy rate in basis points (250 = 2.5%).
    pub rate_basis_points: u32,
    pub gold_nisab_grams: u32,
    pub silver_nisab_grams: u32,
}

impl Default for ZakatConfig {
    fn default() -> Self {
        Self {
            default_nisab: Money::from_major(3000),
            nisab_by_currency: BTreeMap::new(),
            rate_basis_points: 250,
            gold_nisab_grams: 85,
            silver_nisab_grams: 595,
        }
    }
}

impl ZakatConfig {
    /// Nisab to apply when the caller does not supply one.
    #[must_use]
    pub fn nisab_for(&self, currency: Currency) -> Money {
        self.nisab_by_currency
            .get(&currency)
            .copied()
            .unwrap_or(self.default_nisab)
    }
}

impl CalculatorConfig {
    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> ResultEngine<()> {
        let invalid = |msg: &str| Err(EngineError::Validation(format!("invalid configuration: {msg}")));

        if !self.min_monthly_saving.is_positive() {
            return invalid("min_monthly_saving must be > 0");
        }
        if self.max_loan_duration_months == 0 {
            return invalid("max_loan_duration_months must be > 0");
        }
        if !self.min_loan_amount.is_positive() || !self.min_monthly_payment.is_positive() {
            return invalid("loan minimums must be > 0");
        }
        if self.min_loan_amount > self.max_loan_amount {
            return invalid("min_loan_amount exceeds max_loan_amount");
        }
        if self.savings.faster_plan_months == 0 || self.savings.comfortable_rate_percent == 0 {
            return invalid("savings suggestion parameters must be > 0");
        }
        if self.budget.low_savings_rate_percent > self.budget.high_savings_rate_percent {
            return invalid("low savings rate exceeds high savings rate");
        }
        if !self.zakat.default_nisab.is_positive()
            || self.zakat.nisab_by_currency.values().any(|n| !n.is_positive())
        {
            return invalid("nisab must be > 0");
        }
        if self.zakat.rate_basis_points == 0 || self.zakat.rate_basis_points > 10_000 {
            return invalid("zakat rate must be within (0, 10000] basis points");
        }
        if self.zakat.gold_nisab_grams == 0 || self.zakat.silver_nisab_grams == 0 {
            return invalid("nisab weights must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        CalculatorConfig::default().validate().unwrap();
    }

    #[test]
    #[should_panic(expected = "min_loan_amount exceeds max_loan_amount")]
    fn fail_inverted_loan_bounds() {
        let config = CalculatorConfig {
            min_loan_amount: Money::from_major(500),
            max_loan_amount: Money::from_major(100),
            ..CalculatorConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn nisab_override_per_currency() {
        let mut zakat = ZakatConfig::default();
        zakat
            .nisab_by_currency
            .insert(Currency::Usd, Money::from_major(3400));
        assert_eq!(zakat.nisab_for(Currency::Usd), Money::from_major(3400));
        assert_eq!(zakat.nisab_for(Currency::Eur), Money::from_major(3000));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: CalculatorConfig =
            serde_json::from_str(r#"{"min_loan_amount": 250, "zakat": {"nisab_by_currency": {"MAD": "32000"}}}"#)
                .unwrap();
        assert_eq!(config.min_loan_amount, Money::from_major(250));
        assert_eq!(config.max_loan_duration_months, 360);
        assert_eq!(config.zakat.nisab_for(Currency::Mad), Money::from_major(32_000));
        assert_eq!(config.zakat.rate_basis_points, 250);
    }
}
