//! Description of the calculators and the limits in force, for clients that
//! render forms.

use serde::Serialize;

use crate::{Calculator, Currency, ExpenseCategory, Money};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavingsPlanLimits {
    pub min_monthly_saving: Money,
    pub max_duration_months: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoanDurationLimits {
    pub min_loan_amount: Money,
    pub max_loan_amount: Money,
    pub min_monthly_payment: Money,
    pub max_duration_months: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetSimulationInfo {
    pub expense_categories: Vec<ExpenseCategory>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZakatInfo {
    /// Percentage of net assets, e.g. `2.5`.
    pub rate_percent: f64,
    pub default_nisab: Money,
    pub gold_nisab_grams: u32,
    pub silver_nisab_grams: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalculatorCatalog {
    pub savings_plan: SavingsPlanLimits,
    pub loan_duration: LoanDurationLimits,
    pub budget_simulation: BudgetSimulationInfo,
    pub zakat: ZakatInfo,
    pub currencies: Vec<CurrencyInfo>,
}

impl Calculator {
    #[must_use]
    pub fn catalog(&self) -> CalculatorCatalog {
        let config = &self.config;
        CalculatorCatalog {
            savings_plan: SavingsPlanLimits {
                min_monthly_saving: config.min_monthly_saving,
                max_duration_months: config.max_loan_duration_months,
            },
            loan_duration: LoanDurationLimits {
                min_loan_amount: config.min_loan_amount,
                max_loan_amount: config.max_loan_amount,
                min_monthly_payment: config.min_monthly_payment,
                max_duration_months: config.max_loan_duration_months,
            },
            budget_simulation: BudgetSimulationInfo {
                expense_categories: ExpenseCategory::ALL.to_vec(),
            },
            zakat: ZakatInfo {
                rate_percent: f64::from(config.zakat.rate_basis_points) / 100.0,
                default_nisab: config.zakat.default_nisab,
                gold_nisab_grams: config.zakat.gold_nisab_grams,
                silver_nisab_grams: config.zakat.silver_nisab_grams,
            },
            currencies: Currency::ALL
                .into_iter()
                .map(|currency| CurrencyInfo {
                    code: currency.code(),
                    symbol: currency.symbol(),
                    name: currency.name(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_reflects_config() {
        let catalog = Calculator::builder().build().unwrap().catalog();
        assert_eq!(catalog.loan_duration.max_duration_months, 360);
        assert_eq!(catalog.loan_duration.min_loan_amount, Money::from_major(100));
        assert_eq!(catalog.zakat.rate_percent, 2.5);
        assert_eq!(catalog.currencies.len(), 5);
        assert_eq!(catalog.budget_simulation.expense_categories.len(), 7);
    }
}
