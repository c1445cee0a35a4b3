//! Halal financial calculators.
//!
//! The [`Calculator`] is a stateless service built once from a
//! [`CalculatorConfig`] and shared freely between threads. Every operation
//! takes a command carrying raw caller input, validates it, and returns a
//! plain serializable result or an [`EngineError`].
//!
//! ```rust
//! use engine::{Calculator, LoanDurationCmd, Money};
//!
//! let calculator = Calculator::builder().build().unwrap();
//! let loan = calculator
//!     .loan_duration(&LoanDurationCmd::new(1000, 300))
//!     .unwrap();
//! assert_eq!(loan.duration_months, 4);
//! assert_eq!(loan.last_payment, Money::from_major(100));
//! ```

pub use budget::{
    BudgetResult, BudgetStatus, ExpenseBreakdown, ExpenseCategory, ExpenseShare, Priority,
    Recommendation, RecommendationKind, SavingsGoalAnalysis,
};
pub use catalog::{
    BudgetSimulationInfo, CalculatorCatalog, CurrencyInfo, LoanDurationLimits, SavingsPlanLimits,
    ZakatInfo,
};
pub use commands::{
    BudgetCmd, ExpenseLine, LoanDurationCmd, NisabSource, SavingsPlanCmd, SavingsStrategy,
    ZakatCmd,
};
pub use config::{BudgetConfig, CalculatorConfig, SavingsConfig, ZakatConfig};
pub use currency::Currency;
pub use error::EngineError;
pub use loan::{LoanDurationResult, ScheduleEntry};
pub use money::Money;
pub use savings::{SavingsPlanResult, SavingsSuggestion, SuggestionKind};
pub use validation::{
    AmountConstraint, RawNumber, validate_amount, validate_duration, validate_non_negative,
};
pub use zakat::ZakatResult;

mod budget;
mod catalog;
mod commands;
mod config;
mod currency;
mod error;
mod loan;
mod money;
mod savings;
mod util;
mod validation;
mod zakat;

type ResultEngine<T> = Result<T, EngineError>;

/// Entry point of the calculators. Holds the limits in force.
#[derive(Clone, Debug)]
pub struct Calculator {
    config: CalculatorConfig,
}

impl Calculator {
    /// Return a builder for `Calculator`. Help to build the struct.
    pub fn builder() -> CalculatorBuilder {
        CalculatorBuilder::default()
    }

    /// The configuration this calculator was built with.
    #[must_use]
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }
}

/// Round a month count to years with one decimal.
fn months_to_years(months: u32) -> f64 {
    util::round_tenths(i128::from(months), 12)
}

/// The builder for `Calculator`
#[derive(Default)]
pub struct CalculatorBuilder {
    config: CalculatorConfig,
}

impl CalculatorBuilder {
    /// Replace the default limits.
    pub fn config(mut self, config: CalculatorConfig) -> CalculatorBuilder {
        self.config = config;
        self
    }

    /// Construct `Calculator`, rejecting an inconsistent configuration.
    pub fn build(self) -> ResultEngine<Calculator> {
        self.config.validate()?;
        Ok(Calculator {
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_have_one_decimal() {
        assert_eq!(months_to_years(12), 1.0);
        assert_eq!(months_to_years(18), 1.5);
        assert_eq!(months_to_years(20), 1.7);
        assert_eq!(months_to_years(360), 30.0);
    }

    #[test]
    #[should_panic(expected = "invalid configuration")]
    fn fail_build_with_zero_duration_cap() {
        Calculator::builder()
            .config(CalculatorConfig {
                max_loan_duration_months: 0,
                ..CalculatorConfig::default()
            })
            .build()
            .unwrap();
    }
}
