//! Command structs for calculator operations.
//!
//! These types carry the caller's raw, unvalidated input into the
//! [`Calculator`](crate::Calculator), keeping call sites readable and
//! avoiding long argument lists. Validation happens inside the calculator.

use crate::{Currency, EngineError, ExpenseCategory, RawNumber, ResultEngine};

/// How the savings plan is constrained: by the monthly amount or by the
/// number of months. The other quantity is derived.
#[derive(Clone, Debug, PartialEq)]
pub enum SavingsStrategy {
    ByMonthlySaving(RawNumber),
    ByDuration(RawNumber),
}

impl SavingsStrategy {
    /// Build the strategy from two optional fields, exactly one of which
    /// must be present.
    pub fn from_options(
        monthly_saving: Option<RawNumber>,
        duration_months: Option<RawNumber>,
    ) -> ResultEngine<Self> {
        match (monthly_saving, duration_months) {
            (Some(monthly), None) => Ok(Self::ByMonthlySaving(monthly)),
            (None, Some(months)) => Ok(Self::ByDuration(months)),
            (None, None) => Err(EngineError::Usage(
                "supply either monthly_saving or duration_months".to_string(),
            )),
            (Some(_), Some(_)) => Err(EngineError::Usage(
                "supply only one of monthly_saving or duration_months".to_string(),
            )),
        }
    }
}

/// Compute a savings plan towards a target.
#[derive(Clone, Debug, PartialEq)]
pub struct SavingsPlanCmd {
    pub target_amount: RawNumber,
    pub strategy: SavingsStrategy,
    pub currency: Currency,
}

impl SavingsPlanCmd {
    #[must_use]
    pub fn new(target_amount: impl Into<RawNumber>, strategy: SavingsStrategy) -> Self {
        Self {
            target_amount: target_amount.into(),
            strategy,
            currency: Currency::default(),
        }
    }

    #[must_use]
    pub fn by_monthly_saving(
        target_amount: impl Into<RawNumber>,
        monthly_saving: impl Into<RawNumber>,
    ) -> Self {
        Self::new(
            target_amount,
            SavingsStrategy::ByMonthlySaving(monthly_saving.into()),
        )
    }

    #[must_use]
    pub fn by_duration(
        target_amount: impl Into<RawNumber>,
        duration_months: impl Into<RawNumber>,
    ) -> Self {
        Self::new(
            target_amount,
            SavingsStrategy::ByDuration(duration_months.into()),
        )
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

/// Compute the repayment duration of an interest-free loan.
#[derive(Clone, Debug, PartialEq)]
pub struct LoanDurationCmd {
    pub loan_amount: RawNumber,
    pub monthly_payment: RawNumber,
    pub currency: Currency,
}

impl LoanDurationCmd {
    #[must_use]
    pub fn new(loan_amount: impl Into<RawNumber>, monthly_payment: impl Into<RawNumber>) -> Self {
        Self {
            loan_amount: loan_amount.into(),
            monthly_payment: monthly_payment.into(),
            currency: Currency::default(),
        }
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

/// One budget line as supplied by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseLine {
    /// Display label, kept verbatim in the breakdown.
    pub label: String,
    /// Explicit tag; when absent it is resolved from the label.
    pub category: Option<ExpenseCategory>,
    pub amount: RawNumber,
}

/// Simulate a monthly budget.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetCmd {
    pub monthly_income: RawNumber,
    pub expenses: Vec<ExpenseLine>,
    pub savings_goal: Option<RawNumber>,
    pub currency: Currency,
}

impl BudgetCmd {
    #[must_use]
    pub fn new(monthly_income: impl Into<RawNumber>) -> Self {
        Self {
            monthly_income: monthly_income.into(),
            expenses: Vec::new(),
            savings_goal: None,
            currency: Currency::default(),
        }
    }

    #[must_use]
    pub fn expense(mut self, label: impl Into<String>, amount: impl Into<RawNumber>) -> Self {
        self.expenses.push(ExpenseLine {
            label: label.into(),
            category: None,
            amount: amount.into(),
        });
        self
    }

    #[must_use]
    pub fn tagged_expense(
        mut self,
        label: impl Into<String>,
        category: ExpenseCategory,
        amount: impl Into<RawNumber>,
    ) -> Self {
        self.expenses.push(ExpenseLine {
            label: label.into(),
            category: Some(category),
            amount: amount.into(),
        });
        self
    }

    #[must_use]
    pub fn savings_goal(mut self, goal: impl Into<RawNumber>) -> Self {
        self.savings_goal = Some(goal.into());
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

/// Where the nisab threshold comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum NisabSource {
    /// A threshold already expressed in the result currency.
    Fixed(RawNumber),
    /// Gold price per gram; the threshold is the configured gold weight.
    Gold { price_per_gram: RawNumber },
    /// Silver price per gram; the threshold is the configured silver weight.
    Silver { price_per_gram: RawNumber },
}

/// Compute zakat on net assets.
#[derive(Clone, Debug, PartialEq)]
pub struct ZakatCmd {
    pub assets: RawNumber,
    pub debts: Option<RawNumber>,
    pub nisab: Option<NisabSource>,
    pub currency: Currency,
}

impl ZakatCmd {
    #[must_use]
    pub fn new(assets: impl Into<RawNumber>) -> Self {
        Self {
            assets: assets.into(),
            debts: None,
            nisab: None,
            currency: Currency::default(),
        }
    }

    #[must_use]
    pub fn debts(mut self, debts: impl Into<RawNumber>) -> Self {
        self.debts = Some(debts.into());
        self
    }

    #[must_use]
    pub fn nisab(mut self, nisab: NisabSource) -> Self {
        self.nisab = Some(nisab);
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_requires_exactly_one_field() {
        assert_eq!(
            SavingsStrategy::from_options(Some(100.into()), None).unwrap(),
            SavingsStrategy::ByMonthlySaving(100.into())
        );
        assert_eq!(
            SavingsStrategy::from_options(None, Some(12.into())).unwrap(),
            SavingsStrategy::ByDuration(12.into())
        );
        assert_eq!(
            SavingsStrategy::from_options(None, None).unwrap_err().kind(),
            "usage"
        );
        assert_eq!(
            SavingsStrategy::from_options(Some(100.into()), Some(12.into()))
                .unwrap_err()
                .kind(),
            "usage"
        );
    }

    #[test]
    fn budget_builder_keeps_line_order() {
        let cmd = BudgetCmd::new(3000)
            .expense("rent", 1200)
            .tagged_expense("Courses", ExpenseCategory::Food, 400)
            .savings_goal(500);
        let labels: Vec<_> = cmd.expenses.iter().map(|line| line.label.as_str()).collect();
        assert_eq!(labels, ["rent", "Courses"]);
        assert_eq!(cmd.expenses[1].category, Some(ExpenseCategory::Food));
        assert_eq!(cmd.savings_goal, Some(500.into()));
    }
}
