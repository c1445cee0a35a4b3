//! Interest-free savings plan.

use serde::Serialize;

use crate::{
    AmountConstraint, Calculator, Currency, EngineError, Money, ResultEngine, SavingsPlanCmd,
    SavingsStrategy, months_to_years, util, validate_amount, validate_duration,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Reach the goal within the configured short horizon.
    Faster,
    /// Spread the goal over more months.
    Comfortable,
}

/// Advisory alternative plan. Never used in any decision.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavingsSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub monthly_saving: Money,
    pub duration_months: u32,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavingsPlanResult {
    pub target_amount: Money,
    pub currency: Currency,
    pub monthly_saving: Money,
    pub duration_months: u32,
    pub duration_years: f64,
    /// `monthly_saving * duration_months`, never below the target.
    pub total_saved: Money,
    pub suggestions: Vec<SavingsSuggestion>,
}

impl Calculator {
    /// Derive the missing half of a savings plan.
    ///
    /// With a monthly saving, the duration is `ceil(target / monthly)`. With
    /// a duration, the monthly saving is `target / months` rounded up to a
    /// whole unit. Both round towards meeting the goal.
    pub fn savings_plan(&self, cmd: &SavingsPlanCmd) -> ResultEngine<SavingsPlanResult> {
        let floor = AmountConstraint::at_least(self.config.min_monthly_saving);
        let target = validate_amount(&cmd.target_amount, &floor)
            .map_err(|err| err.context("target_amount"))?;

        let (monthly_saving, duration_months) = match &cmd.strategy {
            SavingsStrategy::ByMonthlySaving(raw) => {
                let monthly = validate_amount(raw, &floor)
                    .map_err(|err| err.context("monthly_saving"))?;
                let months = util::ceil_div(i128::from(target.cents()), i128::from(monthly.cents()));
                let months = u32::try_from(months).map_err(|_| {
                    EngineError::DomainConstraint("required duration is too long".to_string())
                })?;
                (monthly, months)
            }
            SavingsStrategy::ByDuration(raw) => {
                let months = validate_duration(raw, self.config.max_loan_duration_months)
                    .map_err(|err| err.context("duration_months"))?;
                let monthly = target.share_ceil_whole(i64::from(months)).ok_or_else(|| {
                    EngineError::Validation("target_amount: amount too large".to_string())
                })?;
                (monthly, months)
            }
        };

        let total_saved = monthly_saving
            .checked_mul(i64::from(duration_months))
            .ok_or_else(|| EngineError::Validation("amount too large".to_string()))?;

        Ok(SavingsPlanResult {
            target_amount: target,
            currency: cmd.currency,
            monthly_saving,
            duration_months,
            duration_years: months_to_years(duration_months),
            total_saved,
            suggestions: self.savings_suggestions(
                target,
                monthly_saving,
                duration_months,
                cmd.currency,
            ),
        })
    }

    fn savings_suggestions(
        &self,
        target: Money,
        monthly_saving: Money,
        duration_months: u32,
        currency: Currency,
    ) -> Vec<SavingsSuggestion> {
        let params = &self.config.savings;
        let mut suggestions = Vec::new();

        if duration_months > params.faster_plan_months {
            let months = params.faster_plan_months;
            if let Some(monthly) = target.share_ceil_whole(i64::from(months)) {
                suggestions.push(SavingsSuggestion {
                    kind: SuggestionKind::Faster,
                    monthly_saving: monthly,
                    duration_months: months,
                    description: format!(
                        "Saving {} per month reaches the goal in {months} months",
                        currency.format(monthly)
                    ),
                });
            }
        }

        let monthly_share = i128::from(monthly_saving.cents()) * 100;
        let trigger = i128::from(target.cents()) * i128::from(params.comfortable_trigger_percent);
        if monthly_share > trigger {
            let months = util::ceil_div(100, i128::from(params.comfortable_rate_percent)) as u32;
            if let Some(monthly) = target.share_ceil_whole(i64::from(months)) {
                suggestions.push(SavingsSuggestion {
                    kind: SuggestionKind::Comfortable,
                    monthly_saving: monthly,
                    duration_months: months,
                    description: format!(
                        "Saving {} per month over {months} months could be more comfortable",
                        currency.format(monthly)
                    ),
                });
            }
        }

        suggestions
    }
}
