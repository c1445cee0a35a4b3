//! Interest-free loan repayment.

use serde::Serialize;

use crate::{
    AmountConstraint, Calculator, Currency, EngineError, LoanDurationCmd, Money, ResultEngine,
    months_to_years, util, validate_amount,
};

/// One month of an amortization schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub month: u32,
    pub payment: Money,
    pub remaining_balance: Money,
    pub cumulative_paid: Money,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoanDurationResult {
    pub loan_amount: Money,
    pub currency: Currency,
    pub monthly_payment: Money,
    pub duration_months: u32,
    pub duration_years: f64,
    /// Sum of every installment, equal to the loan amount.
    pub total_paid: Money,
    /// The final, possibly partial, installment.
    pub last_payment: Money,
    /// The first months of the schedule only.
    pub payment_schedule: Vec<ScheduleEntry>,
}

/// Validated loan terms.
struct LoanTerms {
    loan_amount: Money,
    monthly_payment: Money,
    duration_months: u32,
}

impl Calculator {
    /// Compute how long a fixed monthly payment takes to repay a loan.
    pub fn loan_duration(&self, cmd: &LoanDurationCmd) -> ResultEngine<LoanDurationResult> {
        let terms = self.loan_terms(cmd)?;
        let schedule = amortize(&terms);

        let total_paid = schedule.iter().map(|entry| entry.payment).sum();
        let installments_before_last = i64::from(terms.duration_months - 1);
        let last_payment =
            Money::new(terms.loan_amount.cents() - terms.monthly_payment.cents() * installments_before_last);

        let mut payment_schedule = schedule;
        payment_schedule.truncate(self.config.schedule_preview_months);

        Ok(LoanDurationResult {
            loan_amount: terms.loan_amount,
            currency: cmd.currency,
            monthly_payment: terms.monthly_payment,
            duration_months: terms.duration_months,
            duration_years: months_to_years(terms.duration_months),
            total_paid,
            last_payment,
            payment_schedule,
        })
    }

    /// The complete amortization schedule, one entry per month.
    pub fn loan_schedule(&self, cmd: &LoanDurationCmd) -> ResultEngine<Vec<ScheduleEntry>> {
        self.loan_terms(cmd).map(|terms| amortize(&terms))
    }

    fn loan_terms(&self, cmd: &LoanDurationCmd) -> ResultEngine<LoanTerms> {
        let bounds = AmountConstraint::new(
            Some(self.config.min_loan_amount),
            Some(self.config.max_loan_amount),
        )?;
        let loan_amount = validate_amount(&cmd.loan_amount, &bounds)
            .map_err(|err| err.context("loan_amount"))?;
        let monthly_payment = validate_amount(
            &cmd.monthly_payment,
            &AmountConstraint::at_least(self.config.min_monthly_payment),
        )
        .map_err(|err| err.context("monthly_payment"))?;

        if monthly_payment > loan_amount {
            return Err(EngineError::Validation(
                "monthly_payment: monthly payment cannot exceed the loan amount".to_string(),
            ));
        }

        let months = util::ceil_div(
            i128::from(loan_amount.cents()),
            i128::from(monthly_payment.cents()),
        );
        let max = self.config.max_loan_duration_months;
        if months > i128::from(max) {
            return Err(EngineError::DomainConstraint(format!(
                "repayment would take {months} months, above the maximum of {max} months"
            )));
        }

        Ok(LoanTerms {
            loan_amount,
            monthly_payment,
            duration_months: months as u32,
        })
    }
}

fn amortize(terms: &LoanTerms) -> Vec<ScheduleEntry> {
    let mut schedule = Vec::with_capacity(terms.duration_months as usize);
    let mut remaining = terms.loan_amount;

    for month in 1..=terms.duration_months {
        let payment = terms.monthly_payment.min(remaining);
        remaining -= payment;
        schedule.push(ScheduleEntry {
            month,
            payment,
            remaining_balance: remaining,
            cumulative_paid: terms.loan_amount - remaining,
        });
        if !remaining.is_positive() {
            break;
        }
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> Calculator {
        Calculator::builder().build().unwrap()
    }

    #[test]
    fn partial_last_installment() {
        let loan = calculator()
            .loan_duration(&LoanDurationCmd::new(1000, 300))
            .unwrap();
        assert_eq!(loan.duration_months, 4);
        assert_eq!(loan.duration_years, 0.3);
        assert_eq!(loan.last_payment, Money::from_major(100));
        assert_eq!(loan.total_paid, Money::from_major(1000));

        let payments: Vec<_> = loan.payment_schedule.iter().map(|e| e.payment).collect();
        assert_eq!(
            payments,
            [300, 300, 300, 100].map(Money::from_major).to_vec()
        );
        let last = loan.payment_schedule.last().unwrap();
        assert_eq!(last.remaining_balance, Money::ZERO);
        assert_eq!(last.cumulative_paid, Money::from_major(1000));
    }

    #[test]
    fn schedule_preview_is_capped() {
        let loan = calculator()
            .loan_duration(&LoanDurationCmd::new(12_000, 500))
            .unwrap();
        assert_eq!(loan.duration_months, 24);
        assert_eq!(loan.payment_schedule.len(), 12);
        assert_eq!(loan.total_paid, Money::from_major(12_000));

        let full = calculator()
            .loan_schedule(&LoanDurationCmd::new(12_000, 500))
            .unwrap();
        assert_eq!(full.len(), 24);
        assert_eq!(full[..12], loan.payment_schedule[..]);
    }

    #[test]
    fn duration_over_cap_is_a_domain_error() {
        let err = calculator()
            .loan_duration(&LoanDurationCmd::new(100_000, 100))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::DomainConstraint(
                "repayment would take 1000 months, above the maximum of 360 months".to_string()
            )
        );
    }

    #[test]
    fn exactly_at_cap_is_accepted() {
        let loan = calculator()
            .loan_duration(&LoanDurationCmd::new(36_000, 100))
            .unwrap();
        assert_eq!(loan.duration_months, 360);
        assert_eq!(loan.duration_years, 30.0);
    }

    #[test]
    fn payment_above_loan_is_invalid() {
        let err = calculator()
            .loan_duration(&LoanDurationCmd::new(500, 600))
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn loan_bounds() {
        let calc = calculator();
        assert_eq!(
            calc.loan_duration(&LoanDurationCmd::new(99, 10))
                .unwrap_err()
                .to_string(),
            "loan_amount: minimum amount is 100.00"
        );
        assert_eq!(
            calc.loan_duration(&LoanDurationCmd::new(10_000_001, 100_000))
                .unwrap_err()
                .to_string(),
            "loan_amount: maximum amount is 10000000.00"
        );
        assert_eq!(
            calc.loan_duration(&LoanDurationCmd::new(1000, "0.5"))
                .unwrap_err()
                .to_string(),
            "monthly_payment: minimum amount is 1.00"
        );
    }
}
