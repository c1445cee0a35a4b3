//! Calculator API endpoints.
//!
//! Each handler maps the raw request body to an engine command, runs it and,
//! when the caller identified itself, records the calculation.

use api_types::{
    Numeric,
    calculators::{
        BudgetSimulationNew, ExpenseCategory as ApiCategory, LoanDurationNew, SavingsPlanNew,
        ZakatNew,
    },
    history::CalculationType,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::TypedHeader;
use engine::{
    BudgetCmd, BudgetResult, EngineError, LoanDurationCmd, LoanDurationResult, NisabSource,
    RawNumber, SavingsPlanCmd, SavingsPlanResult, SavingsStrategy, ZakatCmd, ZakatResult,
};
use serde::Serialize;

use crate::{ServerError, history, server::CallerId, server::ServerState};

fn map_number(value: &Numeric) -> RawNumber {
    match value {
        Numeric::Integer(value) => RawNumber::Integer(*value),
        Numeric::Decimal(value) => RawNumber::Decimal(*value),
        Numeric::Text(value) => RawNumber::Text(value.clone()),
    }
}

fn map_currency(currency: Option<api_types::Currency>) -> engine::Currency {
    match currency.unwrap_or_default() {
        api_types::Currency::Eur => engine::Currency::Eur,
        api_types::Currency::Usd => engine::Currency::Usd,
        api_types::Currency::Mad => engine::Currency::Mad,
        api_types::Currency::Tnd => engine::Currency::Tnd,
        api_types::Currency::Dzd => engine::Currency::Dzd,
    }
}

fn map_category(category: ApiCategory) -> engine::ExpenseCategory {
    match category {
        ApiCategory::Housing => engine::ExpenseCategory::Housing,
        ApiCategory::Food => engine::ExpenseCategory::Food,
        ApiCategory::Transport => engine::ExpenseCategory::Transport,
        ApiCategory::Health => engine::ExpenseCategory::Health,
        ApiCategory::Education => engine::ExpenseCategory::Education,
        ApiCategory::Leisure => engine::ExpenseCategory::Leisure,
        ApiCategory::Other => engine::ExpenseCategory::Other,
    }
}

fn required(value: Option<&Numeric>, field: &str) -> Result<RawNumber, EngineError> {
    value
        .map(map_number)
        .ok_or_else(|| EngineError::Usage(format!("missing field: {field}")))
}

fn savings_cmd(payload: &SavingsPlanNew) -> Result<SavingsPlanCmd, EngineError> {
    let target = required(payload.target_amount.as_ref(), "target_amount")?;
    let strategy = SavingsStrategy::from_options(
        payload.monthly_saving.as_ref().map(map_number),
        payload.duration_months.as_ref().map(map_number),
    )?;
    Ok(SavingsPlanCmd::new(target, strategy).currency(map_currency(payload.currency)))
}

fn loan_cmd(payload: &LoanDurationNew) -> Result<LoanDurationCmd, EngineError> {
    let loan = required(payload.loan_amount.as_ref(), "loan_amount")?;
    let monthly = required(payload.monthly_payment.as_ref(), "monthly_payment")?;
    Ok(LoanDurationCmd::new(loan, monthly).currency(map_currency(payload.currency)))
}

fn budget_cmd(payload: &BudgetSimulationNew) -> Result<BudgetCmd, EngineError> {
    let income = required(payload.monthly_income.as_ref(), "monthly_income")?;
    if let Some(label) = payload
        .categories
        .keys()
        .find(|label| !payload.expenses.contains_key(*label))
    {
        return Err(EngineError::Usage(format!(
            "category given for unknown expense '{label}'"
        )));
    }

    let mut cmd = BudgetCmd::new(income).currency(map_currency(payload.currency));
    for (label, amount) in payload.expenses.iter() {
        let amount = map_number(amount);
        cmd = match payload.categories.get(label) {
            Some(category) => cmd.tagged_expense(label, map_category(*category), amount),
            None => cmd.expense(label, amount),
        };
    }
    if let Some(goal) = &payload.savings_goal {
        cmd = cmd.savings_goal(map_number(goal));
    }
    Ok(cmd)
}

fn zakat_cmd(payload: &ZakatNew) -> Result<ZakatCmd, EngineError> {
    let assets = required(payload.assets.as_ref(), "assets")?;
    let nisab = match (
        &payload.nisab_value,
        &payload.gold_price_per_gram,
        &payload.silver_price_per_gram,
    ) {
        (None, None, None) => None,
        (Some(value), None, None) => Some(NisabSource::Fixed(map_number(value))),
        (None, Some(price), None) => Some(NisabSource::Gold {
            price_per_gram: map_number(price),
        }),
        (None, None, Some(price)) => Some(NisabSource::Silver {
            price_per_gram: map_number(price),
        }),
        _ => {
            return Err(EngineError::Usage(
                "supply at most one of nisab_value, gold_price_per_gram or silver_price_per_gram"
                    .to_string(),
            ));
        }
    };

    let mut cmd = ZakatCmd::new(assets).currency(map_currency(payload.currency));
    if let Some(debts) = &payload.debts {
        cmd = cmd.debts(map_number(debts));
    }
    if let Some(nisab) = nisab {
        cmd = cmd.nisab(nisab);
    }
    Ok(cmd)
}

/// Record the calculation when the caller is known. A storage failure is
/// logged and does not fail the request.
async fn remember<I, R>(
    state: &ServerState,
    caller: Option<TypedHeader<CallerId>>,
    kind: CalculationType,
    input: &I,
    result: &R,
) where
    I: Serialize,
    R: Serialize,
{
    let Some(TypedHeader(CallerId(user_id))) = caller else {
        return;
    };
    if let Err(err) = history::record(&state.db, &user_id, kind, input, result).await {
        tracing::warn!(
            "failed to record {} for user {user_id}: {err}",
            kind.as_str()
        );
    }
}

pub async fn savings_plan(
    caller: Option<TypedHeader<CallerId>>,
    State(state): State<ServerState>,
    payload: Result<Json<SavingsPlanNew>, JsonRejection>,
) -> Result<Json<SavingsPlanResult>, ServerError> {
    let Json(payload) = payload?;
    let result = state.calculator.savings_plan(&savings_cmd(&payload)?)?;
    remember(&state, caller, CalculationType::SavingsPlan, &payload, &result).await;
    Ok(Json(result))
}

pub async fn loan_duration(
    caller: Option<TypedHeader<CallerId>>,
    State(state): State<ServerState>,
    payload: Result<Json<LoanDurationNew>, JsonRejection>,
) -> Result<Json<LoanDurationResult>, ServerError> {
    let Json(payload) = payload?;
    let result = state.calculator.loan_duration(&loan_cmd(&payload)?)?;
    remember(&state, caller, CalculationType::LoanDuration, &payload, &result).await;
    Ok(Json(result))
}

pub async fn budget_simulation(
    caller: Option<TypedHeader<CallerId>>,
    State(state): State<ServerState>,
    payload: Result<Json<BudgetSimulationNew>, JsonRejection>,
) -> Result<Json<BudgetResult>, ServerError> {
    let Json(payload) = payload?;
    let result = state.calculator.simulate_budget(&budget_cmd(&payload)?)?;
    remember(
        &state,
        caller,
        CalculationType::BudgetSimulation,
        &payload,
        &result,
    )
    .await;
    Ok(Json(result))
}

pub async fn zakat(
    caller: Option<TypedHeader<CallerId>>,
    State(state): State<ServerState>,
    payload: Result<Json<ZakatNew>, JsonRejection>,
) -> Result<Json<ZakatResult>, ServerError> {
    let Json(payload) = payload?;
    let result = state.calculator.zakat(&zakat_cmd(&payload)?)?;
    remember(
        &state,
        caller,
        CalculationType::ZakatCalculation,
        &payload,
        &result,
    )
    .await;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use api_types::calculators::Expenses;

    use super::*;

    fn zakat_payload() -> ZakatNew {
        ZakatNew {
            assets: Some(Numeric::Integer(5000)),
            debts: None,
            nisab_value: None,
            gold_price_per_gram: None,
            silver_price_per_gram: None,
            currency: None,
        }
    }

    #[test]
    fn missing_target_is_usage_error() {
        let payload = SavingsPlanNew {
            target_amount: None,
            monthly_saving: Some(Numeric::Integer(100)),
            duration_months: None,
            currency: None,
        };
        let err = savings_cmd(&payload).unwrap_err();
        assert_eq!(err, EngineError::Usage("missing field: target_amount".to_string()));
    }

    #[test]
    fn numbers_keep_their_shape() {
        assert_eq!(map_number(&Numeric::Integer(3)), RawNumber::Integer(3));
        assert_eq!(map_number(&Numeric::Decimal(2.5)), RawNumber::Decimal(2.5));
        assert_eq!(
            map_number(&Numeric::Text("12,50".to_string())),
            RawNumber::Text("12,50".to_string())
        );
    }

    #[test]
    fn currency_defaults_to_eur() {
        assert_eq!(map_currency(None), engine::Currency::Eur);
        assert_eq!(
            map_currency(Some(api_types::Currency::Tnd)),
            engine::Currency::Tnd
        );
    }

    #[test]
    fn budget_tags_follow_labels() {
        let payload = BudgetSimulationNew {
            monthly_income: Some(Numeric::Integer(3000)),
            expenses: Expenses::from(vec![
                ("misc".to_string(), Numeric::Integer(50)),
                ("flat".to_string(), Numeric::Integer(1000)),
            ]),
            categories: BTreeMap::from([("flat".to_string(), ApiCategory::Housing)]),
            savings_goal: None,
            currency: None,
        };
        let cmd = budget_cmd(&payload).unwrap();
        assert_eq!(cmd.expenses.len(), 2);
        assert_eq!(cmd.expenses[0].label, "misc");
        assert_eq!(cmd.expenses[0].category, None);
        assert_eq!(
            cmd.expenses[1].category,
            Some(engine::ExpenseCategory::Housing)
        );
    }

    #[test]
    fn budget_tag_for_unknown_label_is_rejected() {
        let payload = BudgetSimulationNew {
            monthly_income: Some(Numeric::Integer(3000)),
            expenses: Expenses::default(),
            categories: BTreeMap::from([("rent".to_string(), ApiCategory::Housing)]),
            savings_goal: None,
            currency: None,
        };
        assert_eq!(budget_cmd(&payload).unwrap_err().kind(), "usage");
    }

    #[test]
    fn zakat_nisab_from_gold() {
        let payload = ZakatNew {
            gold_price_per_gram: Some(Numeric::Integer(60)),
            ..zakat_payload()
        };
        let cmd = zakat_cmd(&payload).unwrap();
        assert_eq!(
            cmd.nisab,
            Some(NisabSource::Gold {
                price_per_gram: RawNumber::Integer(60)
            })
        );
    }

    #[test]
    fn zakat_with_two_nisab_sources_is_rejected() {
        let payload = ZakatNew {
            nisab_value: Some(Numeric::Integer(3000)),
            silver_price_per_gram: Some(Numeric::Decimal(0.8)),
            ..zakat_payload()
        };
        assert_eq!(zakat_cmd(&payload).unwrap_err().kind(), "usage");
    }
}
