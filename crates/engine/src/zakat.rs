//! Zakat on net assets.

use serde::Serialize;

use crate::{
    AmountConstraint, Calculator, Currency, EngineError, Money, NisabSource, RawNumber,
    ResultEngine, ZakatCmd, util, validate_amount, validate_non_negative,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZakatResult {
    pub currency: Currency,
    /// `assets - debts`, may be negative.
    pub net_assets: Money,
    pub nisab_value: Money,
    pub eligible: bool,
    /// Present iff `eligible`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zakat_amount: Option<Money>,
    /// Present iff not `eligible`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<Money>,
}

impl Calculator {
    /// Compute the zakat due on `assets - debts`.
    pub fn zakat(&self, cmd: &ZakatCmd) -> ResultEngine<ZakatResult> {
        let assets =
            validate_non_negative(&cmd.assets).map_err(|err| err.context("assets"))?;
        let debts = cmd
            .debts
            .as_ref()
            .map(|raw| validate_non_negative(raw).map_err(|err| err.context("debts")))
            .transpose()?
            .unwrap_or(Money::ZERO);
        let nisab_value = self.resolve_nisab(cmd.nisab.as_ref(), cmd.currency)?;

        let net_assets = assets - debts;
        let eligible = net_assets >= nisab_value;

        let (zakat_amount, shortfall) = if eligible {
            let due = util::round_div(
                i128::from(net_assets.cents()) * i128::from(self.config.zakat.rate_basis_points),
                10_000,
            );
            (Some(Money::new(due as i64)), None)
        } else {
            let shortfall = nisab_value
                .checked_sub(net_assets)
                .ok_or_else(|| EngineError::Validation("amount too large".to_string()))?;
            (None, Some(shortfall))
        };

        Ok(ZakatResult {
            currency: cmd.currency,
            net_assets,
            nisab_value,
            eligible,
            zakat_amount,
            shortfall,
        })
    }

    fn resolve_nisab(&self, source: Option<&NisabSource>, currency: Currency) -> ResultEngine<Money> {
        let zakat = &self.config.zakat;
        let by_weight = |price: &RawNumber, grams: u32, label: &str| {
            let price = validate_amount(price, &AmountConstraint::positive())
                .map_err(|err| err.context(label))?;
            price
                .checked_mul(i64::from(grams))
                .ok_or_else(|| EngineError::Validation(format!("{label}: amount too large")))
        };

        match source {
            None => Ok(zakat.nisab_for(currency)),
            Some(NisabSource::Fixed(raw)) => validate_amount(raw, &AmountConstraint::positive())
                .map_err(|err| err.context("nisab_value")),
            Some(NisabSource::Gold { price_per_gram }) => {
                by_weight(price_per_gram, zakat.gold_nisab_grams, "gold_price_per_gram")
            }
            Some(NisabSource::Silver { price_per_gram }) => {
                by_weight(price_per_gram, zakat.silver_nisab_grams, "silver_price_per_gram")
            }
        }
    }
}
