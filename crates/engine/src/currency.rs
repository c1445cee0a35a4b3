use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

/// ISO currency code attached to a calculation and its money values.
///
/// The engine never converts between currencies: the caller normalizes
/// amounts before calling. The currency labels results, formats amounts in
/// human-readable messages and selects the default nisab.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    #[serde(alias = "eur")]
    Eur,
    #[serde(alias = "usd")]
    Usd,
    #[serde(alias = "mad")]
    Mad,
    #[serde(alias = "tnd")]
    Tnd,
    #[serde(alias = "dzd")]
    Dzd,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Eur,
        Currency::Usd,
        Currency::Mad,
        Currency::Tnd,
        Currency::Dzd,
    ];

    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Mad => "MAD",
            Currency::Tnd => "TND",
            Currency::Dzd => "DZD",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Mad => "DH",
            Currency::Tnd => "DT",
            Currency::Dzd => "DA",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Currency::Eur => "Euro",
            Currency::Usd => "US Dollar",
            Currency::Mad => "Moroccan Dirham",
            Currency::Tnd => "Tunisian Dinar",
            Currency::Dzd => "Algerian Dinar",
        }
    }

    /// Formats an amount for messages, e.g. `1,234.56 €`.
    #[must_use]
    pub fn format(self, amount: Money) -> String {
        let plain = amount.abs().to_string();
        let (units, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (idx, digit) in units.chars().enumerate() {
            if idx > 0 && (units.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if amount.is_negative() { "-" } else { "" };
        format!("{sign}{grouped}.{cents} {}", self.symbol())
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code() == code)
            .ok_or_else(|| EngineError::Validation(format!("unsupported currency: {code}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Currency::try_from("eur").unwrap(), Currency::Eur);
        assert_eq!(Currency::try_from(" mad ").unwrap(), Currency::Mad);
    }

    #[test]
    #[should_panic(expected = "unsupported currency: GBP")]
    fn fail_unknown_currency() {
        Currency::try_from("gbp").unwrap();
    }

    #[test]
    fn format_groups_thousands() {
        assert_eq!(Currency::Eur.format(Money::new(123_456)), "1,234.56 €");
        assert_eq!(Currency::Mad.format(Money::from_major(100)), "100.00 DH");
        assert_eq!(Currency::Usd.format(Money::new(-1_000_000_00)), "-1,000,000.00 $");
        assert_eq!(Currency::Eur.format(Money::ZERO), "0.00 €");
    }
}
