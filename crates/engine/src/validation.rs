//! Input validation shared by every calculator.
//!
//! Callers hand over [`RawNumber`]s exactly as they received them (JSON
//! integers, JSON decimals, or numeric strings). Validation coerces them into
//! [`Money`] or a month count and rejects anything malformed or out of range
//! with [`EngineError::Validation`]; it never panics on bad input.

use crate::{EngineError, Money, ResultEngine};

/// An unvalidated numeric input.
#[derive(Clone, Debug, PartialEq)]
pub enum RawNumber {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl RawNumber {
    /// Coerce into an amount of money (major units in, cents out).
    pub fn to_money(&self) -> ResultEngine<Money> {
        match self {
            RawNumber::Integer(units) => units
                .checked_mul(100)
                .map(Money::new)
                .ok_or_else(|| EngineError::Validation("amount too large".to_string())),
            RawNumber::Decimal(value) => Money::from_major_f64(*value),
            RawNumber::Text(text) => text.parse(),
        }
    }

    /// Coerce into a whole number. Fractional values are rejected, not
    /// truncated.
    ///
    /// Text follows the same grammar as amounts (`12`, `12.0`, `12,00`), so
    /// exponents such as `1e2` are refused.
    pub fn to_whole(&self) -> ResultEngine<i64> {
        let invalid = || EngineError::Validation("invalid duration".to_string());

        match self {
            RawNumber::Integer(value) => Ok(*value),
            RawNumber::Decimal(value) => {
                if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                    Ok(*value as i64)
                } else {
                    Err(invalid())
                }
            }
            RawNumber::Text(text) => {
                let parsed: Money = text.parse().map_err(|_| invalid())?;
                if parsed.cents() % 100 != 0 {
                    return Err(invalid());
                }
                Ok(parsed.cents() / 100)
            }
        }
    }
}

impl From<i64> for RawNumber {
    fn from(value: i64) -> Self {
        RawNumber::Integer(value)
    }
}

impl From<i32> for RawNumber {
    fn from(value: i32) -> Self {
        RawNumber::Integer(i64::from(value))
    }
}

impl From<u32> for RawNumber {
    fn from(value: u32) -> Self {
        RawNumber::Integer(i64::from(value))
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Decimal(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

impl From<String> for RawNumber {
    fn from(value: String) -> Self {
        RawNumber::Text(value)
    }
}

impl From<Money> for RawNumber {
    fn from(value: Money) -> Self {
        RawNumber::Text(value.to_string())
    }
}

/// Optional bounds for a strictly positive amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AmountConstraint {
    minimum: Option<Money>,
    maximum: Option<Money>,
}

impl AmountConstraint {
    /// Build a constraint; fails when `minimum > maximum`.
    pub fn new(minimum: Option<Money>, maximum: Option<Money>) -> ResultEngine<Self> {
        if let (Some(min), Some(max)) = (minimum, maximum)
            && min > max
        {
            return Err(EngineError::Validation(format!(
                "minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { minimum, maximum })
    }

    /// Any amount > 0.
    #[must_use]
    pub const fn positive() -> Self {
        Self {
            minimum: None,
            maximum: None,
        }
    }

    #[must_use]
    pub const fn at_least(minimum: Money) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: None,
        }
    }

    #[must_use]
    pub const fn minimum(&self) -> Option<Money> {
        self.minimum
    }

    #[must_use]
    pub const fn maximum(&self) -> Option<Money> {
        self.maximum
    }
}

/// Validate a strictly positive amount against optional bounds.
pub fn validate_amount(value: &RawNumber, constraint: &AmountConstraint) -> ResultEngine<Money> {
    let amount = value
        .to_money()
        .map_err(|_| EngineError::Validation("invalid amount".to_string()))?;
    if !amount.is_positive() {
        return Err(EngineError::Validation(
            "amount must be positive".to_string(),
        ));
    }
    if let Some(min) = constraint.minimum
        && amount < min
    {
        return Err(EngineError::Validation(format!("minimum amount is {min}")));
    }
    if let Some(max) = constraint.maximum
        && amount > max
    {
        return Err(EngineError::Validation(format!("maximum amount is {max}")));
    }
    Ok(amount)
}

/// Validate an amount that may be zero (incomes, expenses, assets).
pub fn validate_non_negative(value: &RawNumber) -> ResultEngine<Money> {
    let amount = value
        .to_money()
        .map_err(|_| EngineError::Validation("invalid amount".to_string()))?;
    if amount.is_negative() {
        return Err(EngineError::Validation(
            "amount must not be negative".to_string(),
        ));
    }
    Ok(amount)
}

/// Validate a duration in whole months within `1..=max_months`.
pub fn validate_duration(value: &RawNumber, max_months: u32) -> ResultEngine<u32> {
    let months = value.to_whole()?;
    if months <= 0 {
        return Err(EngineError::Validation(
            "duration must be positive".to_string(),
        ));
    }
    if months > i64::from(max_months) {
        return Err(EngineError::Validation(format!(
            "maximum duration is {max_months} months"
        )));
    }
    u32::try_from(months).map_err(|_| EngineError::Validation("invalid duration".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(min: i64, max: i64) -> AmountConstraint {
        AmountConstraint::new(Some(Money::from_major(min)), Some(Money::from_major(max))).unwrap()
    }

    #[test]
    fn amount_accepts_numbers_and_numeric_strings() {
        let c = AmountConstraint::positive();
        assert_eq!(validate_amount(&12.into(), &c).unwrap(), Money::from_major(12));
        assert_eq!(validate_amount(&12.5.into(), &c).unwrap(), Money::new(1250));
        assert_eq!(validate_amount(&"12,5".into(), &c).unwrap(), Money::new(1250));
    }

    #[test]
    fn amount_rejects_non_numeric_without_panicking() {
        let err = validate_amount(&"twelve".into(), &AmountConstraint::positive()).unwrap_err();
        assert_eq!(err, EngineError::Validation("invalid amount".to_string()));
        assert!(validate_amount(&f64::NAN.into(), &AmountConstraint::positive()).is_err());
    }

    #[test]
    fn amount_enforces_sign_and_bounds() {
        let c = bounded(100, 1000);
        assert_eq!(
            validate_amount(&0.into(), &c).unwrap_err().to_string(),
            "amount must be positive"
        );
        assert_eq!(
            validate_amount(&(-5).into(), &c).unwrap_err().to_string(),
            "amount must be positive"
        );
        assert_eq!(
            validate_amount(&99.into(), &c).unwrap_err().to_string(),
            "minimum amount is 100.00"
        );
        assert_eq!(
            validate_amount(&1001.into(), &c).unwrap_err().to_string(),
            "maximum amount is 1000.00"
        );
        assert!(validate_amount(&100.into(), &c).is_ok());
        assert!(validate_amount(&1000.into(), &c).is_ok());
    }

    #[test]
    #[should_panic(expected = "minimum 10.00 exceeds maximum 5.00")]
    fn fail_inverted_constraint() {
        bounded(10, 5);
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(validate_non_negative(&0.into()).unwrap(), Money::ZERO);
        assert!(validate_non_negative(&(-1).into()).is_err());
    }

    #[test]
    fn duration_rules() {
        assert_eq!(validate_duration(&12.into(), 360).unwrap(), 12);
        assert_eq!(validate_duration(&"24".into(), 360).unwrap(), 24);
        assert_eq!(validate_duration(&36.0.into(), 360).unwrap(), 36);
        assert_eq!(
            validate_duration(&0.into(), 360).unwrap_err().to_string(),
            "duration must be positive"
        );
        assert_eq!(
            validate_duration(&361.into(), 360).unwrap_err().to_string(),
            "maximum duration is 360 months"
        );
        assert_eq!(
            validate_duration(&12.5.into(), 360).unwrap_err().to_string(),
            "invalid duration"
        );
        assert!(validate_duration(&"soon".into(), 360).is_err());
    }

    #[test]
    fn duration_text_uses_amount_grammar() {
        assert_eq!(validate_duration(&"12.0".into(), 360).unwrap(), 12);
        assert_eq!(validate_duration(&" 6,00 ".into(), 360).unwrap(), 6);
        for text in ["1e2", "1E1", "inf", "NaN", "12.5", "0x10"] {
            assert_eq!(
                validate_duration(&text.into(), 360).unwrap_err().to_string(),
                "invalid duration",
                "{text}"
            );
        }
        assert!("1e2".parse::<Money>().is_err());
    }
}
