use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Mad,
    Tnd,
    Dzd,
}

/// A number exactly as the client sent it: a JSON integer, a JSON decimal,
/// or a numeric string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

/// Body returned with every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// `validation`, `domain_constraint`, `usage`, `unauthorized`,
    /// `not_found` or `internal`.
    pub kind: String,
}

pub mod calculators {
    use std::{collections::BTreeMap, fmt};

    use serde::{
        Deserializer, Serializer,
        de::{MapAccess, Visitor},
        ser::SerializeMap,
    };

    use super::*;

    /// Expense label → monthly amount, in the order the client wrote them.
    ///
    /// Read from and written as a JSON object.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Expenses(Vec<(String, Numeric)>);

    impl Expenses {
        pub fn contains_key(&self, label: &str) -> bool {
            self.0.iter().any(|(key, _)| key == label)
        }

        pub fn iter(&self) -> impl Iterator<Item = (&str, &Numeric)> {
            self.0.iter().map(|(label, amount)| (label.as_str(), amount))
        }

        pub fn len(&self) -> usize {
            self.0.len()
        }

        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }

    impl From<Vec<(String, Numeric)>> for Expenses {
        fn from(value: Vec<(String, Numeric)>) -> Self {
            Self(value)
        }
    }

    impl Serialize for Expenses {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.0.len()))?;
            for (label, amount) in &self.0 {
                map.serialize_entry(label, amount)?;
            }
            map.end()
        }
    }

    impl<'de> Deserialize<'de> for Expenses {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct ExpensesVisitor;

            impl<'de> Visitor<'de> for ExpensesVisitor {
                type Value = Expenses;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("an object of expense label to amount")
                }

                fn visit_map<A: MapAccess<'de>>(
                    self,
                    mut access: A,
                ) -> Result<Expenses, A::Error> {
                    let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                    while let Some(entry) = access.next_entry::<String, Numeric>()? {
                        entries.push(entry);
                    }
                    Ok(Expenses(entries))
                }
            }

            deserializer.deserialize_map(ExpensesVisitor)
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SavingsPlanNew {
        pub target_amount: Option<Numeric>,
        pub monthly_saving: Option<Numeric>,
        pub duration_months: Option<Numeric>,
        pub currency: Option<Currency>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanDurationNew {
        pub loan_amount: Option<Numeric>,
        pub monthly_payment: Option<Numeric>,
        pub currency: Option<Currency>,
    }

    /// Category tag a client may attach to an expense label.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ExpenseCategory {
        Housing,
        Food,
        Transport,
        Health,
        Education,
        Leisure,
        Other,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSimulationNew {
        pub monthly_income: Option<Numeric>,
        #[serde(default)]
        pub expenses: Expenses,
        /// Optional explicit tags, keyed by the same labels as `expenses`.
        #[serde(default)]
        pub categories: BTreeMap<String, ExpenseCategory>,
        pub savings_goal: Option<Numeric>,
        pub currency: Option<Currency>,
    }

    /// At most one of `nisab_value`, `gold_price_per_gram` and
    /// `silver_price_per_gram` may be set. With none, the server default
    /// for the currency applies.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ZakatNew {
        pub assets: Option<Numeric>,
        pub debts: Option<Numeric>,
        pub nisab_value: Option<Numeric>,
        pub gold_price_per_gram: Option<Numeric>,
        pub silver_price_per_gram: Option<Numeric>,
        pub currency: Option<Currency>,
    }
}

pub mod history {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CalculationType {
        SavingsPlan,
        LoanDuration,
        BudgetSimulation,
        ZakatCalculation,
    }

    impl CalculationType {
        /// Returns the canonical string stored in the database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::SavingsPlan => "savings_plan",
                Self::LoanDuration => "loan_duration",
                Self::BudgetSimulation => "budget_simulation",
                Self::ZakatCalculation => "zakat_calculation",
            }
        }
    }

    /// Query string of the history endpoint.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct HistoryQuery {
        #[serde(rename = "type")]
        pub calculation_type: Option<CalculationType>,
        /// Defaults to 10, capped at 100.
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalculationView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub calculation_type: String,
        pub input: serde_json::Value,
        pub result: serde_json::Value,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryResponse {
        pub calculations: Vec<CalculationView>,
    }
}

pub mod tips {
    use super::*;

    /// Query string of the tips listing.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TipsQuery {
        pub category: Option<String>,
        /// Defaults to 10, capped at 50.
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TipView {
        pub id: i32,
        pub title: String,
        pub slug: String,
        pub content: String,
        pub summary: Option<String>,
        pub category: Option<String>,
        pub tags: Vec<String>,
        pub author: Option<String>,
        pub image_url: Option<String>,
        pub is_published: bool,
        pub views_count: i32,
        pub created_at: DateTime<Utc>,
        pub published_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TipsResponse {
        pub tips: Vec<TipView>,
        pub total: usize,
    }
}

pub mod service {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HealthStatus {
        pub status: String,
        pub timestamp: DateTime<Utc>,
    }

    /// Landing document: who we are and where the endpoints live.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ServiceIndex {
        pub app: String,
        pub version: String,
        pub description: String,
        /// Group name → endpoint name → path.
        pub endpoints: BTreeMap<String, BTreeMap<String, String>>,
    }
}

#[cfg(test)]
mod tests {
    use super::calculators::{BudgetSimulationNew, Expenses};
    use super::*;

    #[test]
    fn expenses_keep_client_order() {
        let body: BudgetSimulationNew = serde_json::from_str(
            r#"{"monthly_income": 3000, "expenses": {"rent": 1200, "food": "400", "car": 99.5}}"#,
        )
        .unwrap();
        let labels: Vec<_> = body.expenses.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, ["rent", "food", "car"]);
        assert_eq!(
            body.expenses.iter().nth(1).map(|(_, amount)| amount),
            Some(&Numeric::Text("400".to_string()))
        );
        assert!(body.expenses.contains_key("car"));

        let json = serde_json::to_string(&body.expenses).unwrap();
        assert_eq!(json, r#"{"rent":1200,"food":"400","car":99.5}"#);
    }

    #[test]
    fn missing_expenses_default_to_empty() {
        let body: BudgetSimulationNew =
            serde_json::from_str(r#"{"monthly_income": 3000}"#).unwrap();
        assert_eq!(body.expenses, Expenses::default());
    }
}
