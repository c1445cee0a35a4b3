//! Monthly budget simulation and recommendations.

use std::{cmp::Ordering, collections::HashSet};

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use crate::{
    BudgetCmd, Calculator, Currency, EngineError, Money, ResultEngine, util,
    validate_non_negative,
};

/// Category tag driving the recommendation rules.
///
/// Callers may tag a line explicitly; otherwise the tag is resolved from the
/// display label through a small alias vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Housing,
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Health,
        ExpenseCategory::Education,
        ExpenseCategory::Leisure,
        ExpenseCategory::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Health => "health",
            Self::Education => "education",
            Self::Leisure => "leisure",
            Self::Other => "other",
        }
    }

    /// Normalized labels recognized for each tag.
    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Housing => &["housing", "rent", "mortgage", "logement", "loyer"],
            Self::Food => &["food", "groceries", "alimentation", "nourriture", "courses"],
            Self::Transport => &["transport", "transportation", "transports"],
            Self::Health => &["health", "healthcare", "sante"],
            Self::Education => &["education", "school", "ecole"],
            Self::Leisure => &["leisure", "entertainment", "loisirs"],
            Self::Other => &["other", "others", "autre", "autres"],
        }
    }

    /// Resolve a tag from a free-form label, ignoring case and accents.
    /// Unknown labels are [`ExpenseCategory::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let Some(key) = util::normalize_key(label) else {
            return Self::Other;
        };
        Self::ALL
            .into_iter()
            .find(|category| category.aliases().contains(&key.as_str()))
            .unwrap_or(Self::Other)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Surplus,
    Balanced,
    Deficit,
}

impl BudgetStatus {
    fn from_savings(available: Money) -> Self {
        match available.cents().cmp(&0) {
            Ordering::Greater => Self::Surplus,
            Ordering::Equal => Self::Balanced,
            Ordering::Less => Self::Deficit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Savings,
    Expense,
    Budget,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    /// Label of the expense line the advice is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpenseShare {
    pub category: ExpenseCategory,
    pub amount: Money,
    /// Share of the monthly income, one decimal.
    pub percentage: f64,
}

/// Expense shares keyed by label, kept in the order the expenses were given.
///
/// Serialized as a JSON object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseBreakdown(Vec<(String, ExpenseShare)>);

impl ExpenseBreakdown {
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&ExpenseShare> {
        self.0
            .iter()
            .find_map(|(key, share)| (key == label).then_some(share))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExpenseShare)> {
        self.0.iter().map(|(label, share)| (label.as_str(), share))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ExpenseShare)> for ExpenseBreakdown {
    fn from_iter<I: IntoIterator<Item = (String, ExpenseShare)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for ExpenseBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, share) in &self.0 {
            map.serialize_entry(label, share)?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavingsGoalAnalysis {
    pub savings_goal: Money,
    pub goal_achievable: bool,
    /// `max(0, goal - available_savings)`.
    pub goal_gap: Money,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetResult {
    pub monthly_income: Money,
    pub currency: Currency,
    pub total_expenses: Money,
    pub expense_breakdown: ExpenseBreakdown,
    pub available_savings: Money,
    pub savings_rate: f64,
    pub budget_status: BudgetStatus,
    #[serde(flatten)]
    pub savings_goal: Option<SavingsGoalAnalysis>,
    pub recommendations: Vec<Recommendation>,
}

/// Validated expense line.
struct Line<'a> {
    label: &'a str,
    category: ExpenseCategory,
    amount: Money,
}

impl Calculator {
    /// Break a monthly budget down and annotate it with recommendations.
    pub fn simulate_budget(&self, cmd: &BudgetCmd) -> ResultEngine<BudgetResult> {
        let income = validate_non_negative(&cmd.monthly_income)
            .map_err(|err| err.context("monthly_income"))?;

        let mut seen = HashSet::new();
        let mut lines = Vec::with_capacity(cmd.expenses.len());
        let mut total_expenses = Money::ZERO;
        for line in &cmd.expenses {
            let Some(key) = util::normalize_key(&line.label) else {
                return Err(EngineError::Validation(
                    "expense label must not be empty".to_string(),
                ));
            };
            if !seen.insert(key) {
                return Err(EngineError::Validation(format!(
                    "duplicate expense '{}'",
                    line.label
                )));
            }
            let amount = validate_non_negative(&line.amount)
                .map_err(|err| err.context(&format!("expense '{}'", line.label)))?;
            total_expenses = total_expenses
                .checked_add(amount)
                .ok_or_else(|| EngineError::Validation("amount too large".to_string()))?;
            lines.push(Line {
                label: &line.label,
                category: line
                    .category
                    .unwrap_or_else(|| ExpenseCategory::from_label(&line.label)),
                amount,
            });
        }

        let savings_goal = cmd
            .savings_goal
            .as_ref()
            .map(|raw| validate_non_negative(raw).map_err(|err| err.context("savings_goal")))
            .transpose()?;

        let available_savings = income - total_expenses;
        let savings_goal = savings_goal
            .map(|goal| {
                let gap = goal
                    .checked_sub(available_savings)
                    .ok_or_else(|| EngineError::Validation("amount too large".to_string()))?;
                Ok(SavingsGoalAnalysis {
                    savings_goal: goal,
                    goal_achievable: available_savings >= goal,
                    goal_gap: gap.max(Money::ZERO),
                })
            })
            .transpose()?;
        let expense_breakdown = lines
            .iter()
            .map(|line| {
                let share = ExpenseShare {
                    category: line.category,
                    amount: line.amount,
                    percentage: percentage(line.amount, income),
                };
                (line.label.to_string(), share)
            })
            .collect();

        Ok(BudgetResult {
            monthly_income: income,
            currency: cmd.currency,
            total_expenses,
            expense_breakdown,
            available_savings,
            savings_rate: percentage(available_savings, income),
            budget_status: BudgetStatus::from_savings(available_savings),
            savings_goal,
            recommendations: self.budget_recommendations(
                income,
                available_savings,
                &lines,
                cmd.currency,
            ),
        })
    }

    fn budget_recommendations(
        &self,
        income: Money,
        available_savings: Money,
        lines: &[Line<'_>],
        currency: Currency,
    ) -> Vec<Recommendation> {
        let thresholds = &self.config.budget;
        let mut recommendations = Vec::new();

        let low = thresholds.low_savings_rate_percent;
        let high = thresholds.high_savings_rate_percent;
        if compare_share(available_savings, income, low) == Ordering::Less {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Savings,
                priority: Priority::High,
                category: None,
                description: format!(
                    "Your savings rate is low. Try to save at least {low}% of your income"
                ),
            });
        } else if compare_share(available_savings, income, high) != Ordering::Less {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Savings,
                priority: Priority::Info,
                category: None,
                description: format!(
                    "Excellent savings rate! You save at least {high}% of your income"
                ),
            });
        }

        for line in lines {
            let share = percentage(line.amount, income);
            match line.category {
                ExpenseCategory::Housing
                    if compare_share(line.amount, income, thresholds.housing_max_share_percent)
                        == Ordering::Greater =>
                {
                    recommendations.push(Recommendation {
                        kind: RecommendationKind::Expense,
                        priority: Priority::Medium,
                        category: Some(line.label.to_string()),
                        description: format!(
                            "Your {} expenses take {share}% of your income. Ideally stay under {}%",
                            line.label, thresholds.housing_max_share_percent
                        ),
                    });
                }
                ExpenseCategory::Food
                    if compare_share(line.amount, income, thresholds.food_max_share_percent)
                        == Ordering::Greater =>
                {
                    recommendations.push(Recommendation {
                        kind: RecommendationKind::Expense,
                        priority: Priority::Low,
                        category: Some(line.label.to_string()),
                        description: format!(
                            "Your {} expenses look high ({share}%). Look for ways to reduce them",
                            line.label
                        ),
                    });
                }
                _ => {}
            }
        }

        if available_savings.is_negative() {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Budget,
                priority: Priority::Critical,
                category: None,
                description: format!(
                    "Warning! Your budget is in deficit by {}. Reduce your expenses or increase your income",
                    currency.format(available_savings.abs())
                ),
            });
        }

        recommendations
    }
}

/// `part / whole * 100`, one decimal, 0 when `whole` is zero.
fn percentage(part: Money, whole: Money) -> f64 {
    util::round_tenths(i128::from(part.cents()) * 100, i128::from(whole.cents()))
}

/// Compare the exact share `part / whole` with `percent`%. A zero `whole`
/// counts as a 0% share.
fn compare_share(part: Money, whole: Money, percent: u32) -> Ordering {
    if whole.is_zero() {
        return 0.cmp(&percent);
    }
    let lhs = i128::from(part.cents()) * 100;
    let rhs = i128::from(whole.cents()) * i128::from(percent);
    lhs.cmp(&rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> Calculator {
        Calculator::builder().build().unwrap()
    }

    #[test]
    fn label_resolution_ignores_case_and_accents() {
        assert_eq!(ExpenseCategory::from_label("Logement"), ExpenseCategory::Housing);
        assert_eq!(ExpenseCategory::from_label("RENT"), ExpenseCategory::Housing);
        assert_eq!(ExpenseCategory::from_label("Nourriture"), ExpenseCategory::Food);
        assert_eq!(ExpenseCategory::from_label("Santé"), ExpenseCategory::Health);
        assert_eq!(ExpenseCategory::from_label("gym"), ExpenseCategory::Other);
    }

    #[test]
    fn surplus_budget() {
        let budget = calculator()
            .simulate_budget(&BudgetCmd::new(3000).expense("housing", 1200).expense("food", 400))
            .unwrap();
        assert_eq!(budget.total_expenses, Money::from_major(1600));
        assert_eq!(budget.available_savings, Money::from_major(1400));
        assert_eq!(budget.savings_rate, 46.7);
        assert_eq!(budget.budget_status, BudgetStatus::Surplus);

        let housing = budget.expense_breakdown.get("housing").unwrap();
        assert_eq!(housing.category, ExpenseCategory::Housing);
        assert_eq!(housing.percentage, 40.0);
        assert_eq!(budget.expense_breakdown.get("food").unwrap().percentage, 13.3);

        let priorities: Vec<_> = budget.recommendations.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, [Priority::Info, Priority::Medium]);
        assert_eq!(
            budget.recommendations[1].description,
            "Your housing expenses take 40% of your income. Ideally stay under 35%"
        );
    }

    #[test]
    fn deficit_budget_fires_every_rule() {
        let budget = calculator()
            .simulate_budget(
                &BudgetCmd::new(2000)
                    .expense("Loyer", 1500)
                    .expense("Alimentation", 700),
            )
            .unwrap();
        assert_eq!(budget.available_savings, Money::from_major(-200));
        assert_eq!(budget.savings_rate, -10.0);
        assert_eq!(budget.budget_status, BudgetStatus::Deficit);

        let priorities: Vec<_> = budget.recommendations.iter().map(|r| r.priority).collect();
        assert_eq!(
            priorities,
            [Priority::High, Priority::Medium, Priority::Low, Priority::Critical]
        );
        let alert = budget.recommendations.last().unwrap();
        assert_eq!(alert.kind, RecommendationKind::Budget);
        assert!(alert.description.contains("200.00 €"));
    }

    #[test]
    fn balanced_budget() {
        let budget = calculator()
            .simulate_budget(&BudgetCmd::new(1000).expense("rent", 1000))
            .unwrap();
        assert_eq!(budget.budget_status, BudgetStatus::Balanced);
        assert_eq!(budget.savings_rate, 0.0);
    }

    #[test]
    fn zero_income_has_zero_shares() {
        let budget = calculator()
            .simulate_budget(&BudgetCmd::new(0).expense("food", 50))
            .unwrap();
        assert_eq!(budget.expense_breakdown.get("food").unwrap().percentage, 0.0);
        assert_eq!(budget.savings_rate, 0.0);
        assert_eq!(budget.budget_status, BudgetStatus::Deficit);
        assert_eq!(budget.recommendations[0].priority, Priority::High);
    }

    #[test]
    fn explicit_tag_wins_over_label() {
        let budget = calculator()
            .simulate_budget(
                &BudgetCmd::new(1000).tagged_expense("Appartement", ExpenseCategory::Housing, 500),
            )
            .unwrap();
        assert_eq!(
            budget.expense_breakdown.get("Appartement").unwrap().category,
            ExpenseCategory::Housing
        );
        assert!(
            budget
                .recommendations
                .iter()
                .any(|r| r.category.as_deref() == Some("Appartement"))
        );
    }

    #[test]
    fn savings_goal_gap() {
        let calc = calculator();
        let reached = calc
            .simulate_budget(&BudgetCmd::new(3000).expense("rent", 1000).savings_goal(500))
            .unwrap();
        let goal = reached.savings_goal.unwrap();
        assert!(goal.goal_achievable);
        assert_eq!(goal.goal_gap, Money::ZERO);

        let missed = calc
            .simulate_budget(&BudgetCmd::new(3000).expense("rent", 2800).savings_goal(500))
            .unwrap();
        let goal = missed.savings_goal.unwrap();
        assert!(!goal.goal_achievable);
        assert_eq!(goal.goal_gap, Money::from_major(300));
    }

    #[test]
    fn invalid_expense_names_the_line() {
        let err = calculator()
            .simulate_budget(&BudgetCmd::new(3000).expense("transport", -10))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("expense 'transport': amount must not be negative".to_string())
        );
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = calculator()
            .simulate_budget(&BudgetCmd::new(3000).expense("Food", 10).expense("food ", 20))
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn breakdown_keeps_caller_order() {
        let budget = calculator()
            .simulate_budget(
                &BudgetCmd::new(3000)
                    .expense("Rent", 1200)
                    .expense("Food", 700)
                    .expense("Car", 100),
            )
            .unwrap();
        let labels: Vec<_> = budget.expense_breakdown.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, ["Rent", "Food", "Car"]);

        let json = serde_json::to_string(&budget.expense_breakdown).unwrap();
        let rent = json.find("\"Rent\"").unwrap();
        let food = json.find("\"Food\"").unwrap();
        let car = json.find("\"Car\"").unwrap();
        assert!(rent < food && food < car);

        let categories: Vec<_> = budget
            .recommendations
            .iter()
            .filter_map(|r| r.category.as_deref())
            .collect();
        assert_eq!(categories, ["Rent", "Food"]);
    }

    #[test]
    fn goal_gap_beyond_range_is_rejected() {
        let err = calculator()
            .simulate_budget(
                &BudgetCmd::new(0)
                    .expense("rent", "92233720368547758")
                    .savings_goal("92233720368547758"),
            )
            .unwrap_err();
        assert_eq!(err, EngineError::Validation("amount too large".to_string()));
    }

    #[test]
    fn goal_fields_are_flattened() {
        let budget = calculator()
            .simulate_budget(&BudgetCmd::new(100).savings_goal(10))
            .unwrap();
        let json = serde_json::to_value(&budget).unwrap();
        assert_eq!(json["goal_achievable"], true);
        assert_eq!(json["budget_status"], "surplus");
        assert!(json.get("savings_goal").is_some());
    }
}
