//! Evaluation of spending against budgets and derivation of alerts.

use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    budget::core::{ALL_CATEGORIES, Budget},
    money::Money,
    transaction::{TransactionFilter, TransactionKind, sum_matching_amounts},
};

/// How far a budget's spending window has been consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    /// The expense total inside the current window.
    pub spent: Money,
    /// The amount left before the limit, floored at zero.
    pub remaining: Money,
    /// Spend as a percentage of the limit, capped at 100 for display.
    pub display_percentage: f64,
    /// Spend as a percentage of the limit, uncapped.
    ///
    /// Alert decisions use this value so a budget at 150% reads as 150%,
    /// not as pinned to 100%.
    pub usage_percentage: f64,
    /// Whether spend exceeds the limit.
    pub is_over_budget: bool,
    /// Whether spend has reached the alert threshold. Implied by
    /// `is_over_budget` whenever the threshold is at most 100.
    pub is_near_limit: bool,
}

/// The severity of a budget alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// The budget has been exceeded.
    Danger,
    /// Spend has reached the alert threshold.
    Warning,
}

/// A user-facing notification about one budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    /// The severity of the alert.
    #[serde(rename = "type")]
    pub level: AlertLevel,
    /// The category of the budget the alert is about.
    pub category: String,
    /// A human-readable summary.
    pub message: String,
    /// The expense total inside the current window.
    #[serde(with = "crate::money::serde_dollars")]
    pub spent: Money,
    /// The budget's limit.
    #[serde(with = "crate::money::serde_dollars")]
    pub budget: Money,
    /// Spend as an uncapped percentage of the limit.
    pub percentage: f64,
}

/// Sum the expenses that count against `budget` in the window containing
/// `today`.
///
/// The sum covers the budget's category only, unless the category is
/// [ALL_CATEGORIES], in which case every expense category counts.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn period_spend(budget: &Budget, today: Date, connection: &Connection) -> Result<Money, Error> {
    let window = budget.period.window(today);

    let filter = TransactionFilter {
        kind: Some(TransactionKind::Expense),
        category: (budget.category != ALL_CATEGORIES).then(|| budget.category.clone()),
        start_date: Some(window.start),
        end_date: Some(window.end),
    };

    sum_matching_amounts(budget.user_id, &filter, connection)
}

/// Compare `spent` against the budget's limit and threshold.
///
/// The percentage comparison against the threshold is done in exact integer
/// arithmetic; the floating-point percentages are derived for presentation.
pub fn evaluate_budget(budget: &Budget, spent: Money) -> BudgetStatus {
    let usage_percentage = spent.cents() as f64 / budget.amount.cents() as f64 * 100.0;

    BudgetStatus {
        spent,
        remaining: (budget.amount - spent).clamp_non_negative(),
        display_percentage: usage_percentage.min(100.0),
        usage_percentage,
        is_over_budget: spent > budget.amount,
        is_near_limit: spent.cents() * 100 >= budget.amount.cents() * budget.alert_threshold,
    }
}

/// Derive the alert for a budget, if its status warrants one.
///
/// Over budget wins over near-limit; a budget that is neither produces no
/// alert. Alerts are recomputed on every call and never persisted.
pub fn build_alert(budget: &Budget, status: &BudgetStatus) -> Option<BudgetAlert> {
    if status.is_over_budget {
        let overage = status.spent - budget.amount;

        Some(BudgetAlert {
            level: AlertLevel::Danger,
            category: budget.category.clone(),
            message: format!(
                "You've exceeded your {} budget by ${overage}",
                budget.category
            ),
            spent: status.spent,
            budget: budget.amount,
            percentage: status.usage_percentage,
        })
    } else if status.is_near_limit {
        Some(BudgetAlert {
            level: AlertLevel::Warning,
            category: budget.category.clone(),
            message: format!(
                "You've used {:.0}% of your {} budget",
                status.usage_percentage, budget.category
            ),
            spent: status.spent,
            budget: budget.amount,
            percentage: status.usage_percentage,
        })
    } else {
        None
    }
}
