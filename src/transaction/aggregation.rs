//! In-memory aggregation of transaction amounts.
//!
//! Works over a set of transactions that has already been narrowed by the
//! owner-scoped queries, so the cost is bounded by the filtered set size.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{
    money::Money,
    transaction::core::{Transaction, TransactionKind},
};

/// The number of categories returned by the statistics endpoint.
pub const TOP_CATEGORY_LIMIT: usize = 10;

/// Totals and counts per transaction type with a ranked expense breakdown.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// The sum of all income amounts.
    #[serde(with = "crate::money::serde_dollars")]
    pub total_income: Money,
    /// The sum of all expense amounts.
    #[serde(with = "crate::money::serde_dollars")]
    pub total_expense: Money,
    /// Income minus expenses. Negative when more was spent than earned.
    #[serde(with = "crate::money::serde_dollars")]
    pub balance: Money,
    /// The number of income transactions.
    pub income_count: u64,
    /// The number of expense transactions.
    pub expense_count: u64,
    /// Expense totals grouped by category, largest first.
    pub top_categories: Vec<CategoryTotal>,
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The summed expense amount for the category.
    #[serde(with = "crate::money::serde_dollars")]
    pub total: Money,
    /// The number of expense transactions in the category.
    pub count: u64,
}

/// Income and expense sums for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    /// The day the sums cover.
    pub date: Date,
    /// The summed income for the day.
    #[serde(with = "crate::money::serde_dollars")]
    pub income: Money,
    /// The summed expenses for the day.
    #[serde(with = "crate::money::serde_dollars")]
    pub expense: Money,
}

/// Sum `transactions` by type and group expenses by category.
///
/// `balance` is exactly `total_income - total_expense`: all arithmetic is in
/// whole cents. The category breakdown is untruncated; callers that only
/// want the largest spenders take the first [TOP_CATEGORY_LIMIT] entries.
pub fn aggregate(transactions: &[Transaction]) -> AggregationResult {
    let mut total_income = Money::ZERO;
    let mut total_expense = Money::ZERO;
    let mut income_count = 0;
    let mut expense_count = 0;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => {
                total_income += transaction.amount;
                income_count += 1;
            }
            TransactionKind::Expense => {
                total_expense += transaction.amount;
                expense_count += 1;
            }
        }
    }

    AggregationResult {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        income_count,
        expense_count,
        top_categories: expense_totals_by_category(transactions),
    }
}

/// Group expense amounts by category, sorted by total descending.
///
/// Categories with equal totals stay in the order they were first seen in
/// `transactions` (the sort is stable over insertion order).
pub fn expense_totals_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Expense)
    {
        match index_by_category.get(transaction.category.as_str()) {
            Some(&index) => {
                totals[index].total += transaction.amount;
                totals[index].count += 1;
            }
            None => {
                index_by_category.insert(&transaction.category, totals.len());
                totals.push(CategoryTotal {
                    category: transaction.category.clone(),
                    total: transaction.amount,
                    count: 1,
                });
            }
        }
    }

    totals.sort_by(|a, b| b.total.cmp(&a.total));

    totals
}

/// Sum income and expenses per calendar day, newest day first.
pub fn daily_totals(transactions: &[Transaction]) -> Vec<DailyTotal> {
    let mut totals_by_date: HashMap<Date, (Money, Money)> = HashMap::new();

    for transaction in transactions {
        let entry = totals_by_date
            .entry(transaction.date)
            .or_insert((Money::ZERO, Money::ZERO));

        match transaction.kind {
            TransactionKind::Income => entry.0 += transaction.amount,
            TransactionKind::Expense => entry.1 += transaction.amount,
        }
    }

    let mut totals: Vec<DailyTotal> = totals_by_date
        .into_iter()
        .map(|(date, (income, expense))| DailyTotal {
            date,
            income,
            expense,
        })
        .collect();

    totals.sort_by(|a, b| b.date.cmp(&a.date));

    totals
}
