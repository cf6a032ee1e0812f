//! Building of row-oriented (CSV) and structured (JSON) exports.

use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{
    money::Money,
    transaction::{
        DailyTotal, Transaction, TransactionKind, aggregate, daily_totals,
        expense_totals_by_category,
    },
};

/// The label used for the start of an export with no lower date bound.
const ALL_TIME: &str = "All time";
/// The label used for the end of an export with no upper date bound.
const PRESENT: &str = "Present";

/// The header row of the CSV export.
const CSV_HEADER: &str = "Date,Type,Category,Amount,Description";

/// A structured summary of a transaction set, ready for JSON serialization.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// When the report was generated.
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// The date window the report covers.
    pub period: ReportPeriod,
    /// Totals over every transaction in the report.
    pub summary: ReportSummary,
    /// Expense totals per category, largest first, with their share of the
    /// total expense.
    pub category_breakdown: Vec<CategoryShare>,
    /// Income and expense sums per calendar day, newest day first.
    pub daily_breakdown: Vec<DailyTotal>,
    /// The transactions the report was built from, newest first.
    pub transactions: Vec<ReportRow>,
}

/// The date window of a report, with fallback labels for unbounded sides.
#[derive(Debug, PartialEq, Serialize)]
pub struct ReportPeriod {
    /// The first date of the window, or "All time" when unbounded.
    pub start: String,
    /// The last date of the window, or "Present" when unbounded.
    pub end: String,
}

impl ReportPeriod {
    /// Label an optionally bounded date range.
    pub fn new(start: Option<Date>, end: Option<Date>) -> Self {
        Self {
            start: start.map_or_else(|| ALL_TIME.to_owned(), |date| date.to_string()),
            end: end.map_or_else(|| PRESENT.to_owned(), |date| date.to_string()),
        }
    }
}

/// The headline totals of a report.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// The sum of all income amounts.
    #[serde(with = "crate::money::serde_dollars")]
    pub total_income: Money,
    /// The sum of all expense amounts.
    #[serde(with = "crate::money::serde_dollars")]
    pub total_expense: Money,
    /// Income minus expenses.
    #[serde(with = "crate::money::serde_dollars")]
    pub balance: Money,
    /// The number of transactions covered.
    pub transaction_count: u64,
}

/// One category's slice of the total expense.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    /// The category label.
    pub category: String,
    /// The summed expense amount for the category.
    #[serde(with = "crate::money::serde_dollars")]
    pub total: Money,
    /// The number of expense transactions in the category.
    pub count: u64,
    /// The category's percentage of the total expense.
    pub percentage: f64,
}

/// One transaction flattened for the report.
#[derive(Debug, PartialEq, Serialize)]
pub struct ReportRow {
    /// When the transaction happened, as `yyyy-MM-dd`.
    pub date: Date,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category label.
    pub category: String,
    /// The amount in decimal dollars.
    #[serde(with = "crate::money::serde_dollars")]
    pub amount: Money,
    /// What the transaction was for.
    pub description: String,
}

/// Build a structured report over `transactions`.
///
/// The transactions are expected to be sorted newest first, as the query
/// layer returns them; the report preserves that order.
pub fn build_report(
    transactions: &[Transaction],
    period: ReportPeriod,
    generated_at: OffsetDateTime,
) -> Report {
    let totals = aggregate(transactions);
    let total_expense = totals.total_expense;

    let category_breakdown = expense_totals_by_category(transactions)
        .into_iter()
        .map(|entry| CategoryShare {
            percentage: if total_expense == Money::ZERO {
                0.0
            } else {
                entry.total.cents() as f64 / total_expense.cents() as f64 * 100.0
            },
            category: entry.category,
            total: entry.total,
            count: entry.count,
        })
        .collect();

    Report {
        generated_at,
        period,
        summary: ReportSummary {
            total_income: totals.total_income,
            total_expense: totals.total_expense,
            balance: totals.balance,
            transaction_count: totals.income_count + totals.expense_count,
        },
        category_breakdown,
        daily_breakdown: daily_totals(transactions),
        transactions: transactions
            .iter()
            .map(|transaction| ReportRow {
                date: transaction.date,
                kind: transaction.kind,
                category: transaction.category.clone(),
                amount: transaction.amount,
                description: transaction.description.clone(),
            })
            .collect(),
    }
}

/// Render `transactions` as CSV text.
///
/// One row per transaction in the given order, followed by a blank line and
/// three summary rows with the totals in the amount column. Rows are joined
/// with `\n` and there is no trailing newline.
pub fn to_csv(transactions: &[Transaction]) -> String {
    let mut rows = Vec::with_capacity(transactions.len() + 5);
    rows.push(CSV_HEADER.to_owned());

    for transaction in transactions {
        rows.push(format!(
            "{},{},{},{},{}",
            transaction.date,
            transaction.kind,
            quote(&transaction.category),
            transaction.amount,
            quote(&transaction.description),
        ));
    }

    let totals = aggregate(transactions);
    rows.push(String::new());
    rows.push(format!("Total Income,,,{}", totals.total_income));
    rows.push(format!("Total Expenses,,,{}", totals.total_expense));
    rows.push(format!("Balance,,,{}", totals.balance));

    rows.join("\n")
}

/// Wrap a field in double quotes, doubling any embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
