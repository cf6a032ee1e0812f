//! Filtered database queries over transactions.
//!
//! All queries are owner-scoped. Filter criteria are conjunctive: every
//! provided criterion must match, omitted criteria are unconstrained.

use rusqlite::{Connection, params_from_iter, types::Value};
use time::Date;

use crate::{
    Error,
    database_id::UserId,
    money::Money,
    pagination::PageParams,
    transaction::core::{Transaction, TransactionKind, map_transaction_row},
};

/// Optional criteria narrowing a transaction query.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Match only transactions of this type.
    pub kind: Option<TransactionKind>,
    /// Match only transactions with this category label.
    pub category: Option<String>,
    /// Match only transactions on or after this date.
    pub start_date: Option<Date>,
    /// Match only transactions on or before this date.
    pub end_date: Option<Date>,
}

/// Build the WHERE clause and parameter list shared by the query functions.
fn where_clause(user_id: UserId, filter: &TransactionFilter) -> (String, Vec<Value>) {
    let mut conditions = String::from("user_id = ?");
    let mut params = vec![Value::from(user_id)];

    if let Some(kind) = filter.kind {
        conditions.push_str(" AND kind = ?");
        params.push(Value::from(kind.as_str().to_owned()));
    }

    if let Some(category) = &filter.category {
        conditions.push_str(" AND category = ?");
        params.push(Value::from(category.clone()));
    }

    if let Some(start_date) = filter.start_date {
        conditions.push_str(" AND date >= ?");
        params.push(Value::from(start_date.to_string()));
    }

    if let Some(end_date) = filter.end_date {
        conditions.push_str(" AND date <= ?");
        params.push(Value::from(end_date.to_string()));
    }

    (conditions, params)
}

/// Get the transactions owned by `user_id` matching `filter`, newest first.
///
/// Results are sorted by date descending with the ID as a tiebreaker to keep
/// the order stable across updates. `page` selects a contiguous slice of the
/// sorted result set; `None` returns everything.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn query_transactions(
    user_id: UserId,
    filter: &TransactionFilter,
    page: Option<PageParams>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (conditions, mut params) = where_clause(user_id, filter);

    let mut query = format!(
        "SELECT id, user_id, kind, category, amount, description, date
         FROM \"transaction\" WHERE {conditions}
         ORDER BY date DESC, id ASC"
    );

    if let Some(page) = page {
        query.push_str(" LIMIT ? OFFSET ?");
        params.push(Value::from(page.limit as i64));
        params.push(Value::from(page.offset() as i64));
    }

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Count the transactions owned by `user_id` matching `filter`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_matching_transactions(
    user_id: UserId,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let (conditions, params) = where_clause(user_id, filter);

    let count: i64 = connection
        .prepare(&format!(
            "SELECT COUNT(id) FROM \"transaction\" WHERE {conditions}"
        ))?
        .query_row(params_from_iter(params), |row| row.get(0))?;

    Ok(count as u64)
}

/// Sum the amounts of the transactions owned by `user_id` matching `filter`.
///
/// Summation happens in SQL over whole cents, so the result is exact.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn sum_matching_amounts(
    user_id: UserId,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Money, Error> {
    let (conditions, params) = where_clause(user_id, filter);

    let total: i64 = connection
        .prepare(&format!(
            "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\" WHERE {conditions}"
        ))?
        .query_row(params_from_iter(params), |row| row.get(0))?;

    Ok(Money::from_cents(total))
}
