//! Defines the endpoint for viewing transactions within a named period.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    money::Money,
    period::{ReportingPeriod, resolve_period},
    timezone::local_today,
    transaction::{
        aggregation::aggregate,
        core::Transaction,
        query::{TransactionFilter, query_transactions},
    },
};

/// The state needed to resolve a period and list its transactions.
#[derive(Debug, Clone)]
pub struct TransactionPeriodState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to resolve "today".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionPeriodState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters accepted by the period endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// The reference date the window is computed around. Defaults to today.
    #[serde(default)]
    pub date: Option<Date>,
}

/// The transactions and totals of one reporting period.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodResponse {
    /// The period that was resolved.
    pub period: ReportingPeriod,
    /// The first date of the window.
    pub start_date: Date,
    /// The last date of the window.
    pub end_date: Date,
    /// The transactions inside the window, newest first.
    pub transactions: Vec<Transaction>,
    /// The summed income inside the window.
    #[serde(with = "crate::money::serde_dollars")]
    pub total_income: Money,
    /// The summed expenses inside the window.
    #[serde(with = "crate::money::serde_dollars")]
    pub total_expense: Money,
    /// Income minus expenses inside the window.
    #[serde(with = "crate::money::serde_dollars")]
    pub balance: Money,
}

/// A route handler for the caller's transactions within a day/week/month
/// window around a reference date.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn transactions_by_period_endpoint(
    State(state): State<TransactionPeriodState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(period): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<PeriodResponse>, Error> {
    let period: ReportingPeriod = period.parse()?;
    let reference = match query.date {
        Some(date) => date,
        None => local_today(&state.local_timezone)?,
    };
    let range = resolve_period(period, reference);

    let filter = TransactionFilter {
        start_date: Some(range.start),
        end_date: Some(range.end),
        ..Default::default()
    };

    let connection = state.db_connection.lock().unwrap();
    let transactions = query_transactions(user_id, &filter, None, &connection)?;
    let totals = aggregate(&transactions);

    Ok(Json(PeriodResponse {
        period,
        start_date: range.start,
        end_date: range.end,
        transactions,
        total_income: totals.total_income,
        total_expense: totals.total_expense,
        balance: totals.balance,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::AuthenticatedUser,
        db::initialize,
        money::Money,
        period::ReportingPeriod,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{PeriodQuery, TransactionPeriodState, transactions_by_period_endpoint};

    fn get_test_state() -> TransactionPeriodState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionPeriodState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn month_window_includes_leap_day() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    "Other",
                    Money::from_cents(1_000),
                    date!(2024 - 02 - 29),
                ),
                1,
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    "Other",
                    Money::from_cents(2_000),
                    date!(2024 - 03 - 01),
                ),
                1,
                &connection,
            )
            .unwrap();
        }

        let response = transactions_by_period_endpoint(
            State(state),
            AuthenticatedUser(1),
            Path("month".to_owned()),
            Query(PeriodQuery {
                date: Some(date!(2024 - 02 - 15)),
            }),
        )
        .await
        .expect("Could not resolve period");

        assert_eq!(response.0.period, ReportingPeriod::Month);
        assert_eq!(response.0.start_date, date!(2024 - 02 - 01));
        assert_eq!(response.0.end_date, date!(2024 - 02 - 29));
        assert_eq!(response.0.transactions.len(), 1);
        assert_eq!(response.0.total_expense, Money::from_cents(1_000));
        assert_eq!(response.0.balance, Money::from_cents(-1_000));
    }

    #[tokio::test]
    async fn invalid_period_keyword_is_rejected() {
        let state = get_test_state();

        let result = transactions_by_period_endpoint(
            State(state),
            AuthenticatedUser(1),
            Path("year".to_owned()),
            Query(PeriodQuery::default()),
        )
        .await;

        assert_eq!(result.err(), Some(Error::InvalidPeriod("year".to_owned())));
    }
}
