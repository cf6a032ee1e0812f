//! Defines the endpoint for downloading transactions as a CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    export::core::to_csv,
    timezone::local_today,
    transaction::{TransactionFilter, TransactionKind, query_transactions},
};

/// The state needed to export transactions as CSV.
#[derive(Debug, Clone)]
pub struct ExportCsvState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to date the download's file name.
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportCsvState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters accepted by the CSV export endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCsvQuery {
    /// Export only transactions of this type.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Export only transactions on or after this date.
    #[serde(default)]
    pub start_date: Option<Date>,
    /// Export only transactions on or before this date.
    #[serde(default)]
    pub end_date: Option<Date>,
}

/// A route handler that renders the caller's transactions as a CSV download.
///
/// The response carries a `Content-Disposition` attachment file name dated
/// with today's date, e.g. `transactions_2025-03-14.csv`.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn export_csv_endpoint(
    State(state): State<ExportCsvState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(query): Query<ExportCsvQuery>,
) -> Result<Response, Error> {
    let filter = TransactionFilter {
        kind: query
            .kind
            .as_deref()
            .map(str::parse::<TransactionKind>)
            .transpose()?,
        category: None,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let today = local_today(&state.local_timezone)?;

    let connection = state.db_connection.lock().unwrap();
    let transactions = query_transactions(user_id, &filter, None, &connection)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=transactions_{today}.csv"),
        ),
    ];

    Ok((headers, to_csv(&transactions)).into_response())
}
