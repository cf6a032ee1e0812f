//! Defines the endpoint for exporting a structured spending report.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    export::core::{Report, ReportPeriod, build_report},
    transaction::{TransactionFilter, query_transactions},
};

/// The state needed to build a report.
#[derive(Debug, Clone)]
pub struct ExportReportState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the report endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReportQuery {
    /// Report only on transactions on or after this date.
    #[serde(default)]
    pub start_date: Option<Date>,
    /// Report only on transactions on or before this date.
    #[serde(default)]
    pub end_date: Option<Date>,
}

/// A route handler that builds a structured report over the caller's
/// transactions, optionally narrowed to a date range.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn export_report_endpoint(
    State(state): State<ExportReportState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(query): Query<ExportReportQuery>,
) -> Result<Json<Report>, Error> {
    let filter = TransactionFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        ..Default::default()
    };

    let connection = state.db_connection.lock().unwrap();
    let transactions = query_transactions(user_id, &filter, None, &connection)?;

    Ok(Json(build_report(
        &transactions,
        ReportPeriod::new(query.start_date, query.end_date),
        OffsetDateTime::now_utc(),
    )))
}
