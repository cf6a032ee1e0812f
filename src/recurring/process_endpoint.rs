//! Defines the endpoint for materializing due recurring transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    recurring::process::{FailedRule, ProcessedRule, process_due},
    timezone::local_today,
};

/// The state needed to process recurring transactions.
#[derive(Debug, Clone)]
pub struct ProcessRecurringState {
    /// The database connection for managing recurring transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to resolve "today" for due checks.
    pub local_timezone: String,
}

impl FromRef<AppState> for ProcessRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The result of one processing request.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    /// A human-readable summary of how many rules fired.
    pub message: String,
    /// The rules that fired, with the transactions they created.
    pub processed: Vec<ProcessedRule>,
    /// The rules that were due but could not be fired.
    pub failed: Vec<FailedRule>,
}

/// A route handler that fires every eligible recurring transaction owned by
/// the caller, once each.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn process_recurring_endpoint(
    State(state): State<ProcessRecurringState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<ProcessResponse>, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state.db_connection.lock().unwrap();
    let outcome = process_due(user_id, today, &connection)?;

    Ok(Json(ProcessResponse {
        message: format!(
            "Processed {} recurring transactions",
            outcome.processed.len()
        ),
        processed: outcome.processed,
        failed: outcome.failed,
    }))
}
