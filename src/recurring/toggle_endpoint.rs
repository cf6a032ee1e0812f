//! Defines the endpoint for pausing or resuming a recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    database_id::RecurringId,
    recurring::core::{RecurringTransaction, toggle_recurring},
};

/// The state needed to toggle a recurring transaction.
#[derive(Debug, Clone)]
pub struct ToggleRecurringState {
    /// The database connection for managing recurring transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ToggleRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that flips the active flag of one of the caller's
/// recurring transactions, leaving the due date untouched.
///
/// Responds with the updated rule.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn toggle_recurring_endpoint(
    State(state): State<ToggleRecurringState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(recurring_id): Path<RecurringId>,
) -> Result<Json<RecurringTransaction>, Error> {
    let connection = state.db_connection.lock().unwrap();
    let recurring = toggle_recurring(recurring_id, user_id, &connection)?;

    Ok(Json(recurring))
}
