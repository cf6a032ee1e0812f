//! Defines the endpoint for listing recurring transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    recurring::core::{RecurringTransaction, get_all_recurring},
};

/// The state needed to list recurring transactions.
#[derive(Debug, Clone)]
pub struct ListRecurringState {
    /// The database connection for managing recurring transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing the caller's recurring transactions, soonest
/// due first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_recurring_endpoint(
    State(state): State<ListRecurringState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<RecurringTransaction>>, Error> {
    let connection = state.db_connection.lock().unwrap();
    let recurring = get_all_recurring(user_id, &connection)?;

    Ok(Json(recurring))
}
