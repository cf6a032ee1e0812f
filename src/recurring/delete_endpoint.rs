//! Defines the endpoint for deleting a recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error, auth::AuthenticatedUser, database_id::RecurringId,
    recurring::core::delete_recurring,
};

/// The state needed to delete a recurring transaction.
#[derive(Debug, Clone)]
pub struct DeleteRecurringState {
    /// The database connection for managing recurring transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the caller's recurring transactions.
///
/// Transactions the rule already materialized are kept.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_recurring_endpoint(
    State(state): State<DeleteRecurringState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(recurring_id): Path<RecurringId>,
) -> Result<Json<Value>, Error> {
    let connection = state.db_connection.lock().unwrap();
    delete_recurring(recurring_id, user_id, &connection)?;

    Ok(Json(
        json!({ "message": "Recurring transaction deleted successfully" }),
    ))
}
