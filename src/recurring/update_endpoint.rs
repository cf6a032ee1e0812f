//! Defines the endpoint for updating an existing recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    database_id::RecurringId,
    money::Money,
    recurring::core::{Frequency, RecurringTransaction, RecurringUpdate, update_recurring},
    transaction::TransactionKind,
};

/// The state needed to update a recurring transaction.
#[derive(Debug, Clone)]
pub struct UpdateRecurringState {
    /// The database connection for managing recurring transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for updating a recurring transaction. Omitted fields are
/// left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecurringRequest {
    /// Replacement transaction type.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Replacement category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Replacement amount in decimal dollars.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Replacement description template.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement frequency. Takes effect from the next firing; the current
    /// due date is not recomputed.
    #[serde(default)]
    pub frequency: Option<String>,
    /// Replacement end date.
    #[serde(default)]
    pub end_date: Option<Date>,
    /// Pause or resume the rule.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A route handler for updating one of the caller's recurring transactions.
///
/// Responds with the updated rule.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_recurring_endpoint(
    State(state): State<UpdateRecurringState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(recurring_id): Path<RecurringId>,
    Json(request): Json<UpdateRecurringRequest>,
) -> Result<Json<RecurringTransaction>, Error> {
    let update = RecurringUpdate {
        kind: request
            .kind
            .as_deref()
            .map(str::parse::<TransactionKind>)
            .transpose()?,
        category: request.category,
        amount: request.amount.map(Money::from_dollars),
        description: request.description,
        frequency: request
            .frequency
            .as_deref()
            .map(str::parse::<Frequency>)
            .transpose()?,
        end_date: request.end_date,
        is_active: request.is_active,
    };

    let connection = state.db_connection.lock().unwrap();
    let recurring = update_recurring(recurring_id, user_id, update, &connection)?;

    Ok(Json(recurring))
}
