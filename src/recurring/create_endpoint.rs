//! Defines the endpoint for creating a new recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    money::Money,
    recurring::core::{Frequency, RecurringTransaction, create_recurring},
    timezone::local_today,
    transaction::TransactionKind,
};

/// The state needed to create a recurring transaction.
#[derive(Debug, Clone)]
pub struct CreateRecurringState {
    /// The database connection for managing recurring transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to default the start date to today.
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The request body for creating a recurring transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecurringRequest {
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: String,
    /// The category for materialized transactions.
    pub category: String,
    /// The amount in decimal dollars, greater than zero.
    pub amount: f64,
    /// The description template for materialized transactions.
    #[serde(default)]
    pub description: Option<String>,
    /// "daily", "weekly", "biweekly", "monthly", or "yearly".
    pub frequency: String,
    /// When the schedule starts (and first fires). Defaults to today.
    #[serde(default)]
    pub start_date: Option<Date>,
    /// When the schedule stops firing, if ever.
    #[serde(default)]
    pub end_date: Option<Date>,
}

/// A route handler for creating a new recurring transaction.
///
/// Responds with the created rule and status 201.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_recurring_endpoint(
    State(state): State<CreateRecurringState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<CreateRecurringRequest>,
) -> Result<(StatusCode, Json<RecurringTransaction>), Error> {
    let kind: TransactionKind = request.kind.parse()?;
    let frequency: Frequency = request.frequency.parse()?;
    let start_date = match request.start_date {
        Some(date) => date,
        None => local_today(&state.local_timezone)?,
    };

    let connection = state.db_connection.lock().unwrap();
    let recurring = create_recurring(
        user_id,
        kind,
        &request.category,
        Money::from_dollars(request.amount),
        request.description.as_deref().unwrap_or_default(),
        frequency,
        start_date,
        request.end_date,
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(recurring)))
}
