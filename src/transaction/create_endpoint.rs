//! Defines the endpoint for creating a new transaction.

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
    timezone::local_today,
    transaction::core::{Transaction, TransactionKind, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to default the transaction date to today.
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: String,
    /// The category label.
    pub category: String,
    /// The amount in decimal dollars, greater than zero.
    pub amount: f64,
    /// What the transaction was for.
    #[serde(default)]
    pub description: Option<String>,
    /// When the transaction happened. Defaults to today.
    #[serde(default)]
    pub date: Option<Date>,
}

/// A route handler for creating a new transaction.
///
/// Responds with the created transaction and status 201.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let kind: TransactionKind = request.kind.parse()?;
    let date = match request.date {
        Some(date) => date,
        None => local_today(&state.local_timezone)?,
    };

    let mut builder =
        Transaction::build(kind, &request.category, Money::from_dollars(request.amount), date);

    if let Some(description) = &request.description {
        builder = builder.description(description);
    }

    let connection = state.db_connection.lock().unwrap();
    let transaction = create_transaction(builder, user_id, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
