//! Defines the endpoint for aggregate transaction statistics.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    transaction::{
        aggregation::{AggregationResult, TOP_CATEGORY_LIMIT, aggregate},
        query::{TransactionFilter, query_transactions},
    },
};

/// The state needed to compute transaction statistics.
#[derive(Debug, Clone)]
pub struct TransactionStatsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionStatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the caller's all-time transaction statistics.
///
/// The category breakdown is truncated to the [TOP_CATEGORY_LIMIT] largest
/// spending categories.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn transaction_stats_endpoint(
    State(state): State<TransactionStatsState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<AggregationResult>, Error> {
    let connection = state.db_connection.lock().unwrap();
    let transactions = query_transactions(user_id, &TransactionFilter::default(), None, &connection)?;

    let mut result = aggregate(&transactions);
    result.top_categories.truncate(TOP_CATEGORY_LIMIT);

    Ok(Json(result))
}
