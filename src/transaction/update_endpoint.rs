//! Defines the endpoint for updating an existing transaction.

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
    database_id::TransactionId,
    money::Money,
    transaction::core::{Transaction, TransactionKind, TransactionUpdate, update_transaction},
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for updating a transaction. Omitted fields are left
/// unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Replacement transaction type.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Replacement category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Replacement amount in decimal dollars.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Replacement description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement date.
    #[serde(default)]
    pub date: Option<Date>,
}

/// A route handler for updating one of the caller's transactions.
///
/// Responds with the updated transaction.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(transaction_id): Path<TransactionId>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, Error> {
    let update = TransactionUpdate {
        kind: request
            .kind
            .as_deref()
            .map(str::parse::<TransactionKind>)
            .transpose()?,
        category: request.category,
        amount: request.amount.map(Money::from_dollars),
        description: request.description,
        date: request.date,
    };

    let connection = state.db_connection.lock().unwrap();
    let transaction = update_transaction(transaction_id, user_id, update, &connection)?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::AuthenticatedUser,
        db::initialize,
        money::Money,
        transaction::{Transaction, TransactionKind, create_transaction, get_transaction},
    };

    use super::{UpdateTransactionRequest, UpdateTransactionState, update_transaction_endpoint};

    fn get_test_state() -> UpdateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        UpdateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn updates_only_provided_fields() {
        let state = get_test_state();
        let created = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    "Shopping",
                    Money::from_cents(2_000),
                    date!(2025 - 06 - 01),
                )
                .description("shoes"),
                1,
                &connection,
            )
            .unwrap()
        };

        let request = UpdateTransactionRequest {
            amount: Some(31.50),
            ..Default::default()
        };

        let updated = update_transaction_endpoint(
            State(state.clone()),
            AuthenticatedUser(1),
            Path(created.id),
            Json(request),
        )
        .await
        .expect("Could not update transaction");

        assert_eq!(updated.0.amount, Money::from_cents(3_150));
        assert_eq!(updated.0.description, "shoes");

        let connection = state.db_connection.lock().unwrap();
        let stored = get_transaction(created.id, 1, &connection).unwrap();
        assert_eq!(stored, updated.0);
    }

    #[tokio::test]
    async fn rejects_unknown_type() {
        let state = get_test_state();
        let created = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    "Shopping",
                    Money::from_cents(2_000),
                    date!(2025 - 06 - 01),
                ),
                1,
                &connection,
            )
            .unwrap()
        };

        let request = UpdateTransactionRequest {
            kind: Some("swap".to_owned()),
            ..Default::default()
        };

        let result = update_transaction_endpoint(
            State(state),
            AuthenticatedUser(1),
            Path(created.id),
            Json(request),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidTransactionKind("swap".to_owned()))
        );
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let state = get_test_state();

        let result = update_transaction_endpoint(
            State(state),
            AuthenticatedUser(1),
            Path(999),
            Json(UpdateTransactionRequest::default()),
        )
        .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
