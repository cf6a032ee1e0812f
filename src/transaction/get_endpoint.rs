//! Defines the endpoint for fetching a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    database_id::TransactionId,
    transaction::core::{Transaction, get_transaction},
};

/// The state needed to fetch a transaction.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for fetching one of the caller's transactions by ID.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.db_connection.lock().unwrap();
    let transaction = get_transaction(transaction_id, user_id, &connection)?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::AuthenticatedUser,
        db::initialize,
        money::Money,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{GetTransactionState, get_transaction_endpoint};

    fn get_test_state() -> GetTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        GetTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn returns_own_transaction() {
        let state = get_test_state();
        let created = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    "Travel",
                    Money::from_cents(4200),
                    date!(2025 - 06 - 01),
                ),
                1,
                &connection,
            )
            .unwrap()
        };

        let got = get_transaction_endpoint(
            State(state),
            AuthenticatedUser(1),
            Path(created.id),
        )
        .await
        .expect("Could not get transaction");

        assert_eq!(got.0, created);
    }

    #[tokio::test]
    async fn other_users_transaction_is_not_found() {
        let state = get_test_state();
        let created = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    "Travel",
                    Money::from_cents(4200),
                    date!(2025 - 06 - 01),
                ),
                1,
                &connection,
            )
            .unwrap()
        };

        let result = get_transaction_endpoint(
            State(state),
            AuthenticatedUser(2),
            Path(created.id),
        )
        .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
