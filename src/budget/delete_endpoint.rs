//! Defines the endpoint for deleting a budget.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error, auth::AuthenticatedUser, budget::core::delete_budget,
    database_id::BudgetId,
};

/// The state needed to delete a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the caller's budgets.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(budget_id): Path<BudgetId>,
) -> Result<Json<Value>, Error> {
    let connection = state.db_connection.lock().unwrap();
    delete_budget(budget_id, user_id, &connection)?;

    Ok(Json(json!({ "message": "Budget deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::AuthenticatedUser,
        budget::core::{create_budget, get_budget},
        db::initialize,
        money::Money,
        period::BudgetPeriod,
    };

    use super::{DeleteBudgetState, delete_budget_endpoint};

    fn get_test_state() -> DeleteBudgetState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DeleteBudgetState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn deletes_own_budget() {
        let state = get_test_state();
        let budget = {
            let connection = state.db_connection.lock().unwrap();
            create_budget(
                1,
                "Travel",
                Money::from_cents(10_000),
                BudgetPeriod::Monthly,
                80,
                &connection,
            )
            .unwrap()
        };

        delete_budget_endpoint(State(state.clone()), AuthenticatedUser(1), Path(budget.id))
            .await
            .expect("Could not delete budget");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_budget(budget.id, 1, &connection), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn missing_budget_is_not_found() {
        let state = get_test_state();

        let result = delete_budget_endpoint(State(state), AuthenticatedUser(1), Path(999)).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
