//! Defines the endpoint for updating an existing budget.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    budget::core::{Budget, BudgetUpdate, update_budget},
    database_id::BudgetId,
    money::Money,
    period::BudgetPeriod,
};

/// The state needed to update a budget.
#[derive(Debug, Clone)]
pub struct UpdateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for updating a budget. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    /// Replacement spending limit in decimal dollars.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Replacement budget window.
    #[serde(default)]
    pub period: Option<String>,
    /// Replacement warning threshold.
    #[serde(default)]
    pub alert_threshold: Option<i64>,
    /// Pause or resume the budget.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A route handler for updating one of the caller's budgets.
///
/// Responds with the updated budget.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_budget_endpoint(
    State(state): State<UpdateBudgetState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(budget_id): Path<BudgetId>,
    Json(request): Json<UpdateBudgetRequest>,
) -> Result<Json<Budget>, Error> {
    let update = BudgetUpdate {
        amount: request.amount.map(Money::from_dollars),
        period: request
            .period
            .as_deref()
            .map(str::parse::<BudgetPeriod>)
            .transpose()?,
        alert_threshold: request.alert_threshold,
        is_active: request.is_active,
    };

    let connection = state.db_connection.lock().unwrap();
    let budget = update_budget(budget_id, user_id, update, &connection)?;

    Ok(Json(budget))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::AuthenticatedUser,
        budget::core::create_budget,
        db::initialize,
        money::Money,
        period::BudgetPeriod,
    };

    use super::{UpdateBudgetRequest, UpdateBudgetState, update_budget_endpoint};

    fn get_test_state() -> UpdateBudgetState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        UpdateBudgetState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn updates_only_provided_fields() {
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

        let request = UpdateBudgetRequest {
            period: Some("weekly".to_owned()),
            ..Default::default()
        };

        let updated = update_budget_endpoint(
            State(state),
            AuthenticatedUser(1),
            Path(budget.id),
            Json(request),
        )
        .await
        .expect("Could not update budget");

        assert_eq!(updated.0.period, BudgetPeriod::Weekly);
        assert_eq!(updated.0.amount, Money::from_cents(10_000));
    }

    #[tokio::test]
    async fn missing_budget_is_not_found() {
        let state = get_test_state();

        let result = update_budget_endpoint(
            State(state),
            AuthenticatedUser(1),
            Path(999),
            Json(UpdateBudgetRequest::default()),
        )
        .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
