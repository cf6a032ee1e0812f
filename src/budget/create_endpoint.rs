//! Defines the endpoint for creating a new budget.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    budget::core::{Budget, DEFAULT_ALERT_THRESHOLD, create_budget},
    money::Money,
    period::BudgetPeriod,
};

/// The state needed to create a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a budget.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    /// The expense category to cap, or "All" for overall spending.
    pub category: String,
    /// The spending limit in decimal dollars, greater than zero.
    pub amount: f64,
    /// The budget window. Defaults to monthly.
    #[serde(default)]
    pub period: Option<String>,
    /// The warning threshold as a percentage 0-100. Defaults to 80.
    #[serde(default)]
    pub alert_threshold: Option<i64>,
}

/// A route handler for creating a new budget.
///
/// Responds with the created budget and status 201. A second budget for the
/// same category is rejected with [Error::DuplicateBudget].
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<Budget>), Error> {
    let period = match request.period.as_deref() {
        Some(period) => period.parse()?,
        None => BudgetPeriod::Monthly,
    };
    let alert_threshold = request.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD);

    let connection = state.db_connection.lock().unwrap();
    let budget = create_budget(
        user_id,
        &request.category,
        Money::from_dollars(request.amount),
        period,
        alert_threshold,
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(budget)))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;

    use crate::{
        Error, auth::AuthenticatedUser, db::initialize, money::Money, period::BudgetPeriod,
    };

    use super::{CreateBudgetRequest, CreateBudgetState, create_budget_endpoint};

    fn get_test_state() -> CreateBudgetState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateBudgetState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn applies_defaults() {
        let state = get_test_state();

        let request = CreateBudgetRequest {
            category: "Food & Dining".to_owned(),
            amount: 300.0,
            period: None,
            alert_threshold: None,
        };

        let (_, Json(budget)) =
            create_budget_endpoint(State(state), AuthenticatedUser(1), Json(request))
                .await
                .expect("Could not create budget");

        assert_eq!(budget.period, BudgetPeriod::Monthly);
        assert_eq!(budget.alert_threshold, 80);
        assert_eq!(budget.amount, Money::from_cents(30_000));
        assert!(budget.is_active);
    }

    #[tokio::test]
    async fn duplicate_category_is_rejected() {
        let state = get_test_state();
        let request = || CreateBudgetRequest {
            category: "Travel".to_owned(),
            amount: 100.0,
            period: None,
            alert_threshold: None,
        };

        create_budget_endpoint(State(state.clone()), AuthenticatedUser(1), Json(request()))
            .await
            .unwrap();
        let duplicate =
            create_budget_endpoint(State(state), AuthenticatedUser(1), Json(request())).await;

        assert_eq!(duplicate.err(), Some(Error::DuplicateBudget));
    }

    #[tokio::test]
    async fn unknown_period_is_rejected() {
        let state = get_test_state();

        let request = CreateBudgetRequest {
            category: "Travel".to_owned(),
            amount: 100.0,
            period: Some("daily".to_owned()),
            alert_threshold: None,
        };

        let result =
            create_budget_endpoint(State(state), AuthenticatedUser(1), Json(request)).await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidBudgetPeriod("daily".to_owned()))
        );
    }
}
