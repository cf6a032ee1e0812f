//! Defines the endpoint for listing budgets with their spending status.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    budget::{
        core::{Budget, get_active_budgets},
        evaluate::{evaluate_budget, period_spend},
    },
    money::Money,
    timezone::local_today,
};

/// The state needed to list budgets.
#[derive(Debug, Clone)]
pub struct ListBudgetsState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to resolve the current spending window.
    pub local_timezone: String,
}

impl FromRef<AppState> for ListBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A budget together with its computed spending status.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWithStatus {
    /// The stored budget fields.
    #[serde(flatten)]
    pub budget: Budget,
    /// The expense total inside the current window.
    #[serde(with = "crate::money::serde_dollars")]
    pub spent: Money,
    /// The amount left before the limit, floored at zero.
    #[serde(with = "crate::money::serde_dollars")]
    pub remaining: Money,
    /// Spend as a percentage of the limit, capped at 100 for display.
    pub percentage: f64,
    /// Whether spend exceeds the limit.
    pub is_over_budget: bool,
    /// Whether spend has reached the alert threshold.
    pub is_near_limit: bool,
}

/// A route handler for listing the caller's active budgets, each with the
/// spend computed for its current window.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_budgets_endpoint(
    State(state): State<ListBudgetsState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<BudgetWithStatus>>, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state.db_connection.lock().unwrap();
    let budgets = get_active_budgets(user_id, &connection)?;

    let mut budgets_with_status = Vec::with_capacity(budgets.len());

    for budget in budgets {
        let spent = period_spend(&budget, today, &connection)?;
        let status = evaluate_budget(&budget, spent);

        budgets_with_status.push(BudgetWithStatus {
            spent: status.spent,
            remaining: status.remaining,
            percentage: status.display_percentage,
            is_over_budget: status.is_over_budget,
            is_near_limit: status.is_near_limit,
            budget,
        });
    }

    Ok(Json(budgets_with_status))
}
