//! Defines the endpoint for budget alerts.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    budget::{
        core::get_active_budgets,
        evaluate::{BudgetAlert, build_alert, evaluate_budget, period_spend},
    },
    timezone::local_today,
};

/// The state needed to compute budget alerts.
#[derive(Debug, Clone)]
pub struct BudgetAlertsState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to resolve the current spending window.
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetAlertsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler that recomputes alerts for every active budget of the
/// caller.
///
/// Budgets below their alert threshold produce no entry; nothing is stored
/// between calls.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn budget_alerts_endpoint(
    State(state): State<BudgetAlertsState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<BudgetAlert>>, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state.db_connection.lock().unwrap();
    let budgets = get_active_budgets(user_id, &connection)?;

    let mut alerts = Vec::new();

    for budget in budgets {
        let spent = period_spend(&budget, today, &connection)?;
        let status = evaluate_budget(&budget, spent);

        if let Some(alert) = build_alert(&budget, &status) {
            alerts.push(alert);
        }
    }

    Ok(Json(alerts))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        auth::AuthenticatedUser,
        budget::{core::create_budget, evaluate::AlertLevel},
        db::initialize,
        money::Money,
        period::BudgetPeriod,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{BudgetAlertsState, budget_alerts_endpoint};

    fn get_test_state() -> BudgetAlertsState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        BudgetAlertsState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn emits_danger_and_warning_alerts() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date();
        {
            let connection = state.db_connection.lock().unwrap();
            // Will end up over budget.
            create_budget(
                1,
                "Food & Dining",
                Money::from_cents(10_000),
                BudgetPeriod::Monthly,
                80,
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    "Food & Dining",
                    Money::from_cents(12_000),
                    today,
                ),
                1,
                &connection,
            )
            .unwrap();
            // Will end up at the warning threshold.
            create_budget(
                1,
                "Transport",
                Money::from_cents(10_000),
                BudgetPeriod::Monthly,
                80,
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    "Transport",
                    Money::from_cents(8_000),
                    today,
                ),
                1,
                &connection,
            )
            .unwrap();
            // Quiet budget, no alert expected.
            create_budget(
                1,
                "Fitness",
                Money::from_cents(10_000),
                BudgetPeriod::Monthly,
                80,
                &connection,
            )
            .unwrap();
        }

        let alerts = budget_alerts_endpoint(State(state), AuthenticatedUser(1))
            .await
            .expect("Could not compute alerts");

        assert_eq!(alerts.0.len(), 2);
        assert_eq!(alerts.0[0].level, AlertLevel::Danger);
        assert_eq!(alerts.0[0].category, "Food & Dining");
        assert_eq!(alerts.0[1].level, AlertLevel::Warning);
        assert_eq!(alerts.0[1].category, "Transport");
    }

    #[tokio::test]
    async fn no_alerts_without_budgets() {
        let state = get_test_state();

        let alerts = budget_alerts_endpoint(State(state), AuthenticatedUser(1))
            .await
            .unwrap();

        assert!(alerts.0.is_empty());
    }
}
