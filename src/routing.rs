//! Application router configuration for the JSON API.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    budget::{
        budget_alerts_endpoint, create_budget_endpoint, delete_budget_endpoint,
        list_budgets_endpoint, update_budget_endpoint,
    },
    category::list_categories_endpoint,
    endpoints,
    export::{export_csv_endpoint, export_report_endpoint},
    recurring::{
        create_recurring_endpoint, delete_recurring_endpoint, list_recurring_endpoint,
        process_recurring_endpoint, toggle_recurring_endpoint, update_recurring_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, transaction_stats_endpoint, transactions_by_period_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(endpoints::TRANSACTION_STATS, get(transaction_stats_endpoint))
        .route(
            endpoints::TRANSACTIONS_BY_PERIOD,
            get(transactions_by_period_endpoint),
        )
        .route(endpoints::TRANSACTION, get(get_transaction_endpoint))
        .route(endpoints::TRANSACTION, put(update_transaction_endpoint))
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .route(endpoints::BUDGETS, get(list_budgets_endpoint))
        .route(endpoints::BUDGETS, post(create_budget_endpoint))
        .route(endpoints::BUDGET_ALERTS, get(budget_alerts_endpoint))
        .route(endpoints::BUDGET, put(update_budget_endpoint))
        .route(endpoints::BUDGET, delete(delete_budget_endpoint))
        .route(endpoints::RECURRING, get(list_recurring_endpoint))
        .route(endpoints::RECURRING, post(create_recurring_endpoint))
        .route(endpoints::PROCESS_RECURRING, post(process_recurring_endpoint))
        .route(endpoints::RECURRING_TRANSACTION, put(update_recurring_endpoint))
        .route(
            endpoints::RECURRING_TRANSACTION,
            delete(delete_recurring_endpoint),
        )
        .route(endpoints::TOGGLE_RECURRING, patch(toggle_recurring_endpoint))
        .route(endpoints::CATEGORIES, get(list_categories_endpoint))
        .route(endpoints::EXPORT_CSV, get(export_csv_endpoint))
        .route(endpoints::EXPORT_REPORT, get(export_report_endpoint))
        .route(endpoints::HEALTH, get(get_health))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Report that the server is up and serving requests.
async fn get_health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "The requested route does not exist" })),
    )
        .into_response()
}
