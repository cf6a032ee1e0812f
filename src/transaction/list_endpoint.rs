//! Defines the endpoint for listing transactions with filters and pagination.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    pagination::{PaginationConfig, resolve_page_params, total_pages},
    transaction::{
        core::{Transaction, TransactionKind},
        query::{TransactionFilter, count_matching_transactions, query_transactions},
    },
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to page lists of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters accepted by the transaction list endpoint.
///
/// All criteria are optional and combined with AND.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// Match only transactions of this type.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Match only transactions with this category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Match only transactions on or after this date.
    #[serde(default)]
    pub start_date: Option<Date>,
    /// Match only transactions on or before this date.
    #[serde(default)]
    pub end_date: Option<Date>,
    /// The 1-based page to return. Defaults to 1.
    #[serde(default)]
    pub page: Option<i64>,
    /// The page size. Defaults to 50.
    #[serde(default)]
    pub limit: Option<i64>,
}

/// One page of transactions plus paging metadata.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListResponse {
    /// The requested page, newest transactions first.
    pub transactions: Vec<Transaction>,
    /// The number of pages in the full result set.
    pub total_pages: u64,
    /// The page this response covers.
    pub current_page: u64,
    /// The number of transactions in the full result set.
    pub total: u64,
}

/// A route handler for listing the caller's transactions, newest first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<TransactionListResponse>, Error> {
    let page_params = resolve_page_params(query.page, query.limit, &state.pagination_config)?;

    let filter = TransactionFilter {
        kind: query
            .kind
            .as_deref()
            .map(str::parse::<TransactionKind>)
            .transpose()?,
        category: query.category,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let connection = state.db_connection.lock().unwrap();
    let transactions = query_transactions(user_id, &filter, Some(page_params), &connection)?;
    let total = count_matching_transactions(user_id, &filter, &connection)?;

    Ok(Json(TransactionListResponse {
        transactions,
        total_pages: total_pages(total, page_params.limit),
        current_page: page_params.page,
        total,
    }))
}
