//! Fintrack is a personal finance tracking service: income and expense
//! transactions, category budgets with alerts, recurring transactions, and
//! CSV/JSON report export.
//!
//! This library provides a REST API that serves JSON. Persistence is SQLite;
//! the authenticated user identity is supplied by an upstream proxy via the
//! `X-User-Id` header.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod budget;
mod category;
mod database_id;
mod db;
mod endpoints;
mod export;
mod logging;
mod money;
mod pagination;
mod period;
mod recurring;
mod routing;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a usable user identity.
    ///
    /// The identity header is set by the authenticating reverse proxy; a
    /// request without it never reaches the domain layer.
    #[error("missing or invalid user identity")]
    Unauthenticated,

    /// The requested resource was not found, or is owned by another user.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A zero or negative monetary amount was supplied.
    ///
    /// Transaction, budget, and recurring-transaction amounts must all be
    /// greater than zero.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// A transaction description longer than the allowed maximum.
    #[error("description cannot exceed 200 characters")]
    DescriptionTooLong,

    /// A transaction type other than "income" or "expense".
    #[error("invalid transaction type \"{0}\", expected income or expense")]
    InvalidTransactionKind(String),

    /// A reporting period keyword other than day, week, or month.
    #[error("invalid period \"{0}\", use day, week, or month")]
    InvalidPeriod(String),

    /// A budget period other than weekly or monthly.
    #[error("invalid budget period \"{0}\", use weekly or monthly")]
    InvalidBudgetPeriod(String),

    /// A recurrence frequency outside the recognized set.
    #[error("invalid frequency \"{0}\", use daily, weekly, biweekly, monthly, or yearly")]
    InvalidFrequency(String),

    /// A budget alert threshold outside the range 0-100.
    #[error("alert threshold must be between 0 and 100, got {0}")]
    InvalidAlertThreshold(i64),

    /// A page or limit query parameter of zero or less.
    #[error("page and limit must be greater than zero")]
    InvalidPageParameter,

    /// The user already has a budget for the requested category.
    #[error("Budget for this category already exists")]
    DuplicateBudget,

    /// An error occurred while resolving a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("budget.") =>
            {
                Error::DuplicateBudget
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) | Error::InvalidTimezone(_) => {
                tracing::error!("An unexpected error occurred: {self}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "An unexpected error occurred" })),
                )
                    .into_response();
            }
            _ => StatusCode::BAD_REQUEST,
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
