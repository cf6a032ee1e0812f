//! Defines the endpoint for listing categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    category::core::{Category, get_all_categories},
};

/// The state needed to list categories.
#[derive(Debug, Clone)]
pub struct ListCategoriesState {
    /// The database connection for reading categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListCategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing all categories.
///
/// The default set is seeded during database initialization, so this is a
/// plain read.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_categories_endpoint(
    State(state): State<ListCategoriesState>,
    AuthenticatedUser(_user_id): AuthenticatedUser,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state.db_connection.lock().unwrap();
    let categories = get_all_categories(&connection)?;

    Ok(Json(categories))
}
