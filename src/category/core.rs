//! Defines the core category model, the default seed set, and the database
//! functions.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, database_id::CategoryId, transaction::TransactionKind};

/// A label transactions are grouped under, with display metadata for clients.
///
/// Categories are global rather than per-user; the seed set below is inserted
/// once, the first time the table is found empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name, e.g. "Food & Dining".
    pub name: String,
    /// Whether the category applies to income or expenses.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// An emoji shown next to the name.
    pub icon: String,
    /// A hex color for charts and chips.
    pub color: String,
    /// Whether this category came from the seed set.
    pub is_default: bool,
}

const DEFAULT_CATEGORIES: [(&str, TransactionKind, &str, &str); 20] = [
    ("Food & Dining", TransactionKind::Expense, "🍔", "#ef4444"),
    ("Transportation", TransactionKind::Expense, "🚗", "#f59e0b"),
    ("Shopping", TransactionKind::Expense, "🛍️", "#ec4899"),
    ("Entertainment", TransactionKind::Expense, "🎬", "#8b5cf6"),
    ("Healthcare", TransactionKind::Expense, "⚕️", "#10b981"),
    ("Bills & Utilities", TransactionKind::Expense, "📱", "#06b6d4"),
    ("Education", TransactionKind::Expense, "📚", "#3b82f6"),
    ("Travel", TransactionKind::Expense, "✈️", "#6366f1"),
    ("Housing", TransactionKind::Expense, "🏠", "#14b8a6"),
    ("Personal Care", TransactionKind::Expense, "💄", "#f97316"),
    ("Fitness", TransactionKind::Expense, "💪", "#84cc16"),
    ("Gifts", TransactionKind::Expense, "🎁", "#a855f7"),
    ("Other", TransactionKind::Expense, "📌", "#64748b"),
    ("Salary", TransactionKind::Income, "💰", "#22c55e"),
    ("Freelance", TransactionKind::Income, "💼", "#3b82f6"),
    ("Business", TransactionKind::Income, "🏢", "#8b5cf6"),
    ("Investments", TransactionKind::Income, "📈", "#06b6d4"),
    ("Rental", TransactionKind::Income, "🏘️", "#10b981"),
    ("Gift", TransactionKind::Income, "🎁", "#f59e0b"),
    ("Other", TransactionKind::Income, "💵", "#64748b"),
];

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                icon TEXT NOT NULL,
                color TEXT NOT NULL,
                is_default INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('category', 0)",
        (),
    )?;

    Ok(())
}

/// Insert the default category set iff the category table is empty.
///
/// Runs during database initialization so the seed is an explicit startup
/// step rather than a side effect of the first list request.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM category", [], |row| row.get(0))?;

    if count > 0 {
        return Ok(());
    }

    let mut statement = connection.prepare(
        "INSERT INTO category (name, kind, icon, color, is_default) VALUES (?1, ?2, ?3, ?4, 1)",
    )?;

    for (name, kind, icon, color) in DEFAULT_CATEGORIES {
        statement.execute((name, kind, icon, color))?;
    }

    Ok(())
}

/// Retrieve all categories in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, kind, icon, color, is_default FROM category ORDER BY id ASC")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of categories in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn count_categories(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM category", [], |row| row.get(0))
        .map_err(|error| error.into())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        icon: row.get(3)?,
        color: row.get(4)?,
        is_default: row.get(5)?,
    })
}
