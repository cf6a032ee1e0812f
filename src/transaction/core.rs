//! Defines the core data model and database functions for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{TransactionId, UserId},
    money::Money,
};

/// The maximum number of characters allowed in a transaction description.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// Whether a transaction brings money in or takes money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. salary or an investment payout.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The canonical lowercase label, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(Error::InvalidTransactionKind(other.to_owned())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An income or expense, i.e. an event where money was either earned or spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user the transaction belongs to.
    pub user_id: UserId,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category label, e.g. "Food & Dining".
    pub category: String,
    /// The amount of money earned or spent in this transaction.
    #[serde(with = "crate::money::serde_dollars")]
    pub amount: Money,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(kind: TransactionKind, category: &str, amount: Money, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            category: category.to_owned(),
            amount,
            description: String::new(),
            date,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Required fields are set by [Transaction::build]; the description defaults
/// to an empty string. Validation happens in [create_transaction], before
/// anything is written.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
    /// The category label.
    pub category: String,
    /// The monetary amount of the transaction. Must be greater than zero;
    /// the direction of the money flow is carried by `kind`.
    pub amount: Money,
    /// A human-readable description of the transaction, at most
    /// [MAX_DESCRIPTION_LENGTH] characters.
    pub description: String,
    /// The date when the transaction occurred.
    pub date: Date,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

/// The subset of transaction fields that may be changed after creation.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionUpdate {
    /// Replacement transaction type.
    pub kind: Option<TransactionKind>,
    /// Replacement category label.
    pub category: Option<String>,
    /// Replacement amount.
    pub amount: Option<Money>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement date.
    pub date: Option<Date>,
}

fn validate(amount: Money, description: &str) -> Result<(), Error> {
    if !amount.is_positive() {
        return Err(Error::InvalidAmount);
    }

    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(Error::DescriptionTooLong);
    }

    Ok(())
}

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is zero or negative,
/// - or [Error::DescriptionTooLong] if the description exceeds
///   [MAX_DESCRIPTION_LENGTH] characters,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate(builder.amount, &builder.description)?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, kind, category, amount, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, kind, category, amount, description, date",
        )?
        .query_row(
            (
                user_id,
                builder.kind,
                builder.category,
                builder.amount,
                builder.description,
                builder.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction owned by `user_id` from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by the
///   user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, kind, category, amount, description, date
             FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            &[(":id", &id), (":user_id", &user_id)],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Apply `update` to a transaction owned by `user_id`, returning the updated
/// row.
///
/// Omitted fields keep their stored values. Changing the amount or the
/// description re-validates the merged result before writing.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the transaction does not exist or is owned by
///   another user,
/// - or [Error::InvalidAmount]/[Error::DescriptionTooLong] if the merged
///   fields fail validation,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let existing = get_transaction(id, user_id, connection)?;

    let merged = Transaction {
        id: existing.id,
        user_id: existing.user_id,
        kind: update.kind.unwrap_or(existing.kind),
        category: update.category.unwrap_or(existing.category),
        amount: update.amount.unwrap_or(existing.amount),
        description: update.description.unwrap_or(existing.description),
        date: update.date.unwrap_or(existing.date),
    };

    validate(merged.amount, &merged.description)?;

    connection.execute(
        "UPDATE \"transaction\"
         SET kind = ?1, category = ?2, amount = ?3, description = ?4, date = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            merged.kind,
            &merged.category,
            merged.amount,
            &merged.description,
            merged.date,
            id,
            user_id,
        ),
    )?;

    Ok(merged)
}

/// Delete a transaction owned by `user_id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the transaction does not exist or is owned by
///   another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                category TEXT NOT NULL,
                amount INTEGER NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite index used by every owner-scoped list and aggregation query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: row.get(2)?,
        category: row.get(3)?,
        amount: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        money::Money,
        transaction::{
            Transaction, TransactionKind, TransactionUpdate, create_transaction,
            delete_transaction, get_transaction, update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = Money::from_cents(1230);

        let result = create_transaction(
            Transaction::build(
                TransactionKind::Expense,
                "Food & Dining",
                amount,
                date!(2025 - 10 - 05),
            )
            .description("groceries"),
            1,
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.kind, TransactionKind::Expense);
                assert_eq!(transaction.user_id, 1);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_non_positive_amount() {
        let conn = get_test_connection();

        for cents in [0, -500] {
            let result = create_transaction(
                Transaction::build(
                    TransactionKind::Income,
                    "Salary",
                    Money::from_cents(cents),
                    date!(2025 - 10 - 05),
                ),
                1,
                &conn,
            );

            assert_eq!(result, Err(Error::InvalidAmount));
        }
    }

    #[test]
    fn create_fails_on_oversized_description() {
        let conn = get_test_connection();
        let description = "x".repeat(201);

        let result = create_transaction(
            Transaction::build(
                TransactionKind::Expense,
                "Shopping",
                Money::from_cents(100),
                date!(2025 - 10 - 05),
            )
            .description(&description),
            1,
            &conn,
        );

        assert_eq!(result, Err(Error::DescriptionTooLong));
    }

    #[test]
    fn get_is_scoped_to_owner() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(
                TransactionKind::Expense,
                "Travel",
                Money::from_cents(9900),
                date!(2025 - 10 - 05),
            ),
            1,
            &conn,
        )
        .expect("Could not create transaction");

        let same_owner = get_transaction(transaction.id, 1, &conn);
        let other_owner = get_transaction(transaction.id, 2, &conn);

        assert_eq!(same_owner, Ok(transaction));
        assert_eq!(other_owner, Err(Error::NotFound));
    }

    #[test]
    fn update_merges_provided_fields() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(
                TransactionKind::Expense,
                "Shopping",
                Money::from_cents(2000),
                date!(2025 - 10 - 05),
            )
            .description("shoes"),
            1,
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            transaction.id,
            1,
            TransactionUpdate {
                amount: Some(Money::from_cents(2500)),
                ..Default::default()
            },
            &conn,
        )
        .expect("Could not update transaction");

        assert_eq!(updated.amount, Money::from_cents(2500));
        assert_eq!(updated.description, "shoes");
        assert_eq!(updated.category, "Shopping");

        let stored = get_transaction(transaction.id, 1, &conn).unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn update_missing_transaction_returns_not_found() {
        let conn = get_test_connection();

        let result = update_transaction(999, 1, TransactionUpdate::default(), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_the_row() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(
                TransactionKind::Income,
                "Salary",
                Money::from_cents(100_000),
                date!(2025 - 10 - 05),
            ),
            1,
            &conn,
        )
        .unwrap();

        delete_transaction(transaction.id, 1, &conn).expect("Could not delete transaction");

        assert_eq!(get_transaction(transaction.id, 1, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_is_scoped_to_owner() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(
                TransactionKind::Income,
                "Salary",
                Money::from_cents(100_000),
                date!(2025 - 10 - 05),
            ),
            1,
            &conn,
        )
        .unwrap();

        let result = delete_transaction(transaction.id, 2, &conn);

        assert_eq!(result, Err(Error::NotFound));
        assert!(get_transaction(transaction.id, 1, &conn).is_ok());
    }
}
