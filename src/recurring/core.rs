//! Defines the core recurring-transaction model and database functions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{RecurringId, UserId},
    money::Money,
    transaction::{MAX_DESCRIPTION_LENGTH, TransactionKind},
};

/// How often a recurring transaction fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Every 7 days.
    Weekly,
    /// Every 14 days.
    Biweekly,
    /// Every calendar month.
    Monthly,
    /// Every calendar year.
    Yearly,
}

impl Frequency {
    /// The canonical lowercase label, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(Error::InvalidFrequency(other.to_owned())),
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for Frequency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Frequency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A rule that materializes a transaction on a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    /// The ID of the recurring transaction.
    pub id: RecurringId,
    /// The user the rule belongs to.
    pub user_id: UserId,
    /// Whether the materialized transactions are income or expenses.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category for materialized transactions.
    pub category: String,
    /// The amount of each materialized transaction.
    #[serde(with = "crate::money::serde_dollars")]
    pub amount: Money,
    /// The description template for materialized transactions.
    pub description: String,
    /// How often the rule fires.
    pub frequency: Frequency,
    /// The date the schedule starts.
    pub start_date: Date,
    /// The next date at or after which the rule should fire. Advances by one
    /// frequency step each time the rule is processed.
    pub next_due_date: Date,
    /// The date after which the rule stops firing, if any.
    pub end_date: Option<Date>,
    /// Whether the rule participates in processing. Toggling does not touch
    /// the due date.
    pub is_active: bool,
    /// When the rule last fired, if ever.
    pub last_processed: Option<Date>,
}

/// The subset of recurring-transaction fields that may be changed after
/// creation.
///
/// `None` leaves the stored value untouched. Changing the frequency does not
/// recompute `next_due_date`; the new step applies from the next firing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecurringUpdate {
    /// Replacement transaction type.
    pub kind: Option<TransactionKind>,
    /// Replacement category label.
    pub category: Option<String>,
    /// Replacement amount.
    pub amount: Option<Money>,
    /// Replacement description template.
    pub description: Option<String>,
    /// Replacement frequency.
    pub frequency: Option<Frequency>,
    /// Replacement end date.
    pub end_date: Option<Date>,
    /// Pause or resume the rule.
    pub is_active: Option<bool>,
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

/// Create a new recurring transaction in the database.
///
/// The first due date is the start date.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is zero or negative,
/// - or [Error::DescriptionTooLong] if the description exceeds
///   [MAX_DESCRIPTION_LENGTH] characters,
/// - or [Error::SqlError] if there is some other SQL error.
#[allow(clippy::too_many_arguments)]
pub fn create_recurring(
    user_id: UserId,
    kind: TransactionKind,
    category: &str,
    amount: Money,
    description: &str,
    frequency: Frequency,
    start_date: Date,
    end_date: Option<Date>,
    connection: &Connection,
) -> Result<RecurringTransaction, Error> {
    validate(amount, description)?;

    let recurring = connection
        .prepare(
            "INSERT INTO recurring
                (user_id, kind, category, amount, description, frequency,
                 start_date, next_due_date, end_date, is_active, last_processed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?8, 1, NULL)
             RETURNING id, user_id, kind, category, amount, description, frequency,
                       start_date, next_due_date, end_date, is_active, last_processed",
        )?
        .query_row(
            (
                user_id,
                kind,
                category,
                amount,
                description,
                frequency,
                start_date,
                end_date,
            ),
            map_recurring_row,
        )?;

    Ok(recurring)
}

/// Retrieve a recurring transaction owned by `user_id` by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a recurring transaction
///   owned by the user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_recurring(
    id: RecurringId,
    user_id: UserId,
    connection: &Connection,
) -> Result<RecurringTransaction, Error> {
    let recurring = connection
        .prepare(
            "SELECT id, user_id, kind, category, amount, description, frequency,
                    start_date, next_due_date, end_date, is_active, last_processed
             FROM recurring WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(&[(":id", &id), (":user_id", &user_id)], map_recurring_row)?;

    Ok(recurring)
}

/// Retrieve all recurring transactions owned by `user_id`, soonest due first.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_recurring(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<RecurringTransaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, kind, category, amount, description, frequency,
                    start_date, next_due_date, end_date, is_active, last_processed
             FROM recurring WHERE user_id = :user_id
             ORDER BY next_due_date ASC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id)], map_recurring_row)?
        .map(|maybe_recurring| maybe_recurring.map_err(|error| error.into()))
        .collect()
}

/// Apply `update` to a recurring transaction owned by `user_id`, returning
/// the updated row.
///
/// Omitted fields keep their stored values; `next_due_date` is never touched
/// here, only by processing.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the rule does not exist or is owned by another
///   user,
/// - or [Error::InvalidAmount]/[Error::DescriptionTooLong] if the merged
///   fields fail validation,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_recurring(
    id: RecurringId,
    user_id: UserId,
    update: RecurringUpdate,
    connection: &Connection,
) -> Result<RecurringTransaction, Error> {
    let existing = get_recurring(id, user_id, connection)?;

    let merged = RecurringTransaction {
        id: existing.id,
        user_id: existing.user_id,
        kind: update.kind.unwrap_or(existing.kind),
        category: update.category.unwrap_or(existing.category),
        amount: update.amount.unwrap_or(existing.amount),
        description: update.description.unwrap_or(existing.description),
        frequency: update.frequency.unwrap_or(existing.frequency),
        start_date: existing.start_date,
        next_due_date: existing.next_due_date,
        end_date: update.end_date.or(existing.end_date),
        is_active: update.is_active.unwrap_or(existing.is_active),
        last_processed: existing.last_processed,
    };

    validate(merged.amount, &merged.description)?;

    connection.execute(
        "UPDATE recurring
         SET kind = ?1, category = ?2, amount = ?3, description = ?4, frequency = ?5,
             end_date = ?6, is_active = ?7
         WHERE id = ?8 AND user_id = ?9",
        (
            merged.kind,
            &merged.category,
            merged.amount,
            &merged.description,
            merged.frequency,
            merged.end_date,
            merged.is_active,
            id,
            user_id,
        ),
    )?;

    Ok(merged)
}

/// Flip the active flag of a recurring transaction owned by `user_id`.
///
/// The due date is left as-is, so resuming a long-paused rule makes it due
/// immediately.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the rule does not exist or is owned by another
///   user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn toggle_recurring(
    id: RecurringId,
    user_id: UserId,
    connection: &Connection,
) -> Result<RecurringTransaction, Error> {
    let rows_affected = connection.execute(
        "UPDATE recurring SET is_active = 1 - is_active WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_recurring(id, user_id, connection)
}

/// Delete a recurring transaction owned by `user_id` from the database.
///
/// Transactions it already materialized are kept.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the rule does not exist or is owned by another
///   user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_recurring(
    id: RecurringId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM recurring WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the recurring transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_recurring_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurring (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                category TEXT NOT NULL,
                amount INTEGER NOT NULL,
                description TEXT NOT NULL,
                frequency TEXT NOT NULL,
                start_date TEXT NOT NULL,
                next_due_date TEXT NOT NULL,
                end_date TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                last_processed TEXT
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('recurring', 0)",
        (),
    )?;

    // Composite index used by the due-rule scan.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_recurring_user_active_due
         ON recurring(user_id, is_active, next_due_date);",
        (),
    )?;

    Ok(())
}

fn map_recurring_row(row: &Row) -> Result<RecurringTransaction, rusqlite::Error> {
    Ok(RecurringTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: row.get(2)?,
        category: row.get(3)?,
        amount: row.get(4)?,
        description: row.get(5)?,
        frequency: row.get(6)?,
        start_date: row.get(7)?,
        next_due_date: row.get(8)?,
        end_date: row.get(9)?,
        is_active: row.get(10)?,
        last_processed: row.get(11)?,
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, db::initialize, money::Money, transaction::TransactionKind,
    };

    use super::{
        Frequency, RecurringUpdate, create_recurring, delete_recurring, get_all_recurring,
        get_recurring, toggle_recurring, update_recurring,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_sets_first_due_date_to_start_date() {
        let conn = get_test_connection();

        let recurring = create_recurring(
            1,
            TransactionKind::Expense,
            "Housing",
            Money::from_cents(120_000),
            "Rent",
            Frequency::Monthly,
            date!(2025 - 01 - 01),
            None,
            &conn,
        )
        .expect("Could not create recurring transaction");

        assert_eq!(recurring.next_due_date, date!(2025 - 01 - 01));
        assert_eq!(recurring.last_processed, None);
        assert!(recurring.is_active);
    }

    #[test]
    fn create_rejects_non_positive_amount() {
        let conn = get_test_connection();

        let result = create_recurring(
            1,
            TransactionKind::Expense,
            "Housing",
            Money::ZERO,
            "Rent",
            Frequency::Monthly,
            date!(2025 - 01 - 01),
            None,
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidAmount));
    }

    #[test]
    fn list_sorts_by_next_due_date() {
        let conn = get_test_connection();
        for (category, start) in [
            ("Housing", date!(2025 - 02 - 01)),
            ("Fitness", date!(2025 - 01 - 15)),
        ] {
            create_recurring(
                1,
                TransactionKind::Expense,
                category,
                Money::from_cents(1_000),
                "",
                Frequency::Monthly,
                start,
                None,
                &conn,
            )
            .unwrap();
        }

        let all = get_all_recurring(1, &conn).expect("Could not list recurring transactions");

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].category, "Fitness");
        assert_eq!(all[1].category, "Housing");
    }

    #[test]
    fn update_does_not_touch_due_date() {
        let conn = get_test_connection();
        let recurring = create_recurring(
            1,
            TransactionKind::Expense,
            "Housing",
            Money::from_cents(120_000),
            "Rent",
            Frequency::Monthly,
            date!(2025 - 01 - 01),
            None,
            &conn,
        )
        .unwrap();

        let updated = update_recurring(
            recurring.id,
            1,
            RecurringUpdate {
                frequency: Some(Frequency::Weekly),
                amount: Some(Money::from_cents(130_000)),
                ..Default::default()
            },
            &conn,
        )
        .expect("Could not update recurring transaction");

        assert_eq!(updated.frequency, Frequency::Weekly);
        assert_eq!(updated.next_due_date, recurring.next_due_date);

        let stored = get_recurring(recurring.id, 1, &conn).unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn toggle_flips_active_flag_only() {
        let conn = get_test_connection();
        let recurring = create_recurring(
            1,
            TransactionKind::Expense,
            "Housing",
            Money::from_cents(120_000),
            "Rent",
            Frequency::Monthly,
            date!(2025 - 01 - 01),
            None,
            &conn,
        )
        .unwrap();

        let paused = toggle_recurring(recurring.id, 1, &conn).expect("Could not toggle");
        assert!(!paused.is_active);
        assert_eq!(paused.next_due_date, recurring.next_due_date);

        let resumed = toggle_recurring(recurring.id, 1, &conn).expect("Could not toggle back");
        assert!(resumed.is_active);
    }

    #[test]
    fn delete_is_scoped_to_owner() {
        let conn = get_test_connection();
        let recurring = create_recurring(
            1,
            TransactionKind::Expense,
            "Housing",
            Money::from_cents(120_000),
            "Rent",
            Frequency::Monthly,
            date!(2025 - 01 - 01),
            None,
            &conn,
        )
        .unwrap();

        assert_eq!(delete_recurring(recurring.id, 2, &conn), Err(Error::NotFound));
        assert!(delete_recurring(recurring.id, 1, &conn).is_ok());
        assert_eq!(get_recurring(recurring.id, 1, &conn), Err(Error::NotFound));
    }
}
