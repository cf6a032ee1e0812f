//! Defines the core budget model and database functions.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{
    Error,
    database_id::{BudgetId, UserId},
    money::Money,
    period::BudgetPeriod,
};

/// The sentinel category label meaning "every expense category".
pub const ALL_CATEGORIES: &str = "All";

/// The alert threshold applied when a budget is created without one.
pub const DEFAULT_ALERT_THRESHOLD: i64 = 80;

/// A spending limit for one category over a recurring window.
///
/// Each user can have at most one budget per category; the database enforces
/// this with a unique index and violations surface as
/// [Error::DuplicateBudget].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The user the budget belongs to.
    pub user_id: UserId,
    /// The expense category the budget caps, or [ALL_CATEGORIES].
    pub category: String,
    /// The spending limit per period.
    #[serde(with = "crate::money::serde_dollars")]
    pub amount: Money,
    /// How often the budget window resets.
    pub period: BudgetPeriod,
    /// The percentage of the limit at which a warning fires, 0-100.
    pub alert_threshold: i64,
    /// Whether the budget is evaluated and shown.
    pub is_active: bool,
}

/// The subset of budget fields that may be changed after creation.
///
/// `None` leaves the stored value untouched. The category is fixed at
/// creation; replacing it would silently re-point the budget's history.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BudgetUpdate {
    /// Replacement spending limit.
    pub amount: Option<Money>,
    /// Replacement window.
    pub period: Option<BudgetPeriod>,
    /// Replacement alert threshold.
    pub alert_threshold: Option<i64>,
    /// Pause or resume the budget.
    pub is_active: Option<bool>,
}

fn validate(amount: Money, alert_threshold: i64) -> Result<(), Error> {
    if !amount.is_positive() {
        return Err(Error::InvalidAmount);
    }

    if !(0..=100).contains(&alert_threshold) {
        return Err(Error::InvalidAlertThreshold(alert_threshold));
    }

    Ok(())
}

/// Create a new budget in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is zero or negative,
/// - or [Error::InvalidAlertThreshold] if the threshold is outside 0-100,
/// - or [Error::DuplicateBudget] if the user already budgets this category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(
    user_id: UserId,
    category: &str,
    amount: Money,
    period: BudgetPeriod,
    alert_threshold: i64,
    connection: &Connection,
) -> Result<Budget, Error> {
    validate(amount, alert_threshold)?;

    let budget = connection
        .prepare(
            "INSERT INTO budget (user_id, category, amount, period, alert_threshold, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)
             RETURNING id, user_id, category, amount, period, alert_threshold, is_active",
        )?
        .query_row(
            (user_id, category, amount, period, alert_threshold),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Retrieve a budget owned by `user_id` from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a budget owned by the user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_budget(id: BudgetId, user_id: UserId, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare(
            "SELECT id, user_id, category, amount, period, alert_threshold, is_active
             FROM budget WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(&[(":id", &id), (":user_id", &user_id)], map_budget_row)?;

    Ok(budget)
}

/// Retrieve the active budgets owned by `user_id`.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_active_budgets(user_id: UserId, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount, period, alert_threshold, is_active
             FROM budget WHERE user_id = :user_id AND is_active = 1
             ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id)], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Apply `update` to a budget owned by `user_id`, returning the updated row.
///
/// Omitted fields keep their stored values; the merged amount and threshold
/// are re-validated before writing.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the budget does not exist or is owned by another
///   user,
/// - or [Error::InvalidAmount]/[Error::InvalidAlertThreshold] if the merged
///   fields fail validation,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_budget(
    id: BudgetId,
    user_id: UserId,
    update: BudgetUpdate,
    connection: &Connection,
) -> Result<Budget, Error> {
    let existing = get_budget(id, user_id, connection)?;

    let merged = Budget {
        id: existing.id,
        user_id: existing.user_id,
        category: existing.category,
        amount: update.amount.unwrap_or(existing.amount),
        period: update.period.unwrap_or(existing.period),
        alert_threshold: update.alert_threshold.unwrap_or(existing.alert_threshold),
        is_active: update.is_active.unwrap_or(existing.is_active),
    };

    validate(merged.amount, merged.alert_threshold)?;

    connection.execute(
        "UPDATE budget SET amount = ?1, period = ?2, alert_threshold = ?3, is_active = ?4
         WHERE id = ?5 AND user_id = ?6",
        (
            merged.amount,
            merged.period,
            merged.alert_threshold,
            merged.is_active,
            id,
            user_id,
        ),
    )?;

    Ok(merged)
}

/// Delete a budget owned by `user_id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the budget does not exist or is owned by another
///   user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_budget(id: BudgetId, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM budget WHERE id = ?1 AND user_id = ?2", (id, user_id))?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                amount INTEGER NOT NULL,
                period TEXT NOT NULL,
                alert_threshold INTEGER NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                UNIQUE(user_id, category)
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('budget', 0)",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        period: row.get(4)?,
        alert_threshold: row.get(5)?,
        is_active: row.get(6)?,
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{
        Error, db::initialize, money::Money, period::BudgetPeriod,
    };

    use super::{
        BudgetUpdate, create_budget, delete_budget, get_active_budgets, get_budget, update_budget,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let budget = create_budget(
            1,
            "Food & Dining",
            Money::from_cents(30_000),
            BudgetPeriod::Monthly,
            80,
            &conn,
        )
        .expect("Could not create budget");

        assert!(budget.id > 0);
        assert!(budget.is_active);
        assert_eq!(budget.period, BudgetPeriod::Monthly);
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let conn = get_test_connection();
        create_budget(
            1,
            "Food & Dining",
            Money::from_cents(30_000),
            BudgetPeriod::Monthly,
            80,
            &conn,
        )
        .unwrap();

        let duplicate = create_budget(
            1,
            "Food & Dining",
            Money::from_cents(10_000),
            BudgetPeriod::Weekly,
            50,
            &conn,
        );

        assert_eq!(duplicate, Err(Error::DuplicateBudget));
    }

    #[test]
    fn same_category_for_another_user_is_allowed() {
        let conn = get_test_connection();
        create_budget(
            1,
            "Food & Dining",
            Money::from_cents(30_000),
            BudgetPeriod::Monthly,
            80,
            &conn,
        )
        .unwrap();

        let other_user = create_budget(
            2,
            "Food & Dining",
            Money::from_cents(20_000),
            BudgetPeriod::Monthly,
            80,
            &conn,
        );

        assert!(other_user.is_ok());
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let conn = get_test_connection();

        let result = create_budget(
            1,
            "Travel",
            Money::ZERO,
            BudgetPeriod::Monthly,
            80,
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidAmount));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let conn = get_test_connection();

        for threshold in [-1, 101] {
            let result = create_budget(
                1,
                "Travel",
                Money::from_cents(10_000),
                BudgetPeriod::Monthly,
                threshold,
                &conn,
            );

            assert_eq!(result, Err(Error::InvalidAlertThreshold(threshold)));
        }
    }

    #[test]
    fn update_merges_provided_fields() {
        let conn = get_test_connection();
        let budget = create_budget(
            1,
            "Travel",
            Money::from_cents(10_000),
            BudgetPeriod::Monthly,
            80,
            &conn,
        )
        .unwrap();

        let updated = update_budget(
            budget.id,
            1,
            BudgetUpdate {
                amount: Some(Money::from_cents(15_000)),
                is_active: Some(false),
                ..Default::default()
            },
            &conn,
        )
        .expect("Could not update budget");

        assert_eq!(updated.amount, Money::from_cents(15_000));
        assert!(!updated.is_active);
        assert_eq!(updated.period, BudgetPeriod::Monthly);
        assert_eq!(updated.alert_threshold, 80);

        let stored = get_budget(budget.id, 1, &conn).unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn inactive_budgets_are_excluded_from_active_list() {
        let conn = get_test_connection();
        let kept = create_budget(
            1,
            "Travel",
            Money::from_cents(10_000),
            BudgetPeriod::Monthly,
            80,
            &conn,
        )
        .unwrap();
        let paused = create_budget(
            1,
            "Fitness",
            Money::from_cents(5_000),
            BudgetPeriod::Weekly,
            80,
            &conn,
        )
        .unwrap();
        update_budget(
            paused.id,
            1,
            BudgetUpdate {
                is_active: Some(false),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        let active = get_active_budgets(1, &conn).expect("Could not list budgets");

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, kept.id);
    }

    #[test]
    fn delete_is_scoped_to_owner() {
        let conn = get_test_connection();
        let budget = create_budget(
            1,
            "Travel",
            Money::from_cents(10_000),
            BudgetPeriod::Monthly,
            80,
            &conn,
        )
        .unwrap();

        assert_eq!(delete_budget(budget.id, 2, &conn), Err(Error::NotFound));
        assert!(delete_budget(budget.id, 1, &conn).is_ok());
        assert_eq!(get_budget(budget.id, 1, &conn), Err(Error::NotFound));
    }
}
