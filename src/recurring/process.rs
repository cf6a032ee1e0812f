//! Materialization of due recurring transactions.
//!
//! The scan and the per-rule firing are owner-scoped. Each firing runs
//! inside its own SQL transaction with a conditional due-date advance
//! ("advance only if `next_due_date` still equals the value we read"), so
//! two overlapping processing calls can never materialize the same firing
//! twice: the loser of the race sees zero updated rows and skips the rule.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    database_id::{RecurringId, TransactionId, UserId},
    money::Money,
    recurring::{core::Frequency, schedule::advance},
    transaction::{Transaction, TransactionKind, create_transaction},
};

/// The marker appended to the descriptions of materialized transactions.
const RECURRING_MARKER: &str = "(Recurring)";

/// A due rule as read by the processing scan.
///
/// The frequency is kept as raw text here so that a rule with an
/// unrecognized frequency can be skipped and reported on its own instead of
/// failing the whole scan.
#[derive(Debug)]
struct DueRule {
    id: RecurringId,
    kind: TransactionKind,
    category: String,
    amount: Money,
    description: String,
    next_due_date: Date,
    frequency: String,
}

/// One successful firing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedRule {
    /// The rule that fired.
    pub recurring: RecurringId,
    /// The transaction the firing created.
    pub transaction: TransactionId,
    /// The category of the created transaction.
    pub category: String,
    /// The amount of the created transaction.
    #[serde(with = "crate::money::serde_dollars")]
    pub amount: Money,
}

/// A rule that was due but could not be fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedRule {
    /// The rule that failed.
    pub recurring: RecurringId,
    /// Why it failed.
    pub error: String,
}

/// The result of one processing pass.
#[derive(Debug, PartialEq)]
pub struct ProcessOutcome {
    /// The rules that fired, in scan order.
    pub processed: Vec<ProcessedRule>,
    /// The rules that were due but failed. A failure here never prevents
    /// other rules from firing.
    pub failed: Vec<FailedRule>,
}

/// Materialize one transaction for every eligible rule owned by `user_id`.
///
/// A rule is eligible when it is active, `next_due_date` is at or before
/// `today`, and its end date (if any) has not passed. Each firing creates a
/// transaction dated at the rule's due date (not today), advances the due
/// date by one frequency step, and stamps `last_processed`. A rule that is
/// overdue by several periods still fires only once per call.
///
/// # Errors
/// Returns [Error::SqlError] if the due-rule scan itself fails. Per-rule
/// failures are reported in the outcome instead.
pub fn process_due(
    user_id: UserId,
    today: Date,
    connection: &Connection,
) -> Result<ProcessOutcome, Error> {
    let rules = due_rules(user_id, today, connection)?;

    let mut processed = Vec::new();
    let mut failed = Vec::new();

    for rule in rules {
        let frequency = match rule.frequency.parse::<Frequency>() {
            Ok(frequency) => frequency,
            Err(error) => {
                tracing::warn!("Skipping recurring transaction {}: {error}", rule.id);
                failed.push(FailedRule {
                    recurring: rule.id,
                    error: error.to_string(),
                });
                continue;
            }
        };

        match fire_rule(user_id, &rule, frequency, today, connection) {
            Ok(Some(transaction_id)) => processed.push(ProcessedRule {
                recurring: rule.id,
                transaction: transaction_id,
                category: rule.category.clone(),
                amount: rule.amount,
            }),
            // Lost the race to a concurrent processing call.
            Ok(None) => {}
            Err(error) => {
                tracing::warn!("Could not fire recurring transaction {}: {error}", rule.id);
                failed.push(FailedRule {
                    recurring: rule.id,
                    error: error.to_string(),
                });
            }
        }
    }

    Ok(ProcessOutcome { processed, failed })
}

fn due_rules(user_id: UserId, today: Date, connection: &Connection) -> Result<Vec<DueRule>, Error> {
    connection
        .prepare(
            "SELECT id, kind, category, amount, description, next_due_date, frequency
             FROM recurring
             WHERE user_id = ?1 AND is_active = 1 AND next_due_date <= ?2
               AND (end_date IS NULL OR end_date >= ?2)
             ORDER BY id ASC",
        )?
        .query_map((user_id, today), map_due_rule_row)?
        .map(|maybe_rule| maybe_rule.map_err(Error::SqlError))
        .collect()
}

fn map_due_rule_row(row: &Row) -> Result<DueRule, rusqlite::Error> {
    Ok(DueRule {
        id: row.get(0)?,
        kind: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        next_due_date: row.get(5)?,
        frequency: row.get(6)?,
    })
}

/// Fire a single due rule: advance its due date, then materialize the
/// transaction, atomically.
///
/// Returns `Ok(None)` when the conditional advance finds the due date
/// already moved, i.e. another processing call fired the rule first.
fn fire_rule(
    user_id: UserId,
    rule: &DueRule,
    frequency: Frequency,
    today: Date,
    connection: &Connection,
) -> Result<Option<TransactionId>, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let rows_affected = sql_transaction.execute(
        "UPDATE recurring SET next_due_date = ?1, last_processed = ?2
         WHERE id = ?3 AND user_id = ?4 AND next_due_date = ?5",
        (
            advance(rule.next_due_date, frequency),
            today,
            rule.id,
            user_id,
            rule.next_due_date,
        ),
    )?;

    if rows_affected == 0 {
        return Ok(None);
    }

    let description = if rule.description.is_empty() {
        RECURRING_MARKER.to_owned()
    } else {
        format!("{} {RECURRING_MARKER}", rule.description)
    };

    let transaction = create_transaction(
        Transaction::build(rule.kind, &rule.category, rule.amount, rule.next_due_date)
            .description(&description),
        user_id,
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(Some(transaction.id))
}
