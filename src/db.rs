//! Database initialization for the application's domain models.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, budget, category, recurring, transaction};

/// Create the application's tables and seed the default categories.
///
/// Table creation is idempotent, and the category seed only runs when the
/// category table is empty, so this is safe to call on every startup.
///
/// # Errors
/// Returns an error if a table cannot be created or the seed cannot be
/// inserted.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    transaction::create_transaction_table(&sql_transaction)?;
    category::create_category_table(&sql_transaction)?;
    budget::create_budget_table(&sql_transaction)?;
    recurring::create_recurring_table(&sql_transaction)?;

    category::seed_default_categories(&sql_transaction)?;

    sql_transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::category::count_categories;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("first initialization failed");
        initialize(&conn).expect("second initialization failed");
    }

    #[test]
    fn initialize_seeds_categories_once() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        let after_first = count_categories(&conn).unwrap();
        initialize(&conn).unwrap();
        let after_second = count_categories(&conn).unwrap();

        assert!(after_first > 0, "expected default categories to be seeded");
        assert_eq!(after_first, after_second);
    }
}
