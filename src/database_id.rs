//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// Database identifier for a user (assigned by the upstream identity service).
pub type UserId = i64;
/// Database identifier for a transaction.
pub type TransactionId = i64;
/// Database identifier for a budget.
pub type BudgetId = i64;
/// Database identifier for a recurring transaction.
pub type RecurringId = i64;
/// Database identifier for a category.
pub type CategoryId = i64;
