//! Transactions: the record of money earned or spent.
//!
//! Contains the core model and database functions, filtered queries,
//! in-memory aggregation, and the HTTP endpoints for transaction CRUD,
//! statistics, and period views.

mod aggregation;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list_endpoint;
mod period_endpoint;
mod query;
mod stats_endpoint;
mod update_endpoint;

pub use aggregation::{
    AggregationResult, CategoryTotal, DailyTotal, TOP_CATEGORY_LIMIT, aggregate, daily_totals,
    expense_totals_by_category,
};
pub use core::{
    MAX_DESCRIPTION_LENGTH, Transaction, TransactionBuilder, TransactionKind, TransactionUpdate,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use period_endpoint::transactions_by_period_endpoint;
pub use query::{
    TransactionFilter, count_matching_transactions, query_transactions, sum_matching_amounts,
};
pub use stats_endpoint::transaction_stats_endpoint;
pub use update_endpoint::update_transaction_endpoint;
