//! Recurring transactions: rules that materialize concrete transactions on a
//! schedule.
//!
//! A rule carries a template (type, category, amount, description), a
//! frequency, and a mutable `next_due_date`. Processing scans the caller's
//! rules against "today", creates one transaction per due rule, and advances
//! the due date with a conditional update so concurrent processing calls
//! cannot double-fire a rule.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod process;
mod process_endpoint;
mod schedule;
mod toggle_endpoint;
mod update_endpoint;

pub use core::{
    Frequency, RecurringTransaction, RecurringUpdate, create_recurring, create_recurring_table,
    delete_recurring, get_all_recurring, get_recurring, toggle_recurring, update_recurring,
};
pub use create_endpoint::create_recurring_endpoint;
pub use delete_endpoint::delete_recurring_endpoint;
pub use list_endpoint::list_recurring_endpoint;
pub use process::{FailedRule, ProcessOutcome, ProcessedRule, process_due};
pub use process_endpoint::process_recurring_endpoint;
pub use schedule::advance;
pub use toggle_endpoint::toggle_recurring_endpoint;
pub use update_endpoint::update_recurring_endpoint;
