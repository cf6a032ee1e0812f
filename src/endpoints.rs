//! The API endpoint URIs.

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to fetch aggregate transaction statistics.
pub const TRANSACTION_STATS: &str = "/api/transactions/stats";
/// The route to fetch transactions within a named period.
pub const TRANSACTIONS_BY_PERIOD: &str = "/api/transactions/period/{period}";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list and create budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to fetch budget alerts.
pub const BUDGET_ALERTS: &str = "/api/budgets/alerts";
/// The route to access a single budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";
/// The route to list and create recurring transactions.
pub const RECURRING: &str = "/api/recurring";
/// The route to materialize due recurring transactions.
pub const PROCESS_RECURRING: &str = "/api/recurring/process";
/// The route to access a single recurring transaction.
pub const RECURRING_TRANSACTION: &str = "/api/recurring/{recurring_id}";
/// The route to pause or resume a recurring transaction.
pub const TOGGLE_RECURRING: &str = "/api/recurring/{recurring_id}/toggle";
/// The route to list categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to export transactions as CSV.
pub const EXPORT_CSV: &str = "/api/export/csv";
/// The route to export a structured report as JSON.
pub const EXPORT_REPORT: &str = "/api/export/report";
/// The liveness probe route.
pub const HEALTH: &str = "/api/health";
