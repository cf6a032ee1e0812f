//! Categories: the shared labels transactions and budgets are grouped by.

mod core;
mod list_endpoint;

pub use core::{
    Category, count_categories, create_category_table, get_all_categories,
    seed_default_categories,
};
pub use list_endpoint::list_categories_endpoint;
