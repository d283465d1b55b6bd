//! Income and expense categories that transactions and budgets are filed under.

mod create;
mod db;
mod defaults;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    NewCategory, count_category_budgets, count_category_transactions, create_category,
    create_category_table, delete_category, get_categories, get_category, update_category,
};
pub use defaults::{DEFAULT_CATEGORIES, create_default_categories};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryKind, CategoryName, Color, DEFAULT_ICON};
pub use edit::update_category_endpoint;
pub use list::{get_category_endpoint, list_categories_endpoint};
