//! Monthly spending limits per expense category.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_budget_endpoint;
pub use db::{
    NewBudget, create_budget, create_budget_table, delete_budget, get_budget, get_budgets,
    update_budget,
};
pub use delete::delete_budget_endpoint;
pub use domain::{
    Budget, BudgetMonth, BudgetStatus, DEFAULT_ALERT_THRESHOLD, validate_alert_threshold,
    validate_limit,
};
pub use edit::update_budget_endpoint;
pub use list::{get_budget_endpoint, list_budgets_endpoint};
