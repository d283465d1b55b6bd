//! Aggregated views of a user's transactions: totals by category, monthly
//! trends and the data for the dashboard charts.

mod aggregation;
mod handlers;
mod transaction;

pub use handlers::{
    get_charts_data, get_income_analytics, get_monthly_trends, get_spending_analytics,
};
