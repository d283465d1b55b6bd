//! HTTP handlers for the analytics endpoints.

use std::{
    ops::RangeInclusive,
    sync::{Arc, Mutex},
};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    AppState, Error, UserId,
    analytics::{
        aggregation::{
            DistributionSlice, IncomeVsExpense, income_vs_expense, monthly_trends,
            spending_distribution, total_by_category,
        },
        transaction::get_transactions_in_date_range,
    },
    budget::BudgetMonth,
    category::CategoryKind,
    db::lock_connection,
    extract::Query,
    response::{ApiResponse, json_response},
    timezone::{local_today, parse_date},
};

/// The state needed by the analytics handlers.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The shared database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The date range for category analytics, e.g. `?startDate=2025-01-01&endDate=2025-01-31`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    fn parse(&self) -> Result<RangeInclusive<Date>, Error> {
        let (Some(start_date), Some(end_date)) = (
            self.start_date.as_deref().filter(|date| !date.is_empty()),
            self.end_date.as_deref().filter(|date| !date.is_empty()),
        ) else {
            return Err(Error::MissingFields("Start date and End date are required"));
        };

        let start_date = parse_date(start_date)?;
        let end_date = parse_date(end_date)?;

        if start_date > end_date {
            return Err(Error::InvalidDateRange(start_date, end_date));
        }

        Ok(start_date..=end_date)
    }
}

/// The year for monthly trends, e.g. `?year=2025`.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<String>,
}

/// The data for the dashboard's pie and bar charts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsData {
    pub spending_distribution: Vec<DistributionSlice>,
    pub income_vs_expense: Vec<IncomeVsExpense>,
}

/// Handler for expense totals by category over a date range.
pub async fn get_spending_analytics(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Response, Error> {
    category_totals_response(state, user_id, &query, CategoryKind::Expense)
}

/// Handler for income totals by category over a date range.
pub async fn get_income_analytics(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Response, Error> {
    category_totals_response(state, user_id, &query, CategoryKind::Income)
}

fn category_totals_response(
    state: AnalyticsState,
    user_id: UserId,
    query: &DateRangeQuery,
    kind: CategoryKind,
) -> Result<Response, Error> {
    let date_range = query.parse()?;

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions_in_date_range(user_id, date_range, &connection)?;
    let totals = total_by_category(&transactions, kind);

    let message = match kind {
        CategoryKind::Expense => "Spending analytics retrieved",
        CategoryKind::Income => "Income analytics retrieved",
    };

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::with_message(message, totals),
    ))
}

/// Handler for income and expense totals per month of a year.
///
/// The year defaults to the current year in the server's timezone.
pub async fn get_monthly_trends(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<YearQuery>,
) -> Result<Response, Error> {
    let year = match query.year.as_deref().filter(|year| !year.is_empty()) {
        Some(raw_year) => parse_year(raw_year)?,
        None => local_today(&state.local_timezone)?.year(),
    };

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions_in_date_range(user_id, year_range(year)?, &connection)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::with_message("Monthly trends retrieved", monthly_trends(&transactions)),
    ))
}

/// Handler for the spending distribution of the current month and the income
/// versus expense totals of the current year.
pub async fn get_charts_data(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let (month_start, month_end) = BudgetMonth::from_date(today).date_range();

    let connection = lock_connection(&state.db_connection)?;

    let this_month = get_transactions_in_date_range(user_id, month_start..=month_end, &connection)?;
    let spending = total_by_category(&this_month, CategoryKind::Expense);

    let this_year =
        get_transactions_in_date_range(user_id, year_range(today.year())?, &connection)?;
    let trends = monthly_trends(&this_year);

    let data = ChartsData {
        spending_distribution: spending_distribution(&spending),
        income_vs_expense: income_vs_expense(&trends),
    };

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::with_message("Charts data retrieved successfully", data),
    ))
}

fn parse_year(raw_year: &str) -> Result<i32, Error> {
    raw_year
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (1000..=9999).contains(year))
        .ok_or_else(|| Error::InvalidYear(raw_year.to_owned()))
}

fn year_range(year: i32) -> Result<RangeInclusive<Date>, Error> {
    let invalid = |_| Error::InvalidYear(year.to_string());

    let start = Date::from_calendar_date(year, Month::January, 1).map_err(invalid)?;
    let end = Date::from_calendar_date(year, Month::December, 31).map_err(invalid)?;

    Ok(start..=end)
}
