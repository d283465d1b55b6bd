//! Core budget domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error, UserId,
    database_id::{BudgetId, CategoryId},
};

/// The alert threshold used when the client does not pick one.
pub const DEFAULT_ALERT_THRESHOLD: i64 = 80;

/// A calendar month that a budget applies to, written as `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BudgetMonth {
    year: i32,
    month: Month,
}

impl BudgetMonth {
    /// Create a budget month from a four digit year and a month number from 1 to 12.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidBudgetMonth] if the year or month is out of range.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        let invalid = || Error::InvalidBudgetMonth(format!("{year:04}-{month:02}"));

        if !(1000..=9999).contains(&year) {
            return Err(invalid());
        }

        let month = Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self { year, month })
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The first and last day of the month.
    pub fn date_range(&self) -> (Date, Date) {
        let last_day = self.month.length(self.year);

        // Both days exist because the year and month were validated on creation.
        let first = Date::from_calendar_date(self.year, self.month, 1).unwrap_or(Date::MIN);
        let last = Date::from_calendar_date(self.year, self.month, last_day).unwrap_or(Date::MAX);

        (first, last)
    }

    /// The month's year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of the year.
    pub fn month(&self) -> Month {
        self.month
    }
}

impl Display for BudgetMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

impl FromStr for BudgetMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidBudgetMonth(s.to_owned());

        let (raw_year, raw_month) = s.trim().split_once('-').ok_or_else(invalid)?;

        if raw_year.len() != 4
            || raw_month.len() != 2
            || !raw_year.chars().chain(raw_month.chars()).all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year = raw_year.parse().map_err(|_| invalid())?;
        let month = raw_month.parse().map_err(|_| invalid())?;

        BudgetMonth::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for BudgetMonth {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BudgetMonth> for String {
    fn from(value: BudgetMonth) -> Self {
        value.to_string()
    }
}

impl ToSql for BudgetMonth {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.to_string().into())
    }
}

impl FromSql for BudgetMonth {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(error.to_string().into()))
    }
}

/// Check that a budget limit is a finite number greater than zero.
///
/// # Errors
///
/// Returns an [Error::InvalidBudgetLimit] otherwise.
pub fn validate_limit(limit: f64) -> Result<f64, Error> {
    if limit.is_finite() && limit > 0.0 {
        Ok(limit)
    } else {
        Err(Error::InvalidBudgetLimit(limit))
    }
}

/// Check that an alert threshold is a percentage from 0 to 100.
///
/// # Errors
///
/// Returns an [Error::InvalidAlertThreshold] otherwise.
pub fn validate_alert_threshold(alert_threshold: i64) -> Result<i64, Error> {
    if (0..=100).contains(&alert_threshold) {
        Ok(alert_threshold)
    } else {
        Err(Error::InvalidAlertThreshold(alert_threshold))
    }
}

/// A spending limit for one expense category in one month.
///
/// `spent` is never stored, it is summed from the user's expense transactions
/// in the category and month whenever the budget is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub month: BudgetMonth,
    pub limit: f64,
    /// The percentage of the limit at which the client should warn the user.
    pub alert_threshold: i64,
    pub is_active: bool,
    pub spent: f64,
}

impl Budget {
    /// How much can still be spent before the limit is reached. Negative when over budget.
    pub fn remaining(&self) -> f64 {
        self.limit - self.spent
    }

    /// The share of the limit that has been spent as a percentage rounded to two decimal places.
    pub fn percent_used(&self) -> f64 {
        if self.limit <= 0.0 {
            return 0.0;
        }

        (self.spent / self.limit * 10_000.0).round() / 100.0
    }

    /// Whether spending has reached the alert threshold.
    pub fn alert_triggered(&self) -> bool {
        self.percent_used() >= self.alert_threshold as f64
    }
}

/// A budget together with the figures derived from its spending, as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    #[serde(flatten)]
    pub budget: Budget,
    pub remaining: f64,
    pub percent_used: f64,
    pub alert_triggered: bool,
}

impl From<Budget> for BudgetStatus {
    fn from(budget: Budget) -> Self {
        Self {
            remaining: budget.remaining(),
            percent_used: budget.percent_used(),
            alert_triggered: budget.alert_triggered(),
            budget,
        }
    }
}
