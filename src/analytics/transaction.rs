//! Database queries for retrieving the transaction data that analytics aggregate.
//!
//! This is a simplified transaction view containing only the fields needed
//! for grouping: the category, its name, the kind, the amount and the date.

use std::ops::RangeInclusive;

use rusqlite::{Connection, named_params};
use time::Date;

use crate::{Error, UserId, category::CategoryKind, database_id::CategoryId};

/// A transaction joined with the name of its category.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct AnalyticsTransaction {
    pub category_id: CategoryId,
    pub category: String,
    pub kind: CategoryKind,
    pub amount: f64,
    pub date: Date,
}

/// Gets the user's transactions whose date falls in `date_range`, inclusive on both ends.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query preparation or execution fails.
pub(super) fn get_transactions_in_date_range(
    user_id: UserId,
    date_range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<AnalyticsTransaction>, Error> {
    let mut stmt = connection.prepare(
        "SELECT t.category_id, c.name, t.type, t.amount, t.date
        FROM \"transaction\" t
        INNER JOIN category c ON c.id = t.category_id
        WHERE t.user_id = :user_id AND t.date BETWEEN :start AND :end",
    )?;

    stmt.query_map(
        named_params! {
            ":user_id": user_id.as_i64(),
            ":start": date_range.start(),
            ":end": date_range.end(),
        },
        |row| {
            Ok(AnalyticsTransaction {
                category_id: row.get(0)?,
                category: row.get(1)?,
                kind: row.get(2)?,
                amount: row.get(3)?,
                date: row.get(4)?,
            })
        },
    )?
    .collect::<Result<Vec<AnalyticsTransaction>, rusqlite::Error>>()
    .map_err(|error| error.into())
}
