//! Grouping and summing of transactions for the analytics endpoints.
//!
//! Every function here is pure: the handlers fetch the rows and these
//! functions shape them into the JSON the clients chart.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    analytics::transaction::AnalyticsTransaction, category::CategoryKind, database_id::CategoryId,
};

/// The total amount recorded against one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub category: String,
    pub total_amount: f64,
}

/// The total amount of one kind of transaction in one month of a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// The month number, 1 for January through 12 for December.
    pub month: u8,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub total_amount: f64,
}

/// A slice of the spending pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub category: String,
    pub amount: f64,
    /// The share of total spending, rounded to 2 decimal places.
    pub percentage: f64,
}

/// Income and expense totals for one month of the income versus expense bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeVsExpense {
    pub month: u8,
    pub income: f64,
    pub expense: f64,
}

/// Sums the transactions of `kind` by category.
///
/// The totals are sorted from largest to smallest, with ties broken by
/// category name.
pub(super) fn total_by_category(
    transactions: &[AnalyticsTransaction],
    kind: CategoryKind,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<CategoryId, CategoryTotal> = HashMap::new();

    for transaction in transactions.iter().filter(|t| t.kind == kind) {
        totals
            .entry(transaction.category_id)
            .or_insert_with(|| CategoryTotal {
                category_id: transaction.category_id,
                category: transaction.category.clone(),
                total_amount: 0.0,
            })
            .total_amount += transaction.amount;
    }

    let mut totals: Vec<CategoryTotal> = totals.into_values().collect();
    totals.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// Sums transactions by month and kind.
///
/// Only (month, kind) pairs that have at least one transaction are returned,
/// sorted by month and then kind.
pub(super) fn monthly_trends(transactions: &[AnalyticsTransaction]) -> Vec<MonthlyTrend> {
    let mut totals: BTreeMap<(u8, CategoryKind), f64> = BTreeMap::new();

    for transaction in transactions {
        let month = u8::from(transaction.date.month());
        *totals.entry((month, transaction.kind)).or_insert(0.0) += transaction.amount;
    }

    totals
        .into_iter()
        .map(|((month, kind), total_amount)| MonthlyTrend {
            month,
            kind,
            total_amount,
        })
        .collect()
}

/// Converts category totals into percentages of their sum.
///
/// Returns an empty list if nothing was spent, rather than dividing by zero.
pub(super) fn spending_distribution(totals: &[CategoryTotal]) -> Vec<DistributionSlice> {
    let total_spending: f64 = totals.iter().map(|total| total.total_amount).sum();

    if total_spending <= 0.0 {
        return Vec::new();
    }

    totals
        .iter()
        .map(|total| DistributionSlice {
            category: total.category.clone(),
            amount: total.total_amount,
            percentage: round_to_cents(total.total_amount / total_spending * 100.0),
        })
        .collect()
}

/// Spreads monthly trends over all twelve months, filling empty months with zero.
pub(super) fn income_vs_expense(trends: &[MonthlyTrend]) -> Vec<IncomeVsExpense> {
    let mut months: Vec<IncomeVsExpense> = (1..=12)
        .map(|month| IncomeVsExpense {
            month,
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for trend in trends {
        let Some(entry) = months.get_mut(usize::from(trend.month) - 1) else {
            continue;
        };

        match trend.kind {
            CategoryKind::Income => entry.income += trend.total_amount,
            CategoryKind::Expense => entry.expense += trend.total_amount,
        }
    }

    months
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
