//! Database operations for budgets.

use rusqlite::{Connection, Row, named_params};

use crate::{
    Error, UserId,
    budget::{Budget, BudgetMonth},
    database_id::{BudgetId, CategoryId},
};

/// The data needed to create a budget.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub month: BudgetMonth,
    pub limit: f64,
    pub alert_threshold: i64,
}

/// Selects budgets along with the sum of the owner's expense transactions in
/// the budget's category and month.
const SELECT_BUDGET: &str = "SELECT b.id, b.user_id, b.category_id, b.month, b.amount_limit,
        b.alert_threshold, b.is_active,
        COALESCE((
            SELECT SUM(t.amount) FROM \"transaction\" t
            WHERE t.user_id = b.user_id
              AND t.category_id = b.category_id
              AND t.type = 'expense'
              AND substr(t.date, 1, 7) = b.month
        ), 0.0)
    FROM budget b";

/// Initialize the budget table and indexes.
///
/// A user can have at most one budget per category and month.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE CASCADE,
            month TEXT NOT NULL,
            amount_limit REAL NOT NULL CHECK (amount_limit > 0),
            alert_threshold INTEGER NOT NULL DEFAULT 80,
            is_active INTEGER NOT NULL DEFAULT 1,
            UNIQUE(user_id, category_id, month)
        );

        CREATE INDEX IF NOT EXISTS idx_budget_user_month ON budget(user_id, month);",
    )?;

    Ok(())
}

/// Create a budget and return it with its generated ID and current spending.
///
/// # Errors
///
/// Returns an [Error::DuplicateBudget] if the user already has a budget for the category and month.
pub fn create_budget(new_budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    connection.execute(
        "INSERT INTO budget (user_id, category_id, month, amount_limit, alert_threshold)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            new_budget.user_id.as_i64(),
            new_budget.category_id,
            new_budget.month,
            new_budget.limit,
            new_budget.alert_threshold,
        ),
    )?;

    get_budget(connection.last_insert_rowid(), new_budget.user_id, connection)
}

/// Retrieve a budget owned by `user_id`.
///
/// # Errors
///
/// Returns an [Error::BudgetNotFound] if no budget with the ID is owned by the user.
pub fn get_budget(
    budget_id: BudgetId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(&format!(
            "{SELECT_BUDGET} WHERE b.id = :id AND b.user_id = :user_id"
        ))?
        .query_row(
            named_params! {":id": budget_id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::BudgetNotFound,
            error => error,
        })
}

/// Retrieve the budgets owned by `user_id`, latest month first and then by category.
///
/// If `month` is given, only budgets for that month are returned.
pub fn get_budgets(
    user_id: UserId,
    month: Option<BudgetMonth>,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_BUDGET}
             WHERE b.user_id = :user_id AND (:month IS NULL OR b.month = :month)
             ORDER BY b.month DESC, b.category_id ASC, b.id ASC"
        ))?
        .query_map(
            named_params! {":user_id": user_id.as_i64(), ":month": month},
            map_row,
        )?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the stored fields of `budget`. `spent` is ignored.
///
/// # Errors
///
/// Returns a:
/// - [Error::BudgetNotFound] if no budget with the ID is owned by `budget.user_id`,
/// - [Error::DuplicateBudget] if the new category and month clash with another budget.
pub fn update_budget(budget: &Budget, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE budget
         SET category_id = ?1, month = ?2, amount_limit = ?3, alert_threshold = ?4, is_active = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            budget.category_id,
            budget.month,
            budget.limit,
            budget.alert_threshold,
            budget.is_active,
            budget.id,
            budget.user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::BudgetNotFound);
    }

    Ok(())
}

/// Delete a budget owned by `user_id`.
///
/// # Errors
///
/// Returns an [Error::BudgetNotFound] if no budget with the ID is owned by the user.
pub fn delete_budget(
    budget_id: BudgetId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (budget_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::BudgetNotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        category_id: row.get(2)?,
        month: row.get(3)?,
        limit: row.get(4)?,
        alert_threshold: row.get(5)?,
        is_active: row.get(6)?,
        spent: row.get(7)?,
    })
}

#[cfg(test)]
mod budget_query_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error, UserId,
        budget::{
            Budget, BudgetMonth, NewBudget, create_budget, delete_budget, get_budget, get_budgets,
            update_budget,
        },
        category::{Category, create_default_categories},
        test_utils::{create_test_user, get_test_connection},
        transaction::{NewTransaction, create_transaction, delete_transaction},
    };

    fn setup() -> (Connection, UserId, Vec<Category>) {
        let connection = get_test_connection();
        let user = create_test_user("jane@example.com", &connection);
        let categories = create_default_categories(user.id, &connection).unwrap();

        (connection, user.id, categories)
    }

    fn new_budget(user_id: UserId, category: &Category, month: &str) -> NewBudget {
        NewBudget {
            user_id,
            category_id: category.id,
            month: month.parse().unwrap(),
            limit: 200.0,
            alert_threshold: 80,
        }
    }

    fn spend(
        user_id: UserId,
        category: &Category,
        amount: f64,
        date: Date,
        connection: &Connection,
    ) -> i64 {
        create_transaction(
            NewTransaction {
                user_id,
                category_id: category.id,
                kind: category.kind,
                amount,
                date,
                description: String::new(),
            },
            connection,
        )
        .unwrap()
        .id
    }

    #[test]
    fn create_budget_succeeds_with_zero_spent() {
        let (connection, user_id, categories) = setup();

        let budget = create_budget(new_budget(user_id, &categories[0], "2025-03"), &connection)
            .expect("Could not create budget");

        assert!(budget.id > 0);
        assert_eq!(budget.month, BudgetMonth::new(2025, 3).unwrap());
        assert_eq!(budget.limit, 200.0);
        assert_eq!(budget.spent, 0.0);
        assert!(budget.is_active);
    }

    #[test]
    fn create_duplicate_budget_fails() {
        let (connection, user_id, categories) = setup();
        create_budget(new_budget(user_id, &categories[0], "2025-03"), &connection).unwrap();

        let result = create_budget(new_budget(user_id, &categories[0], "2025-03"), &connection);

        assert_eq!(result, Err(Error::DuplicateBudget));
    }

    #[test]
    fn spent_only_counts_matching_expenses() {
        let (connection, user_id, categories) = setup();
        let food = &categories[0];
        let transport = &categories[1];
        let salary = &categories[9];
        let other_user = create_test_user("john@example.com", &connection);
        let other_categories = create_default_categories(other_user.id, &connection).unwrap();

        spend(user_id, food, 20.0, date!(2025 - 03 - 01), &connection);
        spend(user_id, food, 30.5, date!(2025 - 03 - 31), &connection);
        spend(user_id, food, 99.0, date!(2025 - 04 - 01), &connection);
        spend(user_id, transport, 7.0, date!(2025 - 03 - 10), &connection);
        spend(user_id, salary, 1000.0, date!(2025 - 03 - 10), &connection);
        spend(other_user.id, &other_categories[0], 5.0, date!(2025 - 03 - 10), &connection);

        let budget = create_budget(new_budget(user_id, food, "2025-03"), &connection).unwrap();

        assert_eq!(budget.spent, 50.5);
    }

    #[test]
    fn spent_follows_transaction_changes() {
        let (connection, user_id, categories) = setup();
        let food = &categories[0];
        let budget = create_budget(new_budget(user_id, food, "2025-03"), &connection).unwrap();
        let transaction_id = spend(user_id, food, 20.0, date!(2025 - 03 - 01), &connection);

        assert_eq!(get_budget(budget.id, user_id, &connection).unwrap().spent, 20.0);

        delete_transaction(transaction_id, user_id, &connection).unwrap();

        assert_eq!(get_budget(budget.id, user_id, &connection).unwrap().spent, 0.0);
    }

    #[test]
    fn get_budgets_sorts_and_filters_by_month() {
        let (connection, user_id, categories) = setup();
        let march_food =
            create_budget(new_budget(user_id, &categories[0], "2025-03"), &connection).unwrap();
        let march_travel =
            create_budget(new_budget(user_id, &categories[7], "2025-03"), &connection).unwrap();
        let april_food =
            create_budget(new_budget(user_id, &categories[0], "2025-04"), &connection).unwrap();

        let all = get_budgets(user_id, None, &connection).unwrap();
        let march = get_budgets(user_id, Some("2025-03".parse().unwrap()), &connection).unwrap();

        assert_eq!(all, vec![april_food, march_food.clone(), march_travel.clone()]);
        assert_eq!(march, vec![march_food, march_travel]);
    }

    #[test]
    fn update_budget_to_clashing_month_fails() {
        let (connection, user_id, categories) = setup();
        create_budget(new_budget(user_id, &categories[0], "2025-03"), &connection).unwrap();
        let april =
            create_budget(new_budget(user_id, &categories[0], "2025-04"), &connection).unwrap();

        let result = update_budget(
            &Budget {
                month: "2025-03".parse().unwrap(),
                ..april
            },
            &connection,
        );

        assert_eq!(result, Err(Error::DuplicateBudget));
    }

    #[test]
    fn delete_budget_only_deletes_own_budget() {
        let (connection, user_id, categories) = setup();
        let other = create_test_user("john@example.com", &connection);
        let budget =
            create_budget(new_budget(user_id, &categories[0], "2025-03"), &connection).unwrap();

        assert_eq!(
            delete_budget(budget.id, other.id, &connection),
            Err(Error::BudgetNotFound)
        );
        assert_eq!(delete_budget(budget.id, user_id, &connection), Ok(()));
        assert_eq!(
            get_budget(budget.id, user_id, &connection),
            Err(Error::BudgetNotFound)
        );
    }
}
