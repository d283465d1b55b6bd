//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, named_params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, UserId,
    category::{CategoryKind, get_category},
    database_id::{CategoryId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserId,
    /// The ID of the category the transaction is filed under.
    pub category_id: CategoryId,
    /// Whether money was earned or spent. Always equal to the category's kind.
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
}

/// The data needed to record a new transaction.
///
/// Use [validate_amount] and [check_category] before creating a transaction
/// from client input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user recording the transaction.
    pub user_id: UserId,
    /// The category to file the transaction under.
    pub category_id: CategoryId,
    /// Whether money was earned or spent.
    pub kind: CategoryKind,
    /// The positive amount of money.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// What the transaction was for, may be empty.
    pub description: String,
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Check that `amount` is a finite number greater than zero.
///
/// # Errors
///
/// Returns an [Error::InvalidAmount] otherwise.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

/// Check that `user_id` can see the category and that it has the kind `kind`.
///
/// # Errors
///
/// Returns an [Error::InvalidCategory] if the category is not visible to the
/// user, or an [Error::CategoryTypeMismatch] if the kinds differ.
pub fn check_category(
    category_id: CategoryId,
    kind: CategoryKind,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let category = get_category(category_id, user_id, connection).map_err(|error| match error {
        Error::CategoryNotFound => Error::InvalidCategory,
        error => error,
    })?;

    if category.kind != kind {
        return Err(Error::CategoryTypeMismatch);
    }

    Ok(())
}

// ============================================================================
// DATABASE QUERIES
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if `category_id` does not refer to a real category,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, category_id, type, amount, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, category_id, type, amount, date, description",
        )?
        .query_row(
            (
                transaction.user_id.as_i64(),
                transaction.category_id,
                transaction.kind,
                transaction.amount,
                transaction.date,
                &transaction.description,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidCategory
            }
            error => error.into(),
        })
}

/// Retrieve a transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a transaction owned by the user,
/// - [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, type, amount, date, description
             FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            named_params! {":id": id, ":user_id": user_id.as_i64()},
            map_transaction_row,
        )
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::TransactionNotFound,
            error => error,
        })
}

/// Retrieve the transactions owned by `user_id`, newest first.
///
/// Transactions on the same date are ordered by ID, newest first.
/// If `kind` is given, only transactions of that kind are returned.
pub fn get_transactions(
    user_id: UserId,
    kind: Option<CategoryKind>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, type, amount, date, description
             FROM \"transaction\"
             WHERE user_id = :user_id AND (:kind IS NULL OR type = :kind)
             ORDER BY date DESC, id DESC",
        )?
        .query_map(
            named_params! {":user_id": user_id.as_i64(), ":kind": kind},
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the stored fields of `transaction`.
///
/// # Errors
/// Returns an [Error::TransactionNotFound] if no transaction with the ID is owned by `transaction.user_id`.
pub fn update_transaction(transaction: &Transaction, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET category_id = ?1, type = ?2, amount = ?3, date = ?4, description = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            transaction.category_id,
            transaction.kind,
            transaction.amount,
            transaction.date,
            &transaction.description,
            transaction.id,
            transaction.user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}

/// Delete a transaction owned by `user_id`.
///
/// # Errors
/// Returns an [Error::TransactionNotFound] if no transaction with the ID is owned by the user.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES category(id),
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount > 0),
                date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
                );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        category_id: row.get(2)?,
        kind: row.get(3)?,
        amount: row.get(4)?,
        date: row.get(5)?,
        description: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, UserId,
        category::{Category, CategoryKind, create_default_categories},
        test_utils::{create_test_user, get_test_connection},
        transaction::{
            NewTransaction, Transaction, create_transaction, delete_transaction, get_transaction,
            get_transactions, update_transaction,
        },
    };

    fn setup() -> (Connection, UserId, Category, Category) {
        let connection = get_test_connection();
        let user = create_test_user("jane@example.com", &connection);
        let categories = create_default_categories(user.id, &connection).unwrap();
        let expense = categories
            .iter()
            .find(|category| category.kind == CategoryKind::Expense)
            .unwrap()
            .clone();
        let income = categories
            .iter()
            .find(|category| category.kind == CategoryKind::Income)
            .unwrap()
            .clone();

        (connection, user.id, expense, income)
    }

    fn new_transaction(
        user_id: UserId,
        category: &Category,
        amount: f64,
        date: time::Date,
    ) -> NewTransaction {
        NewTransaction {
            user_id,
            category_id: category.id,
            kind: category.kind,
            amount,
            date,
            description: String::new(),
        }
    }

    #[test]
    fn create_succeeds() {
        let (connection, user_id, expense, _) = setup();

        let transaction = create_transaction(
            new_transaction(user_id, &expense, 12.3, date!(2025 - 10 - 05)),
            &connection,
        )
        .expect("Could not create transaction");

        assert!(transaction.id > 0);
        assert_eq!(transaction.user_id, user_id);
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.date, date!(2025 - 10 - 05));
        assert_eq!(transaction.kind, CategoryKind::Expense);
    }

    #[test]
    fn create_fails_on_missing_category() {
        let (connection, user_id, expense, _) = setup();
        let mut transaction = new_transaction(user_id, &expense, 1.0, date!(2025 - 10 - 05));
        transaction.category_id = 9999;

        assert_eq!(
            create_transaction(transaction, &connection),
            Err(Error::InvalidCategory)
        );
    }

    #[test]
    fn get_transaction_hides_other_users_transactions() {
        let (connection, user_id, expense, _) = setup();
        let other = create_test_user("john@example.com", &connection);
        let transaction = create_transaction(
            new_transaction(user_id, &expense, 1.0, date!(2025 - 10 - 05)),
            &connection,
        )
        .unwrap();

        assert_eq!(
            get_transaction(transaction.id, user_id, &connection),
            Ok(transaction.clone())
        );
        assert_eq!(
            get_transaction(transaction.id, other.id, &connection),
            Err(Error::TransactionNotFound)
        );
    }

    #[test]
    fn get_transactions_sorts_newest_first_and_filters_kind() {
        let (connection, user_id, expense, income) = setup();
        let older = create_transaction(
            new_transaction(user_id, &expense, 1.0, date!(2025 - 10 - 01)),
            &connection,
        )
        .unwrap();
        let same_day_first = create_transaction(
            new_transaction(user_id, &expense, 2.0, date!(2025 - 10 - 05)),
            &connection,
        )
        .unwrap();
        let same_day_second = create_transaction(
            new_transaction(user_id, &income, 3.0, date!(2025 - 10 - 05)),
            &connection,
        )
        .unwrap();

        let all: Vec<Transaction> = get_transactions(user_id, None, &connection).unwrap();
        let expenses = get_transactions(user_id, Some(CategoryKind::Expense), &connection).unwrap();

        assert_eq!(all, vec![same_day_second, same_day_first.clone(), older.clone()]);
        assert_eq!(expenses, vec![same_day_first, older]);
    }

    #[test]
    fn update_and_delete_transaction() {
        let (connection, user_id, expense, _) = setup();
        let transaction = create_transaction(
            new_transaction(user_id, &expense, 1.0, date!(2025 - 10 - 05)),
            &connection,
        )
        .unwrap();
        let updated = Transaction {
            amount: 99.0,
            description: "Groceries".to_owned(),
            ..transaction.clone()
        };

        update_transaction(&updated, &connection).unwrap();
        assert_eq!(get_transaction(transaction.id, user_id, &connection), Ok(updated));

        delete_transaction(transaction.id, user_id, &connection).unwrap();
        assert_eq!(
            delete_transaction(transaction.id, user_id, &connection),
            Err(Error::TransactionNotFound)
        );
    }

    #[test]
    fn deleting_user_deletes_their_transactions() {
        let (connection, user_id, expense, _) = setup();
        create_transaction(
            new_transaction(user_id, &expense, 1.0, date!(2025 - 10 - 05)),
            &connection,
        )
        .unwrap();

        crate::user::delete_user(user_id, &connection).unwrap();

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
