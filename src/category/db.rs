//! Database operations for categories.

use rusqlite::{Connection, Row, named_params};

use crate::{
    Error, UserId,
    category::{Category, CategoryKind, CategoryName, Color},
    database_id::CategoryId,
};

/// The data needed to create a category owned by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub user_id: UserId,
    pub name: CategoryName,
    pub kind: CategoryKind,
    pub icon: String,
    pub color: Color,
    pub is_default: bool,
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER REFERENCES user(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            icon TEXT NOT NULL DEFAULT '💰',
            color TEXT NOT NULL DEFAULT '#FF6B6B',
            is_default INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )?;

    Ok(())
}

/// Create a category and return it with its generated ID.
pub fn create_category(
    new_category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (user_id, name, type, icon, color, is_default)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, name, type, icon, color, is_default",
        )?
        .query_row(
            (
                new_category.user_id.as_i64(),
                new_category.name.as_ref(),
                new_category.kind,
                &new_category.icon,
                new_category.color.as_ref(),
                new_category.is_default,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single category that `user_id` can see, i.e. one they own or a global one.
///
/// # Errors
///
/// Returns an [Error::CategoryNotFound] if the category does not exist or belongs to another user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type, icon, color, is_default FROM category
             WHERE id = :id AND (user_id = :user_id OR user_id IS NULL)",
        )?
        .query_row(
            named_params! {":id": category_id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::CategoryNotFound,
            error => error,
        })
}

/// Retrieve the categories `user_id` can see ordered alphabetically by name.
///
/// If `kind` is given, only categories of that kind are returned.
pub fn get_categories(
    user_id: UserId,
    kind: Option<CategoryKind>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type, icon, color, is_default FROM category
             WHERE (user_id = :user_id OR user_id IS NULL)
               AND (:kind IS NULL OR type = :kind)
             ORDER BY name ASC, id ASC",
        )?
        .query_map(
            named_params! {":user_id": user_id.as_i64(), ":kind": kind},
            map_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the stored fields of `category`.
///
/// Only categories owned by `category.user_id` can be updated, global categories are read only.
///
/// # Errors
///
/// Returns an [Error::CategoryNotFound] if no owned category with the ID exists.
pub fn update_category(category: &Category, connection: &Connection) -> Result<(), Error> {
    let Some(user_id) = category.user_id else {
        return Err(Error::CategoryNotFound);
    };

    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, type = ?2, icon = ?3, color = ?4
         WHERE id = ?5 AND user_id = ?6",
        (
            category.name.as_ref(),
            category.kind,
            &category.icon,
            category.color.as_ref(),
            category.id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    Ok(())
}

/// Delete a category owned by `user_id`. Budgets for the category are deleted with it.
///
/// # Errors
///
/// Returns an [Error::CategoryNotFound] if no owned category with the ID exists.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    Ok(())
}

/// Count the transactions filed under a category.
pub fn count_category_transactions(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE category_id = ?1",
            [category_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Count the budgets set for a category.
pub fn count_category_budgets(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM budget WHERE category_id = ?1",
            [category_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_user_id: Option<i64> = row.get(1)?;
    let raw_name: String = row.get(2)?;
    let raw_color: String = row.get(5)?;

    Ok(Category {
        id: row.get(0)?,
        user_id: raw_user_id.map(UserId::new),
        name: CategoryName::new_unchecked(&raw_name),
        kind: row.get(3)?,
        icon: row.get(4)?,
        color: Color::new_unchecked(&raw_color),
        is_default: row.get(6)?,
    })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error, UserId,
        category::{
            Category, CategoryKind, CategoryName, Color, NewCategory, create_category,
            delete_category, get_categories, get_category, update_category,
        },
        test_utils::{create_test_user, get_test_connection},
    };

    fn new_category(user_id: UserId, name: &str, kind: CategoryKind) -> NewCategory {
        NewCategory {
            user_id,
            name: CategoryName::new_unchecked(name),
            kind,
            icon: "🍔".to_owned(),
            color: Color::new_unchecked("#FF6B6B"),
            is_default: false,
        }
    }

    fn insert_global_category(name: &str, connection: &Connection) -> i64 {
        connection
            .execute(
                "INSERT INTO category (user_id, name, type) VALUES (NULL, ?1, 'expense')",
                [name],
            )
            .unwrap();
        connection.last_insert_rowid()
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user("jane@example.com", &connection);

        let category = create_category(
            new_category(user.id, "Groceries", CategoryKind::Expense),
            &connection,
        )
        .expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.user_id, Some(user.id));
        assert_eq!(category.name.as_ref(), "Groceries");
        assert_eq!(category.kind, CategoryKind::Expense);
        assert!(!category.is_default);
    }

    #[test]
    fn get_category_hides_other_users_categories() {
        let connection = get_test_connection();
        let jane = create_test_user("jane@example.com", &connection);
        let john = create_test_user("john@example.com", &connection);
        let category = create_category(
            new_category(jane.id, "Groceries", CategoryKind::Expense),
            &connection,
        )
        .unwrap();

        assert_eq!(get_category(category.id, jane.id, &connection), Ok(category.clone()));
        assert_eq!(
            get_category(category.id, john.id, &connection),
            Err(Error::CategoryNotFound)
        );
    }

    #[test]
    fn get_categories_includes_global_categories_sorted_by_name() {
        let connection = get_test_connection();
        let user = create_test_user("jane@example.com", &connection);
        create_category(new_category(user.id, "Zoo", CategoryKind::Expense), &connection).unwrap();
        create_category(new_category(user.id, "Salary", CategoryKind::Income), &connection)
            .unwrap();
        insert_global_category("Apples", &connection);

        let names: Vec<String> = get_categories(user.id, None, &connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();

        assert_eq!(names, ["Apples", "Salary", "Zoo"]);
    }

    #[test]
    fn get_categories_filters_by_kind() {
        let connection = get_test_connection();
        let user = create_test_user("jane@example.com", &connection);
        create_category(new_category(user.id, "Food", CategoryKind::Expense), &connection)
            .unwrap();
        let salary =
            create_category(new_category(user.id, "Salary", CategoryKind::Income), &connection)
                .unwrap();

        let got = get_categories(user.id, Some(CategoryKind::Income), &connection).unwrap();

        assert_eq!(got, vec![salary]);
    }

    #[test]
    fn update_category_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user("jane@example.com", &connection);
        let category =
            create_category(new_category(user.id, "Food", CategoryKind::Expense), &connection)
                .unwrap();
        let updated = Category {
            name: CategoryName::new_unchecked("Dining"),
            color: Color::new_unchecked("#000"),
            ..category.clone()
        };

        update_category(&updated, &connection).unwrap();

        assert_eq!(get_category(category.id, user.id, &connection), Ok(updated));
    }

    #[test]
    fn update_global_category_fails() {
        let connection = get_test_connection();
        let user = create_test_user("jane@example.com", &connection);
        let global_id = insert_global_category("Apples", &connection);
        let global = get_category(global_id, user.id, &connection).unwrap();

        let result = update_category(
            &Category {
                name: CategoryName::new_unchecked("Pears"),
                ..global
            },
            &connection,
        );

        assert_eq!(result, Err(Error::CategoryNotFound));
    }

    #[test]
    fn delete_category_only_deletes_own_category() {
        let connection = get_test_connection();
        let jane = create_test_user("jane@example.com", &connection);
        let john = create_test_user("john@example.com", &connection);
        let category =
            create_category(new_category(jane.id, "Food", CategoryKind::Expense), &connection)
                .unwrap();

        assert_eq!(
            delete_category(category.id, john.id, &connection),
            Err(Error::CategoryNotFound)
        );
        assert_eq!(delete_category(category.id, jane.id, &connection), Ok(()));
        assert_eq!(
            get_category(category.id, jane.id, &connection),
            Err(Error::CategoryNotFound)
        );
    }
}
