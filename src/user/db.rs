//! Code for creating the user table and fetching users from the database.

use rusqlite::{Connection, Row};

use crate::{
    Error, PasswordHash,
    user::{Currency, Email, User, UserId, UserName},
};

/// The validated data needed to register a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The user's display name.
    pub name: UserName,
    /// The email the user signs in with.
    pub email: Email,
    /// The hash of the user's password.
    pub password_hash: PasswordHash,
}

/// A partial update to a user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// The new display name.
    pub name: Option<UserName>,
    /// The new email address.
    pub email: Option<Email>,
    /// The hash of the new password.
    pub password_hash: Option<PasswordHash>,
    /// The new display currency.
    pub currency: Option<Currency>,
    /// The new theme preference.
    pub dark_mode: Option<bool>,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                currency TEXT NOT NULL DEFAULT 'USD',
                dark_mode INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if the email is already registered,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "INSERT INTO user (name, email, password) VALUES (?1, ?2, ?3)
             RETURNING id, name, email, password, currency, dark_mode",
        )?
        .query_row(
            (
                new_user.name.as_ref(),
                new_user.email.as_ref(),
                new_user.password_hash.as_ref(),
            ),
            map_user_row,
        )
        .map_err(|error| error.into())
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user ([Error::UserNotFound]),
/// - there was an error trying to access the database.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, name, email, password, currency, dark_mode FROM user WHERE id = :id",
        )?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::UserNotFound,
            error => error,
        })
}

/// Get the user registered with `email`.
///
/// # Errors
///
/// This function will return an [Error::UserNotFound] if no user has the email address.
pub fn get_user_by_email(email: &Email, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, name, email, password, currency, dark_mode FROM user WHERE email = :email",
        )?
        .query_row(&[(":email", email.as_ref())], map_user_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::UserNotFound,
            error => error,
        })
}

/// Apply `changes` to the user with `user_id` and return the updated user.
///
/// # Errors
///
/// Returns a:
/// - [Error::UserNotFound] if the user does not exist,
/// - [Error::DuplicateEmail] if the new email belongs to another user,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn update_user(
    user_id: UserId,
    changes: UserChanges,
    connection: &Connection,
) -> Result<User, Error> {
    let user = get_user_by_id(user_id, connection)?;

    let updated = User {
        id: user.id,
        name: changes.name.unwrap_or(user.name),
        email: changes.email.unwrap_or(user.email),
        password_hash: changes.password_hash.unwrap_or(user.password_hash),
        currency: changes.currency.unwrap_or(user.currency),
        dark_mode: changes.dark_mode.unwrap_or(user.dark_mode),
    };

    connection.execute(
        "UPDATE user SET name = ?1, email = ?2, password = ?3, currency = ?4, dark_mode = ?5
         WHERE id = ?6",
        (
            updated.name.as_ref(),
            updated.email.as_ref(),
            updated.password_hash.as_ref(),
            updated.currency,
            updated.dark_mode,
            updated.id.as_i64(),
        ),
    )?;

    Ok(updated)
}

/// Replace the password hash of the user with `user_id`.
///
/// # Errors
///
/// Returns an [Error::UserNotFound] if no row was updated.
pub fn update_password(
    user_id: UserId,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UserNotFound);
    }

    Ok(())
}

/// Delete the user and, through cascading foreign keys, everything they own.
///
/// # Errors
///
/// Returns an [Error::UserNotFound] if the user does not exist.
pub fn delete_user(user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM user WHERE id = ?1", [user_id.as_i64()])?;

    if rows_affected == 0 {
        return Err(Error::UserNotFound);
    }

    Ok(())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
#[cfg(test)]
pub fn count_users(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_name: String = row.get(1)?;
    let raw_email: String = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserId::new(row.get(0)?),
        name: UserName::new_unchecked(&raw_name),
        email: Email::new_unchecked(&raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        currency: row.get(4)?,
        dark_mode: row.get(5)?,
    })
}
