use rusqlite::Connection;

use crate::{
    AppState, PasswordHash, User,
    db::initialize,
    user::{Email, NewUser, UserName, create_user},
};

/// The plain text password of users created with [create_test_user].
pub(crate) const TEST_PASSWORD: &str = "correct-horse-battery";

pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// An [AppState] backed by an in-memory database that hashes passwords with a low cost.
pub(crate) fn get_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    let mut state =
        AppState::new(connection, "a-test-secret", "Etc/UTC").expect("Could not create app state");
    state.password_hash_cost = 4;
    state
}

/// Insert a user with the password [TEST_PASSWORD].
pub(crate) fn create_test_user(email: &str, connection: &Connection) -> User {
    let password_hash =
        PasswordHash::from_raw_password(TEST_PASSWORD, 4).expect("Could not hash password");

    create_user(
        NewUser {
            name: UserName::new_unchecked("Test User"),
            email: Email::new_unchecked(email),
            password_hash,
        },
        connection,
    )
    .expect("Could not create test user")
}
