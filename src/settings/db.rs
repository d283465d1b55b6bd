//! Database operations for user settings.

use rusqlite::{Connection, Row};

use crate::{
    Error, UserId,
    settings::{Notifications, Settings, SettingsChanges},
};

/// Initialize the settings table. Each user has exactly one row.
pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            user_id INTEGER PRIMARY KEY REFERENCES user(id) ON DELETE CASCADE,
            budget_alerts INTEGER NOT NULL DEFAULT 1,
            weekly_reports INTEGER NOT NULL DEFAULT 0,
            monthly_reports INTEGER NOT NULL DEFAULT 1,
            date_format TEXT NOT NULL DEFAULT 'MM/DD/YYYY',
            language TEXT NOT NULL DEFAULT 'en'
        )",
        (),
    )?;

    Ok(())
}

/// Create the default settings row for a new user.
///
/// The caller should run this inside the same SQL transaction that creates the user.
pub fn create_default_settings(user_id: UserId, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO settings (user_id) VALUES (?1)",
        [user_id.as_i64()],
    )?;

    Ok(())
}

/// Retrieve the settings of `user_id`.
///
/// # Errors
///
/// Returns an [Error::SettingsNotFound] if the user has no settings row.
pub fn get_settings(user_id: UserId, connection: &Connection) -> Result<Settings, Error> {
    connection
        .prepare(
            "SELECT s.user_id, u.currency, u.dark_mode, s.budget_alerts, s.weekly_reports,
                    s.monthly_reports, s.date_format, s.language
             FROM settings s INNER JOIN user u ON u.id = s.user_id
             WHERE s.user_id = ?1",
        )?
        .query_row([user_id.as_i64()], map_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::SettingsNotFound,
            error => error,
        })
}

/// Apply `changes` to the settings of `user_id` and return the updated settings.
///
/// The currency and theme are written to the user row and the rest to the
/// settings row, both in one SQL transaction.
///
/// # Errors
///
/// Returns an [Error::SettingsNotFound] if the user has no settings row.
pub fn update_settings(
    user_id: UserId,
    changes: SettingsChanges,
    connection: &Connection,
) -> Result<Settings, Error> {
    let transaction = connection.unchecked_transaction()?;

    let current = get_settings(user_id, &transaction)?;
    let updated = Settings {
        user_id,
        currency: changes.currency.unwrap_or(current.currency),
        dark_mode: changes.dark_mode.unwrap_or(current.dark_mode),
        notifications: match changes.notifications {
            Some(notification_changes) => current.notifications.merge(notification_changes),
            None => current.notifications,
        },
        date_format: changes.date_format.unwrap_or(current.date_format),
        language: changes.language.unwrap_or(current.language),
    };

    transaction.execute(
        "UPDATE user SET currency = ?1, dark_mode = ?2 WHERE id = ?3",
        (updated.currency, updated.dark_mode, user_id.as_i64()),
    )?;
    transaction.execute(
        "UPDATE settings
         SET budget_alerts = ?1, weekly_reports = ?2, monthly_reports = ?3,
             date_format = ?4, language = ?5
         WHERE user_id = ?6",
        (
            updated.notifications.budget_alerts,
            updated.notifications.weekly_reports,
            updated.notifications.monthly_reports,
            updated.date_format,
            updated.language,
            user_id.as_i64(),
        ),
    )?;

    transaction.commit()?;

    Ok(updated)
}

fn map_row(row: &Row) -> Result<Settings, rusqlite::Error> {
    Ok(Settings {
        user_id: UserId::new(row.get(0)?),
        currency: row.get(1)?,
        dark_mode: row.get(2)?,
        notifications: Notifications {
            budget_alerts: row.get(3)?,
            weekly_reports: row.get(4)?,
            monthly_reports: row.get(5)?,
        },
        date_format: row.get(6)?,
        language: row.get(7)?,
    })
}

#[cfg(test)]
mod settings_query_tests {
    use crate::{
        Error,
        settings::{
            Notifications, SettingsChanges, create_default_settings,
            domain::{DateFormat, Language, NotificationChanges},
            get_settings, update_settings,
        },
        test_utils::{create_test_user, get_test_connection},
        user::{Currency, get_user_by_id},
    };

    #[test]
    fn default_settings() {
        let connection = get_test_connection();
        let user = create_test_user("jane@example.com", &connection);
        create_default_settings(user.id, &connection).unwrap();

        let settings = get_settings(user.id, &connection).unwrap();

        assert_eq!(settings.currency, Currency::Usd);
        assert!(!settings.dark_mode);
        assert_eq!(settings.notifications, Notifications::default());
        assert_eq!(settings.date_format, DateFormat::MonthDayYear);
        assert_eq!(settings.language, Language::En);
    }

    #[test]
    fn missing_settings_is_not_found() {
        let connection = get_test_connection();
        let user = create_test_user("jane@example.com", &connection);

        assert_eq!(
            get_settings(user.id, &connection),
            Err(Error::SettingsNotFound)
        );
    }

    #[test]
    fn update_settings_writes_currency_to_user() {
        let connection = get_test_connection();
        let user = create_test_user("jane@example.com", &connection);
        create_default_settings(user.id, &connection).unwrap();

        let updated = update_settings(
            user.id,
            SettingsChanges {
                currency: Some(Currency::Gbp),
                notifications: Some(NotificationChanges {
                    budget_alerts: Some(false),
                    ..Default::default()
                }),
                language: Some(Language::De),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        assert_eq!(get_settings(user.id, &connection), Ok(updated.clone()));
        assert_eq!(updated.currency, Currency::Gbp);
        assert!(!updated.notifications.budget_alerts);
        assert!(updated.notifications.monthly_reports);
        assert_eq!(updated.date_format, DateFormat::MonthDayYear);
        assert_eq!(
            get_user_by_id(user.id, &connection).unwrap().currency,
            Currency::Gbp
        );
    }
}
