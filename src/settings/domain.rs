//! Core settings domain types.

use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::{UserId, user::Currency};

/// How the client should display dates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    /// e.g. 03/14/2025
    #[default]
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    /// e.g. 14/03/2025
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    /// e.g. 2025-03-14
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
}

impl DateFormat {
    /// The pattern shown to users, e.g. "MM/DD/YYYY".
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::MonthDayYear => "MM/DD/YYYY",
            DateFormat::DayMonthYear => "DD/MM/YYYY",
            DateFormat::Iso => "YYYY-MM-DD",
        }
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MM/DD/YYYY" => Ok(DateFormat::MonthDayYear),
            "DD/MM/YYYY" => Ok(DateFormat::DayMonthYear),
            "YYYY-MM-DD" => Ok(DateFormat::Iso),
            other => Err(format!("unsupported date format \"{other}\"")),
        }
    }
}

/// The language of the client's interface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    Pt,
}

impl Language {
    /// The two letter ISO 639-1 code, e.g. "en".
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Pt => "pt",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "fr" => Ok(Language::Fr),
            "de" => Ok(Language::De),
            "pt" => Ok(Language::Pt),
            other => Err(format!("unsupported language \"{other}\"")),
        }
    }
}

macro_rules! impl_sql_text {
    ($type:ty) => {
        impl ToSql for $type {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(self.as_str().into())
            }
        }

        impl FromSql for $type {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|error: String| FromSqlError::Other(error.into()))
            }
        }
    };
}

impl_sql_text!(DateFormat);
impl_sql_text!(Language);

/// Which notifications the user wants to receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notifications {
    /// Warn when spending reaches a budget's alert threshold.
    pub budget_alerts: bool,
    /// A summary of the past week.
    pub weekly_reports: bool,
    /// A summary of the past month.
    pub monthly_reports: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            budget_alerts: true,
            weekly_reports: false,
            monthly_reports: true,
        }
    }
}

/// A partial update to [Notifications]. `None` fields are left unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChanges {
    pub budget_alerts: Option<bool>,
    pub weekly_reports: Option<bool>,
    pub monthly_reports: Option<bool>,
}

impl Notifications {
    /// Apply `changes` on top of these notification preferences.
    pub fn merge(self, changes: NotificationChanges) -> Self {
        Self {
            budget_alerts: changes.budget_alerts.unwrap_or(self.budget_alerts),
            weekly_reports: changes.weekly_reports.unwrap_or(self.weekly_reports),
            monthly_reports: changes.monthly_reports.unwrap_or(self.monthly_reports),
        }
    }
}

/// A user's preferences.
///
/// `currency` and `dark_mode` are stored on the user and are the same values
/// shown on the user's profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub user_id: UserId,
    pub currency: Currency,
    pub dark_mode: bool,
    pub notifications: Notifications,
    pub date_format: DateFormat,
    pub language: Language,
}

/// A partial update to [Settings]. `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChanges {
    pub currency: Option<Currency>,
    pub dark_mode: Option<bool>,
    pub notifications: Option<NotificationChanges>,
    pub date_format: Option<DateFormat>,
    pub language: Option<Language>,
}

#[cfg(test)]
mod tests {
    use super::{DateFormat, Language, NotificationChanges, Notifications};

    #[test]
    fn date_format_uses_pattern_in_json() {
        assert_eq!(
            serde_json::to_string(&DateFormat::DayMonthYear).unwrap(),
            "\"DD/MM/YYYY\""
        );
        assert_eq!(
            serde_json::from_str::<DateFormat>("\"YYYY-MM-DD\"").unwrap(),
            DateFormat::Iso
        );
        assert!(serde_json::from_str::<DateFormat>("\"YY/MM/DD\"").is_err());
    }

    #[test]
    fn language_rejects_unsupported_code() {
        assert_eq!("fr".parse(), Ok(Language::Fr));
        assert!(serde_json::from_str::<Language>("\"it\"").is_err());
    }

    #[test]
    fn merge_keeps_omitted_notifications() {
        let merged = Notifications::default().merge(NotificationChanges {
            weekly_reports: Some(true),
            ..Default::default()
        });

        assert_eq!(
            merged,
            Notifications {
                budget_alerts: true,
                weekly_reports: true,
                monthly_reports: true,
            }
        );
    }
}
