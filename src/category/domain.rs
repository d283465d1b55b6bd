//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::{Error, UserId, database_id::CategoryId};

/// The icon given to a category when the client does not pick one.
pub const DEFAULT_ICON: &str = "💰";

/// The colour given to a category when the client does not pick one.
pub const DEFAULT_COLOR: &str = "#FF6B6B";

/// Whether money flows in or out of the user's pocket.
///
/// Both categories and transactions have a kind, and a transaction's kind must
/// match the kind of its category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Money earned, e.g. a salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl CategoryKind {
    /// The lower-case name used in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }
}

impl Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            other => Err(format!("\"{other}\" is not one of income or expense")),
        }
    }
}

impl ToSql for CategoryKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for CategoryKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hex colour code of the form `#RGB` or `#RRGGBB`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Color(String);

impl Color {
    /// Create and validate a colour.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidColor] if `color` is not a 3 or 6 digit hex code prefixed with '#'.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();

        let is_valid = match color.strip_prefix('#') {
            Some(digits) => {
                (digits.len() == 3 || digits.len() == 6)
                    && digits.chars().all(|c| c.is_ascii_hexdigit())
            }
            None => false,
        };

        if is_valid {
            Ok(Self(color.to_owned()))
        } else {
            Err(Error::InvalidColor(color.to_owned()))
        }
    }

    /// Create a colour without validation.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_owned())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_owned())
    }
}

impl AsRef<str> for Color {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A category that transactions and budgets are filed under.
///
/// Categories without an owner are global and visible to every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub user_id: Option<UserId>,
    pub name: CategoryName,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub icon: String,
    pub color: Color,
    pub is_default: bool,
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        let category_name = CategoryName::new("");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let category_name = CategoryName::new("\n\t \r");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let category_name = CategoryName::new("🔥");

        assert!(category_name.is_ok())
    }
}


#[cfg(test)]
mod category_kind_tests {
    use crate::category::CategoryKind;

    #[test]
    fn serializes_lower_case() {
        assert_eq!(
            serde_json::to_string(&CategoryKind::Expense).unwrap(),
            "\"expense\""
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!("transfer".parse::<CategoryKind>().is_err());
        assert!(serde_json::from_str::<CategoryKind>("\"Income\"").is_err());
    }
}
