//! Core user domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A trimmed, lower-cased email address of the form `local@domain.tld`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Email(String);

impl Email {
    /// Create and validate an email address.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidEmail] if `raw_email` does not look like an email address.
    pub fn new(raw_email: &str) -> Result<Self, Error> {
        let email = raw_email.trim().to_lowercase();

        let Some((local, domain)) = email.split_once('@') else {
            return Err(Error::InvalidEmail);
        };

        let domain_is_valid = match domain.rsplit_once('.') {
            Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
            None => false,
        };

        if local.is_empty()
            || !domain_is_valid
            || domain.contains('@')
            || email.chars().any(char::is_whitespace)
        {
            return Err(Error::InvalidEmail);
        }

        Ok(Self(email))
    }

    /// Create an email address without validation.
    ///
    /// The caller should ensure that the string is a valid, lower-cased email address.
    pub fn new_unchecked(email: &str) -> Self {
        Self(email.to_owned())
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's display name, trimmed and between 2 and 100 characters long.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserName(String);

impl UserName {
    /// Create and validate a user name.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidUserName] if the trimmed name is shorter than 2 or longer than 100 characters.
    pub fn new(raw_name: &str) -> Result<Self, Error> {
        let name = raw_name.trim();
        let length = name.chars().count();

        if !(2..=100).contains(&length) {
            return Err(Error::InvalidUserName);
        }

        Ok(Self(name.to_owned()))
    }

    /// Create a user name without validation.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The currencies a user can choose to display their finances in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "UPPERCASE")]
#[allow(missing_docs)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Inr,
    Cny,
    Aud,
    Cad,
    Chf,
    Sek,
    Nzd,
    Mxn,
    Sgd,
    Hkd,
    Nok,
    Krw,
    Try,
    Rub,
    Brl,
    Zar,
    Pln,
    Dkk,
    Huf,
    Czk,
    Ils,
    Clp,
    Php,
    Aed,
    Cop,
    Sar,
    Myr,
    Thb,
    Idr,
    Ngn,
}

impl Currency {
    /// Every supported currency.
    pub const ALL: [Currency; 34] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Inr,
        Currency::Cny,
        Currency::Aud,
        Currency::Cad,
        Currency::Chf,
        Currency::Sek,
        Currency::Nzd,
        Currency::Mxn,
        Currency::Sgd,
        Currency::Hkd,
        Currency::Nok,
        Currency::Krw,
        Currency::Try,
        Currency::Rub,
        Currency::Brl,
        Currency::Zar,
        Currency::Pln,
        Currency::Dkk,
        Currency::Huf,
        Currency::Czk,
        Currency::Ils,
        Currency::Clp,
        Currency::Php,
        Currency::Aed,
        Currency::Cop,
        Currency::Sar,
        Currency::Myr,
        Currency::Thb,
        Currency::Idr,
        Currency::Ngn,
    ];

    /// The ISO 4217 code, e.g. "USD".
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Inr => "INR",
            Currency::Cny => "CNY",
            Currency::Aud => "AUD",
            Currency::Cad => "CAD",
            Currency::Chf => "CHF",
            Currency::Sek => "SEK",
            Currency::Nzd => "NZD",
            Currency::Mxn => "MXN",
            Currency::Sgd => "SGD",
            Currency::Hkd => "HKD",
            Currency::Nok => "NOK",
            Currency::Krw => "KRW",
            Currency::Try => "TRY",
            Currency::Rub => "RUB",
            Currency::Brl => "BRL",
            Currency::Zar => "ZAR",
            Currency::Pln => "PLN",
            Currency::Dkk => "DKK",
            Currency::Huf => "HUF",
            Currency::Czk => "CZK",
            Currency::Ils => "ILS",
            Currency::Clp => "CLP",
            Currency::Php => "PHP",
            Currency::Aed => "AED",
            Currency::Cop => "COP",
            Currency::Sar => "SAR",
            Currency::Myr => "MYR",
            Currency::Thb => "THB",
            Currency::Idr => "IDR",
            Currency::Ngn => "NGN",
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|currency| currency.as_str() == s)
            .ok_or_else(|| format!("unsupported currency \"{s}\""))
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// A user of the application.
///
/// The caller should ensure that `id` is unique.
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's display name.
    pub name: UserName,
    /// The email the user signs in with.
    pub email: Email,
    /// The user's password hash.
    #[serde(skip)]
    pub password_hash: PasswordHash,
    /// The currency amounts are displayed in.
    pub currency: Currency,
    /// Whether the client should use a dark theme.
    pub dark_mode: bool,
}



#[cfg(test)]
mod currency_tests {
    use crate::user::Currency;

    #[test]
    fn parses_iso_code() {
        assert_eq!("NZD".parse(), Ok(Currency::Nzd));
    }

    #[test]
    fn rejects_unknown_code() {
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn serializes_as_iso_code() {
        assert_eq!(serde_json::to_string(&Currency::Krw).unwrap(), "\"KRW\"");
    }
}
