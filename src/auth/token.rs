//! Issuing and checking the JSON web tokens used as bearer tokens.

use jsonwebtoken::{Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, JwtKeys, UserId};

/// The contents of a JSON Web Token.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: UserId,
    /// The time the token was issued as a unix timestamp.
    pub iat: i64,
    /// The expiry time of the token as a unix timestamp.
    pub exp: i64,
}

/// Create a signed token for `user_id` that expires after `duration`.
///
/// # Errors
///
/// Returns an [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(user_id: UserId, duration: Duration, keys: &JwtKeys) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id,
        iat: now.unix_timestamp(),
        exp: (now + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, keys.encoding_key())
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Check the signature and expiry of `token` and return the user it was issued to.
///
/// # Errors
///
/// Returns an [Error::TokenExpired] if the token has expired, or an
/// [Error::InvalidToken] for any other problem with the token.
pub fn decode_token(token: &str, keys: &JwtKeys) -> Result<UserId, Error> {
    decode::<Claims>(token, keys.decoding_key(), &Validation::default())
        .map(|token_data| token_data.claims.sub)
        .map_err(|error| match error.kind() {
            ErrorKind::ExpiredSignature => Error::TokenExpired,
            _ => {
                tracing::debug!("rejected bearer token: {error}");
                Error::InvalidToken
            }
        })
}
