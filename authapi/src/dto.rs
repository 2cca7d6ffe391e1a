//! Wire formats spoken with the AuthApi

use authapi_clock::DurationSecs;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{AccessToken, ResponseError};

/// Path of the login endpoint, relative to the AuthApi base URL
pub const LOGIN_PATH: &str = "login";

/// Path of the refresh endpoint, relative to the AuthApi base URL
pub const REFRESH_PATH: &str = "refresh";

/// The form body sent to the login endpoint
#[derive(Serialize)]
pub struct LoginForm<'a> {
    /// The username
    pub username: &'a str,
    /// The password
    pub password: &'a str,
}

impl std::fmt::Debug for LoginForm<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"***PASSWORD***")
            .finish()
    }
}

/// A validated token response from the AuthApi
#[derive(Debug)]
pub struct TokenResponse {
    /// The issued access token
    pub access_token: AccessToken,
    /// The number of seconds the token remains valid
    pub expires_in: DurationSecs,
    /// The token type, which is informational only
    pub token_type: Option<String>,
}

/// Decodes and validates a token response body
///
/// The body must be JSON. `access_token` must be a string other than `""`
/// or `"0"`, and `expires_in` must be present and non-null; an `expires_in`
/// of zero is accepted. Checks are performed in that order, so a body missing
/// both fields reports the missing access token.
pub fn decode_token_response(body: &[u8]) -> Result<TokenResponse, ResponseError> {
    let decoded: Value = serde_json::from_slice(body)?;
    let fields = decoded.as_object();

    let access_token = match field(fields, "access_token") {
        Some(Value::String(s)) if !s.is_empty() && s != "0" => AccessToken::new(s.clone()),
        _ => return Err(ResponseError::MissingAccessToken),
    };

    let expires_in = field(fields, "expires_in").ok_or(ResponseError::MissingExpiresIn)?;
    let expires_in = lifetime_from(expires_in).ok_or(ResponseError::InvalidExpiresIn)?;

    let token_type = field(fields, "token_type")
        .and_then(Value::as_str)
        .map(str::to_owned);

    Ok(TokenResponse {
        access_token,
        expires_in,
        token_type,
    })
}

/// Null values count as absent
fn field<'a>(fields: Option<&'a Map<String, Value>>, name: &str) -> Option<&'a Value> {
    fields.and_then(|f| f.get(name)).filter(|v| !v.is_null())
}

fn lifetime_from(value: &Value) -> Option<DurationSecs> {
    let secs = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    secs.map(DurationSecs)
}
