//! Basic Authentication verification
//!
//! Parses the `Authorization` header, decodes the Base64 credential pair and
//! compares it against the configured values in constant time.

use base64::prelude::*;
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;

const BASIC_PREFIX: &str = "Basic ";

/// Credentials decoded from a single request. Never stored.
#[derive(Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The two user-visible authentication failures, both answered with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Header absent, or scheme is not `Basic`
    MissingCredentials,
    /// Decode failure or credential mismatch
    InvalidCredentials,
}

impl AuthError {
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingCredentials => "Authentication required",
            Self::InvalidCredentials => "Invalid credentials",
        }
    }
}

/// Decode a Base64 `username:password` pair.
///
/// The split is on the first colon only, so a password may itself contain
/// colons. Returns `None` on bad Base64, non-UTF-8 payloads, or a payload
/// without a colon.
pub fn decode_credentials(encoded: &str) -> Option<Credentials> {
    let decoded = BASE64_STANDARD.decode(encoded).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (username, password) = text.split_once(':')?;
    Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Compare decoded credentials against the configured values.
///
/// Both comparisons run in constant time and are combined without
/// short-circuiting, so the mismatch position leaks no timing signal.
pub fn verify(credentials: &Credentials, expected: &AuthConfig) -> bool {
    let username_ok: bool = credentials
        .username
        .as_bytes()
        .ct_eq(expected.username.as_bytes())
        .into();
    let password_ok: bool = credentials
        .password
        .as_bytes()
        .ct_eq(expected.password.as_bytes())
        .into();
    username_ok & password_ok
}

/// Full check for one request: header presence, scheme, decode, comparison.
pub fn authorize(header: Option<&str>, expected: &AuthConfig) -> Result<(), AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;
    let encoded = header
        .strip_prefix(BASIC_PREFIX)
        .ok_or(AuthError::MissingCredentials)?;

    let credentials = decode_credentials(encoded).ok_or(AuthError::InvalidCredentials)?;

    if verify(&credentials, expected) {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}
