//! Bearer Token Extraction
//!
//! Parses `Authorization: Bearer <token>` (RFC 6750) from request headers.

use axum::http::{HeaderMap, header};

/// Outcome of looking for a bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BearerToken {
    /// No `Authorization` header at all
    Absent,
    /// Header present but not a usable bearer credential
    Malformed,
    /// Token text (without the scheme)
    Present(String),
}

impl BearerToken {
    /// Return the token if present
    pub fn into_option(self) -> Option<String> {
        match self {
            BearerToken::Present(token) => Some(token),
            _ => None,
        }
    }
}

/// Extract the bearer token from headers
///
/// The scheme name is matched case-insensitively. Empty tokens and tokens
/// containing whitespace are reported as malformed.
pub fn extract_bearer(headers: &HeaderMap) -> BearerToken {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return BearerToken::Absent;
    };

    let Ok(value) = value.to_str() else {
        return BearerToken::Malformed;
    };

    let Some((scheme, token)) = value.trim().split_once(' ') else {
        return BearerToken::Malformed;
    };

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer")
        || token.is_empty()
        || token.chars().any(char::is_whitespace)
    {
        return BearerToken::Malformed;
    }

    BearerToken::Present(token.to_string())
}
