//! Cross-cutting validation rules
//!
//! Small helpers shared by the auth and social crates for free-text fields
//! and user-supplied URLs. Lengths are counted in Unicode scalar values.

use crate::error::app_error::{AppError, AppResult};

/// Trim `value` and check that its length is within `min..=max`.
///
/// ```rust
/// use kernel::validation::bounded_text;
/// assert_eq!(bounded_text("content", "  hi  ", 1, 10).unwrap(), "hi");
/// assert!(bounded_text("content", "   ", 1, 10).is_err());
/// ```
pub fn bounded_text(field: &'static str, value: &str, min: usize, max: usize) -> AppResult<String> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();

    if length < min {
        if min == 1 {
            return Err(AppError::bad_request(format!("{field} cannot be empty")));
        }
        return Err(AppError::bad_request(format!(
            "{field} must be at least {min} characters (got {length})"
        )));
    }

    if length > max {
        return Err(AppError::bad_request(format!(
            "{field} must be at most {max} characters (got {length})"
        ))
        .with_action(format!("Shorten {field} to {max} characters")));
    }

    Ok(trimmed.to_string())
}

/// Optional free text where an empty string means "clear the field".
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> AppResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => bounded_text(field, text, 1, max).map(Some),
    }
}

/// Optional absolute http(s) URL; empty string clears.
pub fn optional_http_url(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> AppResult<Option<String>> {
    let Some(url) = optional_text(field, value, max)? else {
        return Ok(None);
    };

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| AppError::bad_request(format!("{field} must start with http:// or https://")))?;

    if rest.is_empty() || rest.starts_with('/') || url.chars().any(char::is_whitespace) {
        return Err(AppError::bad_request(format!("{field} is not a valid URL")));
    }

    Ok(Some(url))
}
