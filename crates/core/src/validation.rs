//! Field-level validation shared by users and businesses.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DomainError, DomainResult};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S+@\S+\.\S+$").unwrap_or_else(|e| panic!("email pattern: {e}"))
});

static WEBSITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)[\w.-]+\.[a-z]{2,}.*$").unwrap_or_else(|e| panic!("website pattern: {e}"))
});

/// Normalize an email for storage and lookup (trimmed, lower-cased) and check
/// its shape.
pub fn email(raw: &str) -> DomainResult<String> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(DomainError::validation("email is required"));
    }
    if !EMAIL.is_match(&normalized) {
        return Err(DomainError::validation(format!("{normalized} is not a valid email address")));
    }
    Ok(normalized)
}

/// Optional website: empty strings count as absent, anything else must look
/// like an http(s) URL.
pub fn website(raw: Option<String>) -> DomainResult<Option<String>> {
    match optional(raw) {
        None => Ok(None),
        Some(url) if WEBSITE.is_match(&url) => Ok(Some(url)),
        Some(url) => Err(DomainError::validation(format!("{url} is not a valid URL!"))),
    }
}

/// Trimmed, non-empty required text field.
pub fn required(field: &str, raw: &str) -> DomainResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Trim an optional text field; blank becomes `None`.
pub fn optional(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
