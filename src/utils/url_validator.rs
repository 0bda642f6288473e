//! Target URL validation.
//!
//! Targets are stored exactly as submitted; this module only decides whether a
//! string is an acceptable redirect destination.

use url::Url;

/// Longest target URL accepted.
pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("not an absolute URL: {0}")]
    InvalidFormat(String),

    #[error("only http and https URLs are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Checks that `input` is a well-formed absolute http(s) URL with a host.
///
/// Schemes such as `javascript:`, `data:` or `file:` are rejected, as is any
/// input that would not survive verbatim as an HTTP header value.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_target_url("https://example.com/very/long/path").is_ok());
/// assert!(validate_target_url("not-a-url").is_err());
/// ```
pub fn validate_target_url(input: &str) -> Result<Url, UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    // `Url::parse` strips or escapes these, but the raw input is what gets
    // stored and later sent back as a `Location` header.
    if input.trim() != input {
        return Err(UrlValidationError::InvalidFormat(
            "leading or trailing whitespace".to_string(),
        ));
    }
    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::InvalidFormat(
            "control characters are not allowed".to_string(),
        ));
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}
