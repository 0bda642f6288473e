//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Request to shorten one URL.
///
/// Only size limits are checked here; URL format, alias policy and TTL rules
/// are enforced by [`ShorteningService`](crate::application::services::ShorteningService)
/// so they surface with their own error kinds.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten (absolute http/https).
    #[validate(length(max = 8192, message = "url is too long"))]
    pub url: String,

    /// Optional custom short code.
    #[validate(length(max = 256, message = "custom_code is too long"))]
    pub custom_code: Option<String>,

    /// Optional lifetime in seconds. Must be positive.
    pub ttl_seconds: Option<i64>,
}

/// Created short link.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub is_custom: bool,
}

impl ShortenResponse {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            code: link.code,
            short_url,
            target_url: link.target_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
            is_custom: link.is_custom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_minimal_body() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();

        assert!(req.validate().is_ok());
        assert!(req.custom_code.is_none());
        assert!(req.ttl_seconds.is_none());
    }

    #[test]
    fn test_request_rejects_oversized_alias() {
        let req = ShortenRequest {
            url: "https://example.com".to_string(),
            custom_code: Some("x".repeat(300)),
            ttl_seconds: None,
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_response_omits_missing_expiry() {
        let link = ShortLink::new(
            "abc123".to_string(),
            "https://example.com".to_string(),
            Utc::now(),
            None,
            false,
        );

        let json =
            serde_json::to_value(ShortenResponse::new(link, "http://s/abc123".to_string())).unwrap();

        assert!(json.get("expires_at").is_none());
        assert_eq!(json["code"], "abc123");
    }
}
