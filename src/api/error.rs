use reqwest::StatusCode;
use thiserror::Error;

/// API-specific errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let msg = if message.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(msg),
            StatusCode::FORBIDDEN => ApiError::Unauthorized(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(msg),
            StatusCode::BAD_REQUEST => ApiError::BadRequest(msg),
            status if status.is_server_error() => ApiError::ServerError(msg),
            status if status.is_client_error() => ApiError::BadRequest(msg),
            _ => ApiError::Unknown(msg),
        }
    }

    /// Build an error from a response body, surfacing the server `detail`
    /// string when the body is a JSON error envelope.
    pub fn from_response(status: StatusCode, body: String) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from));

        Self::from_status(status, detail.unwrap_or(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_extraction() {
        let error = ApiError::from_response(
            StatusCode::NOT_FOUND,
            r#"{"detail": "Competitor not found"}"#.to_string(),
        );
        assert!(matches!(error, ApiError::NotFound(msg) if msg == "Competitor not found"));
    }

    #[test]
    fn test_plain_body_fallback() {
        let error = ApiError::from_response(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert!(matches!(error, ApiError::ServerError(msg) if msg == "upstream down"));
    }

    #[test]
    fn test_empty_body_uses_canonical_reason() {
        let error = ApiError::from_response(StatusCode::NOT_FOUND, String::new());
        assert!(matches!(error, ApiError::NotFound(msg) if msg == "Not Found"));
    }

    #[test]
    fn test_validation_status() {
        let error = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "hours must be positive".to_string(),
        );
        assert!(matches!(error, ApiError::Validation(_)));
    }
}
