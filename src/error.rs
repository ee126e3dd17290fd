use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("Server misconfiguration: {0}")]
    InternalConfig(String),

    #[error("Provider call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::{header, StatusCode};
        use axum::Json;
        use serde_json::json;

        let (status, message) = match &self {
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Conflict(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::QuotaExceeded(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::InternalConfig(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status == StatusCode::UNAUTHORIZED {
            // Basic challenge so clients know to retry with credentials
            return (
                status,
                [(
                    header::WWW_AUTHENTICATE,
                    "Basic realm=\"subdomain-portal\", charset=\"UTF-8\"",
                )],
                Json(json!({ "error": message })),
            )
                .into_response();
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (AppError::QuotaExceeded("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::InternalConfig("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_unauthorized_carries_challenge_header() {
        let resp = AppError::Unauthorized("admin credentials required".into()).into_response();
        let challenge = resp
            .headers()
            .get(axum::http::header::WWW_AUTHENTICATE)
            .expect("401 must carry WWW-Authenticate");
        assert!(challenge.to_str().unwrap().starts_with("Basic"));
    }

    #[test]
    fn test_internal_error_detail_is_not_leaked() {
        let resp = AppError::Internal("secret detail".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
