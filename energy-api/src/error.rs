use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use energy_client::StoreError;

use crate::{response::Envelope, validate::ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate type name or duplicate generator/day production.
    #[error("{0}")]
    Conflict(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::InvalidArgument(e.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            StoreError::DuplicateName { .. } | StoreError::DuplicatePeriod { .. } => {
                ApiError::Conflict(e.to_string())
            }
            StoreError::ForeignKeyViolation { .. } | StoreError::InvalidRecord(_) => {
                ApiError::InvalidArgument(e.to_string())
            }
            StoreError::Database { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "internal server error".to_string()
            }
            ApiError::Unavailable(detail) => {
                tracing::warn!(error = %detail, "dependency unavailable");
                self.to_string()
            }
            other => {
                tracing::debug!(status = status.as_u16(), error = %other, "request rejected");
                other.to_string()
            }
        };

        (status, Json(Envelope::failure(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use uuid::Uuid;

    #[test]
    fn store_errors_map_to_status_codes() {
        let id = Uuid::new_v4();
        let cases = [
            (StoreError::not_found("type", id), StatusCode::NOT_FOUND),
            (StoreError::DuplicateName { name: "Solar".into() }, StatusCode::CONFLICT),
            (
                StoreError::DuplicatePeriod { generator_id: id, date: date!(2025 - 01 - 01) },
                StatusCode::CONFLICT,
            ),
            (StoreError::ForeignKeyViolation { entity: "type", id }, StatusCode::BAD_REQUEST),
            (StoreError::InvalidRecord("capacity".into()), StatusCode::BAD_REQUEST),
            (
                StoreError::database("list types", sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let response = ApiError::Internal("password authentication failed for user x".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "internal server error");
    }
}
