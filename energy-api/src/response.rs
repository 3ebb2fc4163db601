//! Uniform JSON envelope: `{status, message?, data?, error?}`.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: None,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(Envelope::success(data)))
}

/// 201 with `data` and a short message.
pub fn created<T: Serialize>(message: &str, data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(Envelope::success(data).with_message(message)))
}

/// 204, empty body.
pub fn deleted() -> StatusCode {
    StatusCode::NO_CONTENT
}
