use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use jarvis_api_client::ClientError;
use jarvis_core::ops::OpsError;

/// Error response rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiErr {
    status: StatusCode,
    message: String,
}

impl ApiErr {
    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// The dashboard server could not be reached or answered with an error.
    pub fn from_dashboard(e: ClientError) -> Self {
        tracing::warn!(status = ?e.status(), "dashboard request failed: {e}");
        Self::new(
            StatusCode::BAD_GATEWAY,
            format!("dashboard server unavailable: {e}"),
        )
    }
}

impl From<OpsError> for ApiErr {
    fn from(e: OpsError) -> Self {
        match e {
            OpsError::TaskNotFound(_) => Self::not_found(e.to_string()),
            OpsError::InvalidLimit(_) | OpsError::InvalidPatch(_) => Self::bad_request(e.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiErr {
    fn from(e: std::io::Error) -> Self {
        tracing::error!("record file write failed: {e}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({"error": self.message})),
        )
            .into_response()
    }
}
