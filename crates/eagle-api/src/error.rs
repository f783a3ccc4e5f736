use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eagle_core::EagleError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), details: None }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, details: self.details };
        (self.status, Json(body)).into_response()
    }
}

/// Pipeline errors all surface as 500. Caller-caused errors keep their
/// message; anything else gets a generic one so internals stay out of the body.
impl From<EagleError> for ApiError {
    fn from(err: EagleError) -> Self {
        if err.is_user_facing() {
            return Self::internal(err.to_string());
        }
        match err {
            EagleError::GeocoderUnavailable { .. } => {
                Self::internal("Geocoding service unavailable")
            }
            _ => Self::internal("Internal server error"),
        }
    }
}
