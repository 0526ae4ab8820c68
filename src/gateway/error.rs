use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::DOGMATCH_STATUS_HEADER;
use crate::breeds::BreedError;
use crate::similarity::SimilarityError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid embedding: {0}")]
    InvalidEmbedding(#[from] SimilarityError),

    #[error("breed mappings unavailable: {0}")]
    BreedsUnavailable(#[from] BreedError),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, status_label) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::InvalidEmbedding(_) => (StatusCode::BAD_REQUEST, "invalid_embedding"),
            GatewayError::BreedsUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "not_initialized")
            }
            GatewayError::EmbeddingFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error")
            }
            GatewayError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            DOGMATCH_STATUS_HEADER,
            HeaderValue::from_static(status_label),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for GatewayError {
    fn from(rejection: MultipartRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

impl From<MultipartError> for GatewayError {
    fn from(err: MultipartError) -> Self {
        GatewayError::InvalidRequest(format!("malformed multipart body: {}", err.body_text()))
    }
}
