use crate::orchestrator::RecommendError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors returned by the HTTP handlers
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Algorithm '{0}' not found.")]
    AlgorithmNotFound(String),

    #[error("Invalid top_n: {0}")]
    InvalidTopN(String),

    /// Missing or non-numeric `user_id`
    #[error("Invalid user_id: {0}")]
    InvalidUserId(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::UnknownAlgorithm(name) => ApiError::AlgorithmNotFound(name),
            RecommendError::InvalidTopN => ApiError::InvalidTopN("0".to_string()),
            RecommendError::Pipeline(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::AlgorithmNotFound(_) | ApiError::InvalidTopN(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidUserId(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::AlgorithmNotFound("X".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidTopN("0".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidUserId("abc".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_unknown_algorithm_message() {
        let err = ApiError::from(RecommendError::UnknownAlgorithm("Foo".into()));
        assert_eq!(err.to_string(), "Algorithm 'Foo' not found.");
    }
}
