//! API errors
//!
//! Every failure is a per-request outcome; none of them touch ledger state.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

use crate::consensus::{Block, ValidationError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Did not receive {0}")]
    MissingField(&'static str),
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("This block has been altered or incorrectly created: {reason}")]
    BlockRejected {
        block: Box<Block>,
        reason: ValidationError,
    },
    #[error("{0} not found")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_)
            | ApiError::MalformedPayload(_)
            | ApiError::BlockRejected { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedPayload(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!("{}", message);
        } else {
            warn!("{}", message);
        }

        let body = match self {
            ApiError::BlockRejected { block, .. } => json!({ "message": message, "newBlock": block }),
            _ => json!({ "message": message }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingField("newNodeUrl").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("Block".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::MissingField("transactionId").to_string(),
            "Did not receive transactionId"
        );
        assert_eq!(ApiError::NotFound("Block".into()).to_string(), "Block not found");
    }
}
