use poem::{
    IntoResponse, Response,
    http::{StatusCode, header},
};
use thiserror::Error;

use crate::schemas::common::ErrorResponse;

pub const MISSING_PARAMS: &str = "缺少必要参数";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl GenerateError {
    pub fn missing_params() -> Self {
        GenerateError::Validation(MISSING_PARAMS.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GenerateError::Validation(_) => StatusCode::BAD_REQUEST,
            GenerateError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse::new(self.to_string());
        // ErrorResponse holds a single string field, serialization cannot fail
        let body = serde_json::to_string(&body).unwrap_or_default();

        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .body(body)
    }
}
