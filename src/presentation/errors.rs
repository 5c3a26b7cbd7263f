// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::repositories::RepositoryError;
use crate::domain::services::job_orchestrator::OrchestratorError;

/// 请求层错误
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
}

/// 应用错误类型
///
/// 封装所有可能的应用层错误，按错误类型映射HTTP状态码，
/// 响应体统一为 `{"error": "..."}`
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(e) = self.0.downcast_ref::<OrchestratorError>() {
            return match e {
                OrchestratorError::UnknownSite(_) | OrchestratorError::JobNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                OrchestratorError::NoActiveSites => StatusCode::BAD_REQUEST,
                OrchestratorError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                OrchestratorError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        if let Some(e) = self.0.downcast_ref::<RequestError>() {
            return match e {
                RequestError::BadRequest(_) => StatusCode::BAD_REQUEST,
                RequestError::Conflict(_) => StatusCode::CONFLICT,
            };
        }
        if self.0.downcast_ref::<validator::ValidationErrors>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.0.to_string();
        if status.is_server_error() {
            error!(error = %error_message, "Request failed");
        }

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
