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

use crate::application::usecases::start_scrape::StartScrapeError;
use crate::domain::repositories::scrape_job_repository::RepositoryError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = if let Some(repo_err) = self.0.downcast_ref::<RepositoryError>() {
            match repo_err {
                RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
            }
        } else if let Some(start_err) = self.0.downcast_ref::<StartScrapeError>() {
            match start_err {
                StartScrapeError::ActorNotConfigured(_) => StatusCode::BAD_REQUEST,
                // The provider refused the run, the job is already failed
                StartScrapeError::Provider(_) => StatusCode::BAD_GATEWAY,
                StartScrapeError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if error_message.contains("cannot be empty")
            || error_message.contains("invalid")
            || error_message.contains("required")
        {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

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
