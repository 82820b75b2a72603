//! API 错误到 HTTP 响应的映射。

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_api_types::ErrorResponse;
use folio_core::domain::DomainError;
use folio_gallery::GalleryError;
use tracing::error;

/// API 错误类型。
#[derive(Debug)]
pub struct ApiError {
    message: String,
    code: String,
    status: StatusCode,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl From<GalleryError> for ApiError {
    fn from(err: GalleryError) -> Self {
        // 目录读取失败一律按服务端错误返回
        let code = match &err {
            GalleryError::PathNotFound(_) => "PATH_NOT_FOUND",
            GalleryError::NotADirectory(_) => "NOT_A_DIRECTORY",
            GalleryError::PermissionDenied(_) => "PERMISSION_DENIED",
            GalleryError::Io(_) => "IO_ERROR",
        };
        error!(error = %err, code, "gallery listing failed");

        ApiError {
            message: "Failed to read gallery folder".to_string(),
            code: code.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError {
            message: err.to_string(),
            code: "MISSING_FIELDS".to_string(),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError {
            message: rejection.body_text(),
            code: "INVALID_BODY".to_string(),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
            code: self.code,
        });
        (self.status, body).into_response()
    }
}
