use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::DatabaseError;
use std::borrow::Cow;
use thiserror::Error;
use tracing::error;
use validator::{ValidationError, ValidationErrors};

use crate::storage::StorageError;

/// 使用 [`thiserror`] 定义错误类型
/// 方便根据类型转换为相应的http错误码
#[derive(Error, Debug)]
pub enum AppError {
    /// 数据验证错误，这种错误通常都是用户参数不正确导致的，所以需要转换为400
    #[error(transparent)]
    ValidationFailed(#[from] ValidationErrors),

    /// multipart 请求体解析失败
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// 请求的资源不存在
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 仓库层数据库错误
    #[error(transparent)]
    RepositoryError(#[from] DatabaseError),

    /// 文件存储错误
    #[error(transparent)]
    StorageError(#[from] StorageError),
}

/// 业务层统一的返回类型
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 单个字段校验失败
    pub fn invalid(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, ValidationError::new(code).with_message(Cow::Borrowed(message)));
        Self::ValidationFailed(errors)
    }

    pub fn not_found<T: ToString>(what: T) -> Self {
        Self::NotFound(what.to_string())
    }
}

/// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::ValidationFailed(err) => (StatusCode::BAD_REQUEST, format!("Validate failed: {err}")).into_response(),
            AppError::Multipart(err) => (StatusCode::BAD_REQUEST, format!("Invalid multipart body: {err}")).into_response(),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("Resource not found: {msg}")).into_response(),
            AppError::RepositoryError(err) => match err {
                DatabaseError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("Resource not found: {msg}")).into_response(),
                DatabaseError::Conflict(msg) => (StatusCode::CONFLICT, format!("Conflict: {msg}")).into_response(),
                _ => {
                    error!("❌ 仓库层错误: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, format!("Repository error: {err}")).into_response()
                }
            },
            AppError::StorageError(err) => {
                error!("❌ 文件存储错误: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {err}")).into_response()
            }
        }
    }
}
