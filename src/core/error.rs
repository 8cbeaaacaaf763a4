//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;
use uuid::Uuid;

use crate::view;

/// 核心错误类型
///
/// 5xx 的细节只写入日志，客户端只看到通用描述和请求 ID。
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("command exited with status {0}")]
    CommandFailed(i32),
    #[error("timed out after {0} seconds")]
    Timeout(u64),
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();

        let (status, user_message) = match self {
            CoreError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            CoreError::CommandFailed(code) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Command exited with status {code}"),
            ),
            CoreError::Timeout(secs) => (
                StatusCode::GATEWAY_TIMEOUT,
                format!("Request timed out after {secs} seconds"),
            ),
            CoreError::Upstream(detail) => {
                error!(%request_id, "Upstream error: {}", detail);
                (StatusCode::BAD_GATEWAY, "Upstream request failed".to_string())
            }
            CoreError::Database(e) => {
                error!(%request_id, "Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            CoreError::Internal(detail) => {
                error!(%request_id, "Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let page = view::error_page(status, &user_message, &request_id);
        (status, page).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CoreError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (CoreError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (CoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CoreError::CommandFailed(1), StatusCode::INTERNAL_SERVER_ERROR),
            (CoreError::Timeout(3), StatusCode::GATEWAY_TIMEOUT),
            (CoreError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (CoreError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
            (CoreError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
