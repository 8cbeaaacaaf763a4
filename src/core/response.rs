//! JSON 响应封装

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON 接口的外层结构，带上服务名、版本和生成时间
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub service: &'static str,
    pub version: &'static str,
    pub data: T,
    pub served_at: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            data,
            served_at: Utc::now(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let value = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["service"], "product-catalog");
        assert_eq!(value["data"], 42);
        assert!(value["served_at"].is_string());
        assert!(value.get("request_id").is_none());
    }
}
