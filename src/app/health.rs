//! 健康检查

use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::core::{error::CoreError, response::ApiResponse};

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
    pub products: i64,
}

/// GET /health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<ApiResponse<Health>, CoreError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;
    let products = state.product_service.count().await?;

    Ok(ApiResponse::success(Health {
        status: "healthy",
        database: "connected",
        products,
    }))
}
