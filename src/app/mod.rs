//! 应用层：路由与处理器

pub mod debug;
pub mod health;
pub mod product;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::time::Duration;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use self::debug::service::DiagnosticsService;
use self::product::service::ProductService;
use crate::core::{error::CoreError, middleware::request_logging_middleware};
use crate::infrastructure::config::{DebugConfig, HttpConfig};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub product_service: ProductService,
    pub diagnostics: DiagnosticsService,
}

impl AppState {
    pub fn new(pool: SqlitePool, debug: DebugConfig) -> Result<Self, CoreError> {
        Ok(Self {
            product_service: ProductService::new(pool.clone()),
            diagnostics: DiagnosticsService::new(debug)?,
            pool,
        })
    }
}

/// 创建路由，未匹配的路径交给静态文件目录
pub fn create_router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .route("/", get(product::handler::list_products))
        .route("/product/:id", get(product::handler::get_product))
        .route("/product/:id/update", post(product::handler::update_product))
        .route(
            "/product/:id/delete",
            get(product::handler::delete_product).post(product::handler::delete_product),
        )
        .route("/search", get(product::handler::search_products))
        .route(
            "/add-product",
            get(product::handler::add_product_form).post(product::handler::create_product),
        )
        .route("/debug/exec", get(debug::handler::exec_diagnostic))
        .route("/debug/fetch", get(debug::handler::fetch_url))
        .route("/health", get(health::health_check))
        .fallback_service(ServeDir::new(&http.static_dir))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(http.timeout_seconds)))
        .with_state(state)
}
