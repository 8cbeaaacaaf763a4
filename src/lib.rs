//! # 产品目录服务
//!
//! 基于 SQLite 的产品增删改查 Web 应用，包括：
//! - 产品列表、详情、搜索、新增、更新、删除
//! - 默认关闭的诊断路由（白名单命令、白名单抓取）
//! - 健康检查与静态文件

pub mod app;
pub mod core;
pub mod infrastructure;
pub mod view;

pub use app::{create_router, AppState};
pub use infrastructure::config::Config;
