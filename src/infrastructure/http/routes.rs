//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /ping               GET   健康检查
//! - /api/voices         GET   列出注册表中的全部音色版本
//! - /api/clone          POST  克隆音色（URL 来源，NDJSON 进度流）
//! - /api/clone/upload   POST  克隆音色（multipart 上传，NDJSON 进度流）
//! - /api/clone/sync     POST  克隆音色（同步，单终态事件 JSON）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/api", api_routes())
        .fallback(handlers::not_found)
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/voices", get(handlers::list_voices))
        .route("/clone", post(handlers::clone_voice))
        .route("/clone/upload", post(handlers::clone_voice_upload))
        .route("/clone/sync", post(handlers::clone_voice_sync))
}
