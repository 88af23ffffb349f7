//! Voice HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{ApiResponse, VoiceDto};
use crate::infrastructure::http::state::AppState;

/// 获取音色列表
///
/// 直接反映注册表目录的当前状态：名称升序、每个名称内版本降序。
pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Vec<VoiceDto>>> {
    let voices: Vec<VoiceDto> = state
        .registry
        .list_voices()
        .await
        .into_iter()
        .map(VoiceDto::from)
        .collect();

    Json(ApiResponse::success(voices))
}
