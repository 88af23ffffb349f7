//! Clone HTTP Handlers
//!
//! 克隆任务的三种外形：NDJSON 进度流（JSON 体 / multipart 上传）
//! 和单终态事件的同步调用。任务总是被派生到独立的后台任务上，
//! 调用方断开只会停止事件投递，不会中断克隆。

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode, Uri},
    response::Response,
    Json,
};
use futures_util::stream;
use std::convert::Infallible;
use std::sync::Arc;

use crate::domain::clone::{
    is_supported_source_extension, CloneRequest, CloneSource, SUPPORTED_SOURCE_EXTENSIONS,
};
use crate::infrastructure::events::{ProgressEvent, ProgressSink};
use crate::infrastructure::http::dto::CloneRequestDto;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 克隆音色（URL 来源），返回 NDJSON 进度流
pub async fn clone_voice(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<CloneRequestDto>,
) -> Result<Response, ApiError> {
    stream_clone_job(state, dto.into_request())
}

/// 克隆音色（上传来源），返回 NDJSON 进度流
pub async fn clone_voice_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut voice_name: Option<String> = None;
    let mut start: Option<String> = None;
    let mut end: Option<String> = None;
    let mut no_cache = false;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "voice_name" => {
                voice_name = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read voice_name: {}", e))
                })?);
            }
            "start" => {
                start = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read start: {}", e))
                })?);
            }
            "end" => {
                end = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read end: {}", e))
                })?);
            }
            "no_cache" => {
                let value = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read no_cache: {}", e))
                })?;
                no_cache = matches!(value.trim(), "1" | "true" | "on");
            }
            "file" => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::BadRequest("Uploaded file has no name".to_string()))?;

                // 扩展名白名单在进入任务之前就把关
                let extension = std::path::Path::new(&file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("");
                if !is_supported_source_extension(extension) {
                    return Err(ApiError::BadRequest(format!(
                        "Unsupported audio extension {:?}, expected one of: {}",
                        extension,
                        SUPPORTED_SOURCE_EXTENSIONS.join(", ")
                    )));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                    .to_vec();
                upload = Some((file_name, data));
            }
            _ => {}
        }
    }

    let voice_name =
        voice_name.ok_or_else(|| ApiError::BadRequest("voice_name is required".to_string()))?;
    let (file_name, data) =
        upload.ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;

    let request = CloneRequest {
        voice_name,
        source: CloneSource::Upload { file_name, data },
        start: none_if_blank(start),
        end: none_if_blank(end),
        no_cache,
    };
    stream_clone_job(state, request)
}

/// 克隆音色（同步调用），返回单个终态事件
///
/// 不转发进度，只等待任务结束；响应体就是协议里的终态事件对象。
pub async fn clone_voice_sync(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<CloneRequestDto>,
) -> Json<ProgressEvent> {
    let (sink, rx) = ProgressSink::channel();
    drop(rx);
    let terminal = state.worker.run_job(dto.into_request(), sink).await;
    Json(terminal)
}

/// 未匹配路由的兜底
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// 派生后台克隆任务并把进度接收端包装成响应体流
fn stream_clone_job(state: Arc<AppState>, request: CloneRequest) -> Result<Response, ApiError> {
    let (sink, rx) = ProgressSink::channel();
    let worker = state.worker.clone();
    tokio::spawn(async move {
        worker.run_job(request, sink).await;
    });

    let body_stream = stream::unfold(rx, |mut rx| async move {
        loop {
            let event = rx.recv().await?;
            if let Some(line) = event.to_ndjson_line() {
                return Some((Ok::<_, Infallible>(line), rx));
            }
        }
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(body_stream))
        .map_err(|e| ApiError::Internal(format!("Failed to build stream response: {}", e)))
}

/// 表单里空白的可选字段视为未提供
fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
