//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::clone::{CloneRequest, CloneSource};
use crate::domain::voice::VoiceEntry;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VoiceDto {
    pub name: String,
    pub version: u32,
    pub location: String,
    pub has_reference_wav: bool,
    pub modified_at: Option<String>,
}

impl From<VoiceEntry> for VoiceDto {
    fn from(entry: VoiceEntry) -> Self {
        Self {
            name: entry.name,
            version: entry.version.get(),
            location: entry.artifact_path.display().to_string(),
            has_reference_wav: entry.has_reference_wav,
            modified_at: entry.modified_at.map(|t| t.to_rfc3339()),
        }
    }
}

// ============================================================================
// Clone DTOs
// ============================================================================

/// URL 来源的克隆请求体
#[derive(Debug, Deserialize)]
pub struct CloneRequestDto {
    pub voice_name: String,
    pub source_url: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub no_cache: bool,
}

impl CloneRequestDto {
    pub fn into_request(self) -> CloneRequest {
        CloneRequest {
            voice_name: self.voice_name,
            source: CloneSource::Url(self.source_url),
            start: self.start,
            end: self.end,
            no_cache: self.no_cache,
        }
    }
}
