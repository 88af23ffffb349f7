//! Clone Context - 克隆请求

use std::path::Path;

use thiserror::Error;

use super::timecode::{self, TimecodeError};
use crate::domain::voice::VoiceName;

/// 外部管线可消费的源音频扩展名（小写，不含点）
pub const SUPPORTED_SOURCE_EXTENSIONS: &[&str] =
    &["mp3", "m4a", "wav", "mp4", "webm", "opus", "aac", "flac"];

pub fn is_supported_source_extension(ext: &str) -> bool {
    let lowered = ext.to_lowercase();
    SUPPORTED_SOURCE_EXTENSIONS.contains(&lowered.as_str())
}

/// 克隆任务的媒体来源
#[derive(Debug, Clone)]
pub enum CloneSource {
    /// 远程媒体地址，由外部管线负责下载
    Url(String),
    /// 调用方上传的音频文件，由编排器暂存到临时目录
    Upload { file_name: String, data: Vec<u8> },
}

impl CloneSource {
    pub fn is_url(&self) -> bool {
        matches!(self, CloneSource::Url(_))
    }

    /// 日志用的来源描述，不包含上传内容
    pub fn describe(&self) -> &str {
        match self {
            CloneSource::Url(url) => url,
            CloneSource::Upload { file_name, .. } => file_name,
        }
    }
}

/// 一次克隆请求的全部输入
#[derive(Debug, Clone)]
pub struct CloneRequest {
    pub voice_name: String,
    pub source: CloneSource,
    /// 剪辑窗口起点，原样透传给管线
    pub start: Option<String>,
    /// 剪辑窗口终点，原样透传给管线
    pub end: Option<String>,
    /// 成功后删除该来源的下载缓存
    pub no_cache: bool,
}

#[derive(Debug, Error)]
pub enum CloneRequestError {
    #[error("{0}")]
    InvalidName(&'static str),

    #[error("来源 URL 不能为空")]
    EmptyUrl,

    #[error("上传文件为空")]
    EmptyUpload,

    #[error("不支持的音频扩展名 {extension:?}，支持: {supported}")]
    UnsupportedExtension { extension: String, supported: String },

    #[error(transparent)]
    Window(#[from] TimecodeError),
}

impl CloneRequest {
    /// 进程启动前的全量校验；通过后返回规范化的音色名称
    pub fn validate(&self) -> Result<VoiceName, CloneRequestError> {
        let name = VoiceName::new(&self.voice_name).map_err(CloneRequestError::InvalidName)?;

        match &self.source {
            CloneSource::Url(url) => {
                if url.trim().is_empty() {
                    return Err(CloneRequestError::EmptyUrl);
                }
            }
            CloneSource::Upload { file_name, data } => {
                if data.is_empty() {
                    return Err(CloneRequestError::EmptyUpload);
                }
                let extension = Path::new(file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("");
                if !is_supported_source_extension(extension) {
                    return Err(CloneRequestError::UnsupportedExtension {
                        extension: extension.to_string(),
                        supported: SUPPORTED_SOURCE_EXTENSIONS.join(", "),
                    });
                }
            }
        }

        timecode::validate_window(self.start.as_deref(), self.end.as_deref())?;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_request(name: &str) -> CloneRequest {
        CloneRequest {
            voice_name: name.to_string(),
            source: CloneSource::Url("https://example.com/watch?v=abc".to_string()),
            start: None,
            end: None,
            no_cache: false,
        }
    }

    #[test]
    fn test_valid_url_request() {
        let name = url_request("Stefan").validate().unwrap();
        assert_eq!(name.as_str(), "stefan");
    }

    #[test]
    fn test_rejects_hyphenated_name() {
        let err = url_request("bad-name").validate().unwrap_err();
        assert!(matches!(err, CloneRequestError::InvalidName(_)));
    }

    #[test]
    fn test_rejects_empty_url() {
        let mut request = url_request("stefan");
        request.source = CloneSource::Url("   ".to_string());
        assert!(matches!(
            request.validate(),
            Err(CloneRequestError::EmptyUrl)
        ));
    }

    #[test]
    fn test_upload_extension_whitelist() {
        let mut request = url_request("stefan");
        request.source = CloneSource::Upload {
            file_name: "clip.MP3".to_string(),
            data: vec![1, 2, 3],
        };
        assert!(request.validate().is_ok());

        request.source = CloneSource::Upload {
            file_name: "clip.txt".to_string(),
            data: vec![1, 2, 3],
        };
        assert!(matches!(
            request.validate(),
            Err(CloneRequestError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_window() {
        let mut request = url_request("stefan");
        request.start = Some("0:30".to_string());
        request.end = Some("0:10".to_string());
        assert!(matches!(request.validate(), Err(CloneRequestError::Window(_))));
    }
}
