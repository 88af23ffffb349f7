//! Voice Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::VoiceVersion;

/// 注册表中的一个音色版本条目
///
/// 不变量:
/// - `name` 是通过名称谓词的目录名，大小写原样保留
/// - `artifact_path` 指向该版本的 `voice.safetensors`
/// - 只有工件文件存在的版本才会成为条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceEntry {
    pub name: String,
    pub version: VoiceVersion,
    pub artifact_path: PathBuf,
    /// 同目录下是否存在参考音频 `voice.wav`（仅用于展示，不影响存在性判定）
    pub has_reference_wav: bool,
    /// 工件文件的最后修改时间
    pub modified_at: Option<DateTime<Utc>>,
}

impl VoiceEntry {
    /// 版本目录（工件文件所在目录）
    pub fn version_dir(&self) -> Option<&std::path::Path> {
        self.artifact_path.parent()
    }
}
