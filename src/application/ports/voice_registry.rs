//! Voice Registry Port - 音色注册表抽象
//!
//! 注册表是纯读取视图：目录由外部管线写入，这里只做枚举与校验。
//! 缺失的根目录和读取失败的目录一律视为空，不构成错误。

use async_trait::async_trait;

use crate::domain::voice::{VoiceEntry, VoiceName, VoiceVersion};

/// Voice Registry Port
#[async_trait]
pub trait VoiceRegistryPort: Send + Sync {
    /// 枚举所有存在的音色版本
    ///
    /// 排序：名称升序（不区分大小写），同名内版本降序（每个音色的
    /// 最新版本在前）。条目名称保留目录名原样。
    async fn list_voices(&self) -> Vec<VoiceEntry>;

    /// 某个名称当前存在的最大版本
    ///
    /// 任务结束后用它反查外部管线刚产出的版本号。
    async fn resolve_latest_version(&self, name: &VoiceName) -> Option<VoiceVersion>;
}
