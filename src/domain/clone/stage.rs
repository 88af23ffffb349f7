//! Clone Context - 任务生命周期阶段

use serde::{Deserialize, Serialize};

/// 克隆任务的粗粒度生命周期阶段
///
/// 阶段之间存在全序（声明顺序即推进顺序），状态只会向后推进，
/// 不会从外部输出中推断回退。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneStage {
    Starting,
    DownloadingMedia,
    ExtractingAudio,
    CloningVoice,
    SavingProfile,
    Finalizing,
}

impl CloneStage {
    /// 全部阶段，按推进顺序
    pub const ALL: [CloneStage; 6] = [
        CloneStage::Starting,
        CloneStage::DownloadingMedia,
        CloneStage::ExtractingAudio,
        CloneStage::CloningVoice,
        CloneStage::SavingProfile,
        CloneStage::Finalizing,
    ];

    /// 协议中的阶段标识
    pub fn as_str(&self) -> &'static str {
        match self {
            CloneStage::Starting => "starting",
            CloneStage::DownloadingMedia => "downloading_media",
            CloneStage::ExtractingAudio => "extracting_audio",
            CloneStage::CloningVoice => "cloning_voice",
            CloneStage::SavingProfile => "saving_profile",
            CloneStage::Finalizing => "finalizing",
        }
    }

    /// 展示给调用方的人类可读描述
    pub fn label(&self) -> &'static str {
        match self {
            CloneStage::Starting => "Starting clone job",
            CloneStage::DownloadingMedia => "Downloading source media",
            CloneStage::ExtractingAudio => "Extracting audio clip",
            CloneStage::CloningVoice => "Cloning voice embedding",
            CloneStage::SavingProfile => "Saving voice profile",
            CloneStage::Finalizing => "Finalizing",
        }
    }
}

impl std::fmt::Display for CloneStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
