//! Clone Context - 阶段分类器
//!
//! 外部管线的输出是面向人的自由文本，不是稳定协议。这里用一张
//! 有序的 (子串, 阶段) 触发表做大小写不敏感的启发式匹配，
//! 表内容可调而契约不变。

use super::stage::CloneStage;

/// 触发表：按顺序取第一个命中的条目
///
/// 每个阶段同时登记管线的通告语句和工具特征标记（yt-dlp / ffmpeg），
/// 任一出现即视为进入该阶段。
pub const STAGE_TRIGGERS: &[(&str, CloneStage)] = &[
    ("downloading source audio", CloneStage::DownloadingMedia),
    ("yt-dlp", CloneStage::DownloadingMedia),
    ("[download]", CloneStage::DownloadingMedia),
    ("reusing cached source audio", CloneStage::ExtractingAudio),
    ("extracting voice prompt", CloneStage::ExtractingAudio),
    ("ffmpeg", CloneStage::ExtractingAudio),
    ("exporting voice embedding", CloneStage::CloningVoice),
    ("loading model", CloneStage::CloningVoice),
    ("saved voice wav profile", CloneStage::SavingProfile),
    ("saved voice safetensors profile", CloneStage::SavingProfile),
    ("writing manifest", CloneStage::Finalizing),
    ("all jobs completed", CloneStage::Finalizing),
];

/// 对单行输出做无状态分类；未命中返回 `None`
pub fn classify(line: &str) -> Option<CloneStage> {
    let lowered = line.to_lowercase();
    STAGE_TRIGGERS
        .iter()
        .find(|(trigger, _)| lowered.contains(trigger))
        .map(|(_, stage)| *stage)
}

/// 单个任务内的阶段推进状态
///
/// 每个任务持有自己的实例，生命周期与任务一致。转移规则:
/// - 相同阶段: 幂等，不产生事件
/// - 更早阶段: 不回退，不产生事件
/// - 更晚阶段: 推进并返回新阶段
#[derive(Debug)]
pub struct StageTracker {
    current: CloneStage,
}

impl StageTracker {
    pub fn new(initial: CloneStage) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> CloneStage {
        self.current
    }

    /// 分类一行输出并尝试推进；返回新进入的阶段
    pub fn observe_line(&mut self, line: &str) -> Option<CloneStage> {
        classify(line).and_then(|stage| self.advance_to(stage))
    }

    /// 直接尝试推进到指定阶段
    pub fn advance_to(&mut self, stage: CloneStage) -> Option<CloneStage> {
        if stage > self.current {
            self.current = stage;
            Some(stage)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_triggers() {
        assert_eq!(
            classify("Downloading source audio..."),
            Some(CloneStage::DownloadingMedia)
        );
        assert_eq!(
            classify("[download]  45.2% of 10MiB"),
            Some(CloneStage::DownloadingMedia)
        );
        assert_eq!(
            classify("Extracting voice prompt clip..."),
            Some(CloneStage::ExtractingAudio)
        );
        assert_eq!(
            classify("Exporting voice embedding..."),
            Some(CloneStage::CloningVoice)
        );
        assert_eq!(
            classify("Saved voice safetensors profile: /tmp/v/1/voice.safetensors"),
            Some(CloneStage::SavingProfile)
        );
        assert_eq!(classify("All jobs completed."), Some(CloneStage::Finalizing));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(
            classify("EXTRACTING VOICE PROMPT CLIP"),
            Some(CloneStage::ExtractingAudio)
        );
        assert_eq!(classify("running FFMPEG now"), Some(CloneStage::ExtractingAudio));
    }

    #[test]
    fn test_classify_unknown_line_is_no_signal() {
        assert_eq!(classify("Job 1/1"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("Voice profile: stefan/1"), None);
    }

    #[test]
    fn test_tracker_is_idempotent() {
        let mut tracker = StageTracker::new(CloneStage::Starting);
        assert_eq!(
            tracker.observe_line("Downloading source audio..."),
            Some(CloneStage::DownloadingMedia)
        );
        // 相同阶段的第二次触发不再产生事件
        assert_eq!(tracker.observe_line("Downloading source audio..."), None);
        assert_eq!(tracker.observe_line("[download] 99%"), None);
        assert_eq!(tracker.current(), CloneStage::DownloadingMedia);
    }

    #[test]
    fn test_tracker_never_regresses() {
        let mut tracker = StageTracker::new(CloneStage::CloningVoice);
        assert_eq!(tracker.observe_line("yt-dlp warning: throttled"), None);
        assert_eq!(tracker.current(), CloneStage::CloningVoice);
        assert_eq!(
            tracker.observe_line("Saved voice wav profile: voice.wav"),
            Some(CloneStage::SavingProfile)
        );
    }

    #[test]
    fn test_tracker_walks_full_pipeline() {
        let mut tracker = StageTracker::new(CloneStage::DownloadingMedia);
        let lines = [
            "Job 1/1",
            "Downloading source audio...",
            "[download] 100% of 8.3MiB",
            "Extracting voice prompt clip...",
            "Exporting voice embedding...",
            "Saved voice wav profile: /v/stefan/1/voice.wav",
            "Saved voice safetensors profile: /v/stefan/1/voice.safetensors",
            "All jobs completed.",
        ];
        let observed: Vec<CloneStage> =
            lines.iter().filter_map(|l| tracker.observe_line(l)).collect();
        assert_eq!(
            observed,
            vec![
                CloneStage::ExtractingAudio,
                CloneStage::CloningVoice,
                CloneStage::SavingProfile,
                CloneStage::Finalizing,
            ]
        );
    }
}
