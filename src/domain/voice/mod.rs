//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 音色名称/版本的校验规则
//! - 注册表条目模型

mod entities;
mod value_objects;

pub use entities::VoiceEntry;
pub use value_objects::{VoiceName, VoiceVersion};

/// 版本目录中必须存在的工件文件名
pub const VOICE_ARTIFACT_FILE: &str = "voice.safetensors";

/// 可选的参考音频文件名
pub const VOICE_REFERENCE_WAV: &str = "voice.wav";
