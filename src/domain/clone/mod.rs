//! Clone Context - 克隆任务限界上下文
//!
//! 职责:
//! - 请求校验（名称 / 来源 / 剪辑窗口）
//! - 生命周期阶段与输出行启发式分类

mod classifier;
mod request;
mod stage;
mod timecode;

pub use classifier::{classify, StageTracker, STAGE_TRIGGERS};
pub use request::{
    is_supported_source_extension, CloneRequest, CloneRequestError, CloneSource,
    SUPPORTED_SOURCE_EXTENSIONS,
};
pub use stage::CloneStage;
pub use timecode::{parse_timecode, validate_window, TimecodeError};
