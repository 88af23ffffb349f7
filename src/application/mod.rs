//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（PipelineRunner、VoiceRegistry、DownloadCache）
//! - error: 应用层错误定义
//!
//! 任务编排本身在 infrastructure/worker 中实现，通过这里的端口
//! 访问外部管线与文件系统。

pub mod error;
pub mod ports;

// Re-exports
pub use error::ApplicationError;

pub use ports::{
    // Download cache
    DownloadCachePort,
    // Pipeline runner
    PipelineCommand,
    PipelineError,
    PipelineOutput,
    PipelineRunnerPort,
    // Voice registry
    VoiceRegistryPort,
};
