//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod download_cache;
mod pipeline_runner;
mod voice_registry;

pub use download_cache::DownloadCachePort;
pub use pipeline_runner::{PipelineCommand, PipelineError, PipelineOutput, PipelineRunnerPort};
pub use voice_registry::VoiceRegistryPort;
