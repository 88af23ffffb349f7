//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod events;
pub mod http;
pub mod memory;
pub mod persistence;
pub mod pipeline;
pub mod worker;

pub use events::{ProgressEvent, ProgressSink, ProgressStreamReader};
pub use memory::ActiveJobs;
pub use pipeline::ProcessPipelineRunner;
pub use worker::{ClonePipeline, CloneWorkerConfig};
