//! Worker Layer - Background Task Processing
//!
//! 实现克隆任务编排器

mod clone_worker;

pub use clone_worker::{ClonePipeline, CloneWorkerConfig};
