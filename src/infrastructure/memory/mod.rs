//! Memory Layer - In-Memory State Management
//!
//! 管理进行中克隆任务的内存登记

mod active_jobs;

pub use active_jobs::{ActiveJobGuard, ActiveJobs};
