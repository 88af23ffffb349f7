//! Application State

use std::sync::Arc;

use crate::application::ports::VoiceRegistryPort;
use crate::infrastructure::worker::ClonePipeline;

/// 应用状态
///
/// 注册表端口供查询类接口直接使用；克隆编排器自身持有
/// 管线运行器、下载缓存与任务登记表。
pub struct AppState {
    pub registry: Arc<dyn VoiceRegistryPort>,
    pub worker: Arc<ClonePipeline>,
}

impl AppState {
    pub fn new(registry: Arc<dyn VoiceRegistryPort>, worker: Arc<ClonePipeline>) -> Self {
        Self { registry, worker }
    }
}
