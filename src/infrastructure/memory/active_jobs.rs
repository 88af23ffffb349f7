//! In-Memory Active Job Registry

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 进行中克隆任务登记表
///
/// 以声音名为键记录正在执行的任务。新版本号取「已有最大版本 + 1」
/// 且没有跨进程锁，同名并发克隆存在竞争窗口；这里只在入口处记一条
/// 告警帮助排查，不拒绝请求。
pub struct ActiveJobs {
    /// voice name -> job_id
    jobs: DashMap<String, Uuid>,
}

impl ActiveJobs {
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 登记一个任务，返回 RAII 守卫，任务结束后自动注销
    pub fn register(self: &Arc<Self>, voice_name: &str, job_id: Uuid) -> ActiveJobGuard {
        if let Some(existing) = self.jobs.insert(voice_name.to_string(), job_id) {
            tracing::warn!(
                voice_name = %voice_name,
                existing_job = %existing,
                new_job = %job_id,
                "Concurrent clone for the same voice, version selection may race"
            );
        }
        ActiveJobGuard {
            registry: Arc::clone(self),
            voice_name: voice_name.to_string(),
            job_id,
        }
    }

    pub fn is_active(&self, voice_name: &str) -> bool {
        self.jobs.contains_key(voice_name)
    }

    pub fn active_count(&self) -> usize {
        self.jobs.len()
    }
}

impl Default for ActiveJobs {
    fn default() -> Self {
        Self::new()
    }
}

/// 任务登记守卫
pub struct ActiveJobGuard {
    registry: Arc<ActiveJobs>,
    voice_name: String,
    job_id: Uuid,
}

impl Drop for ActiveJobGuard {
    fn drop(&mut self) {
        // 同名并发任务会覆盖登记项，仅当登记仍属于本任务时移除
        self.registry
            .jobs
            .remove_if(&self.voice_name, |_, id| *id == self.job_id);
    }
}
