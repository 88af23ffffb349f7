//! Clone Worker - Voice Clone Job Orchestrator
//!
//! 每个请求对应一次完整的任务生命周期：校验 → 暂存 → 启动外部
//! 管线 → 输出分类 → 终态汇报。所有结局都收敛为恰好一个终态
//! 事件，清理不依赖调用方是否仍在接收。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    DownloadCachePort, PipelineCommand, PipelineRunnerPort, VoiceRegistryPort,
};
use crate::domain::clone::{CloneRequest, CloneSource, CloneStage, StageTracker};
use crate::domain::voice::{VoiceName, VOICE_ARTIFACT_FILE};
use crate::infrastructure::events::{ProgressEvent, ProgressSink};
use crate::infrastructure::memory::ActiveJobs;

/// 失败汇报携带的合并输出末尾行数
const ERROR_TAIL_LINES: usize = 25;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct CloneWorkerConfig {
    /// 音色注册表根目录
    pub voices_root: PathBuf,
    /// 外部管线命令（程序及其前置参数，任务参数追加在后）
    pub command: Vec<String>,
    /// 管线进程的工作目录
    pub working_dir: PathBuf,
}

/// 克隆任务编排器
pub struct ClonePipeline {
    config: CloneWorkerConfig,
    runner: Arc<dyn PipelineRunnerPort>,
    registry: Arc<dyn VoiceRegistryPort>,
    cache: Arc<dyn DownloadCachePort>,
    active_jobs: Arc<ActiveJobs>,
}

impl ClonePipeline {
    pub fn new(
        config: CloneWorkerConfig,
        runner: Arc<dyn PipelineRunnerPort>,
        registry: Arc<dyn VoiceRegistryPort>,
        cache: Arc<dyn DownloadCachePort>,
        active_jobs: Arc<ActiveJobs>,
    ) -> Self {
        Self {
            config,
            runner,
            registry,
            cache,
            active_jobs,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 执行一次克隆任务
    ///
    /// 终态事件（result 或 error）恰好发出一次，同时作为返回值
    /// 交给调用方。所有内部错误都折叠进终态，不向外抛。
    pub async fn run_job(&self, request: CloneRequest, sink: ProgressSink) -> ProgressEvent {
        let job_id = Uuid::new_v4();
        let terminal = match self.execute(job_id, &request, &sink).await {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(
                    job_id = %job_id,
                    voice = %request.voice_name,
                    error = %e,
                    "Clone job failed"
                );
                ProgressEvent::error(e.to_string())
            }
        };
        sink.emit(terminal.clone());
        terminal
    }

    async fn execute(
        &self,
        job_id: Uuid,
        request: &CloneRequest,
        sink: &ProgressSink,
    ) -> Result<ProgressEvent, ApplicationError> {
        // 1. 校验：任何失败都发生在进程启动之前
        let name = request.validate()?;

        // 2. 上传来源先落盘到临时目录；TempDir 守卫持有到函数返回，
        //    任何退出路径（含调用方断开）都会清理
        let staged = match &request.source {
            CloneSource::Upload { file_name, data } => {
                Some(Self::stage_upload(file_name, data).await?)
            }
            CloneSource::Url(_) => None,
        };

        let _job_guard = self.active_jobs.register(name.as_str(), job_id);

        tracing::info!(
            job_id = %job_id,
            voice = %name,
            source = %request.source.describe(),
            "Clone job started"
        );

        // 3. starting 先行，再按来源推进到初始阶段
        let mut tracker = StageTracker::new(CloneStage::Starting);
        sink.emit_stage(CloneStage::Starting);
        let initial = if request.source.is_url() {
            CloneStage::DownloadingMedia
        } else {
            CloneStage::ExtractingAudio
        };
        if let Some(stage) = tracker.advance_to(initial) {
            sink.emit_stage(stage);
        }

        // 4. 运行管线，同时消费输出行做阶段分类
        let command =
            self.build_command(&name, request, staged.as_ref().map(|(_, p)| p.as_path()))?;
        let (line_tx, mut line_rx) = mpsc::unbounded_channel();
        let run = self.runner.run(command, line_tx);
        let classify = async {
            while let Some(line) = line_rx.recv().await {
                if let Some(stage) = tracker.observe_line(&line) {
                    tracing::debug!(job_id = %job_id, stage = %stage, "Stage advanced");
                    sink.emit_stage(stage);
                }
            }
        };
        let (output, ()) = tokio::join!(run, classify);
        let output = output?;

        // 5. 非零退出：带合并输出的有界尾部
        if !output.success() {
            return Err(ApplicationError::process_failure(
                output.exit_code,
                output.combined_tail(ERROR_TAIL_LINES),
            ));
        }

        // 6. 成功后按需清退下载缓存（仅 URL 来源有缓存条目）
        if request.no_cache {
            if let CloneSource::Url(url) = &request.source {
                self.cache.evict(url).await;
            }
        }

        // 7. 从注册表解析管线产出的版本
        let version = self
            .registry
            .resolve_latest_version(&name)
            .await
            .ok_or_else(|| ApplicationError::result_not_found(name.as_str()))?;

        let location = self
            .config
            .voices_root
            .join(name.as_str())
            .join(version.to_string())
            .join(VOICE_ARTIFACT_FILE);

        tracing::info!(
            job_id = %job_id,
            voice = %name,
            version = %version,
            "Clone job completed"
        );

        Ok(ProgressEvent::Result {
            name: name.to_string(),
            version: version.get(),
            location: location.display().to_string(),
        })
    }

    /// 把上传的字节写入新建的临时目录，返回 (守卫, 落盘路径)
    async fn stage_upload(
        file_name: &str,
        data: &[u8],
    ) -> Result<(TempDir, PathBuf), ApplicationError> {
        let staging = tempfile::Builder::new()
            .prefix("voclone-upload-")
            .tempdir()
            .map_err(|e| {
                ApplicationError::internal(format!("failed to create staging directory: {e}"))
            })?;

        // 只保留文件名部分，调用方提供的路径前缀不落入暂存目录
        let safe_name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.wav");
        let staged_path = staging.path().join(safe_name);

        tokio::fs::write(&staged_path, data).await.map_err(|e| {
            ApplicationError::internal(format!("failed to stage uploaded audio: {e}"))
        })?;

        tracing::debug!(
            path = %staged_path.display(),
            bytes = data.len(),
            "Uploaded source staged"
        );
        Ok((staging, staged_path))
    }

    fn build_command(
        &self,
        name: &VoiceName,
        request: &CloneRequest,
        staged_source: Option<&Path>,
    ) -> Result<PipelineCommand, ApplicationError> {
        let (program, leading) = self
            .config
            .command
            .split_first()
            .ok_or_else(|| ApplicationError::internal("pipeline command is not configured"))?;

        let mut args: Vec<String> = leading.to_vec();
        args.push("--output-root".to_string());
        args.push(self.config.voices_root.display().to_string());
        args.push("--voice".to_string());
        args.push(name.to_string());
        if let Some(start) = &request.start {
            args.push("--start".to_string());
            args.push(start.clone());
        }
        if let Some(end) = &request.end {
            args.push("--end".to_string());
            args.push(end.clone());
        }
        match (&request.source, staged_source) {
            (CloneSource::Url(url), _) => {
                args.push("--source-url".to_string());
                args.push(url.trim().to_string());
            }
            (CloneSource::Upload { .. }, Some(path)) => {
                args.push("--source-file".to_string());
                args.push(path.display().to_string());
            }
            (CloneSource::Upload { .. }, None) => {
                return Err(ApplicationError::internal("uploaded source was not staged"));
            }
        }

        Ok(PipelineCommand {
            program: program.clone(),
            args,
            working_dir: self.config.working_dir.clone(),
        })
    }
}
