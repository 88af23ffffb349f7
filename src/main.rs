//! Voclone - 音色克隆任务编排服务
//!
//! 架构:
//! - Domain: voice/, clone/ (Bounded Contexts)
//! - Application: ports, error
//! - Infrastructure: http, pipeline, worker, persistence, memory, events

use std::sync::Arc;

use voclone::application::ports::VoiceRegistryPort;
use voclone::config::{
    find_project_root_from, load_config, print_config, resolve_storage_root, CACHE_DIR_NAME,
    VOICES_DIR_NAME,
};
use voclone::infrastructure::http::{AppState, HttpServer, ServerConfig};
use voclone::infrastructure::memory::ActiveJobs;
use voclone::infrastructure::persistence::{FsDownloadCache, FsVoiceRegistry};
use voclone::infrastructure::pipeline::ProcessPipelineRunner;
use voclone::infrastructure::worker::{ClonePipeline, CloneWorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},voclone={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Voclone - 音色克隆任务编排服务");
    print_config(&config);

    // 解析存储根目录（显式配置优先，其次按约定目录自动发现）
    let cwd = std::env::current_dir()?;
    let voices_root = resolve_storage_root(
        config.storage.voices_root.as_deref(),
        VOICES_DIR_NAME,
        &cwd,
    );
    let cache_root =
        resolve_storage_root(config.storage.cache_root.as_deref(), CACHE_DIR_NAME, &cwd);
    tracing::info!("Resolved voices root: {:?}", voices_root);
    tracing::info!("Resolved cache root: {:?}", cache_root);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&voices_root).await?;
    tokio::fs::create_dir_all(&cache_root).await?;

    // 管线工作目录：向上查找项目根，找不到则留在当前目录
    let working_dir = match find_project_root_from(&cwd, &config.pipeline.project_marker) {
        Some(root) => {
            tracing::info!("Pipeline project root: {:?}", root);
            root
        }
        None => {
            tracing::warn!(
                marker = %config.pipeline.project_marker,
                "Project marker not found in any parent directory, running pipeline from cwd"
            );
            cwd.clone()
        }
    };

    // 创建适配器
    let registry: Arc<dyn VoiceRegistryPort> = Arc::new(FsVoiceRegistry::new(&voices_root));
    let runner = Arc::new(ProcessPipelineRunner::new());
    let cache = Arc::new(FsDownloadCache::new(&cache_root));
    let active_jobs = ActiveJobs::new().arc();

    // 创建克隆编排器
    let worker_config = CloneWorkerConfig {
        voices_root: voices_root.clone(),
        command: config.pipeline.command.clone(),
        working_dir,
    };
    let worker = ClonePipeline::new(
        worker_config,
        runner,
        registry.clone(),
        cache,
        active_jobs,
    )
    .arc();

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        config.storage.max_upload_size as usize,
    );
    let state = AppState::new(registry, worker);
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
