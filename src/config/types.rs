//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 克隆管线配置
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            pipeline: PipelineConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 音色注册表根目录；未设置时按约定目录自动发现
    #[serde(default)]
    pub voices_root: Option<PathBuf>,

    /// 下载缓存根目录；未设置时按约定目录自动发现
    #[serde(default)]
    pub cache_root: Option<PathBuf>,

    /// 上传文件最大大小（字节）
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_max_upload_size() -> u64 {
    50 * 1024 * 1024 // 50 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            voices_root: None,
            cache_root: None,
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 克隆管线配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// 管线命令（程序 + 前置参数；任务参数由编排器追加）
    #[serde(default = "default_pipeline_command")]
    pub command: Vec<String>,

    /// 项目根标记文件；管线以向上查找到的项目根为工作目录
    #[serde(default = "default_project_marker")]
    pub project_marker: String,
}

fn default_pipeline_command() -> Vec<String> {
    [
        "uv",
        "run",
        "python",
        "src/pocket_tts_youtube_pipeline.py",
        "--skip-generate",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_project_marker() -> String {
    "pyproject.toml".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            command: default_pipeline_command(),
            project_marker: default_project_marker(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
