//! Voclone - 音色克隆任务编排服务
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 音色名称/版本规则与注册表条目
//! - Clone Context: 克隆请求校验、生命周期阶段与输出分类
//!
//! 应用层 (application/):
//! - Ports: 端口定义（PipelineRunner, VoiceRegistry, DownloadCache）
//! - Error: 克隆任务的结局划分
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + NDJSON 进度流
//! - Pipeline: 外部克隆管线子进程运行器
//! - Worker: 克隆任务编排器
//! - Persistence: 文件系统注册表与下载缓存
//! - Memory: 进行中任务登记
//! - Events: 进度事件协议（编码与消费端解析）

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
