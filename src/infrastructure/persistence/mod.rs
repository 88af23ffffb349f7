//! Persistence Layer - 数据持久化
//!
//! 注册表与下载缓存都直接落在文件系统上

pub mod fs;

pub use self::fs::{source_fingerprint, FsDownloadCache, FsVoiceRegistry};
