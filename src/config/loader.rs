//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 约定的音色注册表目录名
pub const VOICES_DIR_NAME: &str = "voice-clones";

/// 约定的下载缓存目录（相对项目目录）
pub const CACHE_DIR_NAME: &str = "media/downloads";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOCLONE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOCLONE_SERVER__HOST=127.0.0.1`
/// - `VOCLONE_SERVER__PORT=8080`
/// - `VOCLONE_STORAGE__VOICES_ROOT=/data/voice-clones`
/// - `VOCLONE_PIPELINE__COMMAND="uv run python src/pocket_tts_youtube_pipeline.py --skip-generate"`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("storage.max_upload_size", 50 * 1024 * 1024)?
        .set_default(
            "pipeline.command",
            vec![
                "uv",
                "run",
                "python",
                "src/pocket_tts_youtube_pipeline.py",
                "--skip-generate",
            ],
        )?
        .set_default("pipeline.project_marker", "pyproject.toml")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: VOCLONE_
    // 层级分隔符: __ (双下划线)
    // 例如: VOCLONE_STORAGE__VOICES_ROOT=/data/voice-clones
    // pipeline.command 以空格分隔解析为列表
    builder = builder.add_source(
        Environment::with_prefix("VOCLONE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(" ")
            .with_list_parse_key("pipeline.command"),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 验证管线命令
    if config
        .pipeline
        .command
        .first()
        .map(|p| p.trim().is_empty())
        .unwrap_or(true)
    {
        return Err(ConfigError::ValidationError(
            "Pipeline command cannot be empty".to_string(),
        ));
    }

    // 验证上传上限
    if config.storage.max_upload_size == 0 {
        return Err(ConfigError::ValidationError(
            "Max upload size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 从 start 目录开始向上查找包含 marker 文件的项目根
pub fn find_project_root_from(start: &Path, marker: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(marker).is_file() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

/// 解析一个存储根目录
///
/// 显式配置优先；否则在 cwd 及其父目录中寻找约定子目录，
/// 都不存在时回退为 cwd 相对的约定路径（由管线首次运行时创建）。
pub fn resolve_storage_root(
    configured: Option<&Path>,
    conventional: &str,
    cwd: &Path,
) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }

    let local = cwd.join(conventional);
    if local.is_dir() {
        return local;
    }
    if let Some(parent) = cwd.parent() {
        let sibling = parent.join(conventional);
        if sibling.is_dir() {
            return sibling;
        }
    }
    local
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    match &config.storage.voices_root {
        Some(root) => tracing::info!("Voices Root: {:?}", root),
        None => tracing::info!("Voices Root: <auto-discover {}>", VOICES_DIR_NAME),
    }
    match &config.storage.cache_root {
        Some(root) => tracing::info!("Cache Root: {:?}", root),
        None => tracing::info!("Cache Root: <auto-discover {}>", CACHE_DIR_NAME),
    }
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!("Pipeline Command: {}", config.pipeline.command.join(" "));
    tracing::info!("Project Marker: {}", config.pipeline.project_marker);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5080);
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_pipeline_command() {
        let mut config = AppConfig::default();
        config.pipeline.command = vec![];
        assert!(validate_config(&config).is_err());

        config.pipeline.command = vec!["  ".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_find_project_root_walks_up() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("pyproject.toml"), b"").unwrap();
        let nested = root.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_project_root_from(&nested, "pyproject.toml").unwrap();
        // tempdir 路径可能含符号链接，比较标记文件本身
        assert!(found.join("pyproject.toml").is_file());
        assert!(found.ends_with(root.path().file_name().unwrap()));
    }

    #[test]
    fn test_find_project_root_missing_marker() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(find_project_root_from(root.path(), "pyproject.toml"), None);
    }

    #[test]
    fn test_resolve_storage_root_prefers_configured() {
        let cwd = tempfile::tempdir().unwrap();
        let configured = PathBuf::from("/data/voice-clones");
        let resolved = resolve_storage_root(Some(&configured), VOICES_DIR_NAME, cwd.path());
        assert_eq!(resolved, configured);
    }

    #[test]
    fn test_resolve_storage_root_finds_local_then_parent() {
        let parent = tempfile::tempdir().unwrap();
        let cwd = parent.path().join("app");
        std::fs::create_dir_all(&cwd).unwrap();

        // cwd 和父目录都没有约定目录: 回退到 cwd 相对路径
        let resolved = resolve_storage_root(None, VOICES_DIR_NAME, &cwd);
        assert_eq!(resolved, cwd.join(VOICES_DIR_NAME));

        // 父目录中存在: 用父目录的
        std::fs::create_dir_all(parent.path().join(VOICES_DIR_NAME)).unwrap();
        let resolved = resolve_storage_root(None, VOICES_DIR_NAME, &cwd);
        assert_eq!(resolved, parent.path().join(VOICES_DIR_NAME));

        // cwd 中也存在: cwd 优先
        std::fs::create_dir_all(cwd.join(VOICES_DIR_NAME)).unwrap();
        let resolved = resolve_storage_root(None, VOICES_DIR_NAME, &cwd);
        assert_eq!(resolved, cwd.join(VOICES_DIR_NAME));
    }
}
