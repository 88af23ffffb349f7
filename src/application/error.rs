//! 应用层错误定义
//!
//! 克隆任务的失败形态各自独立：校验失败从不启动进程，
//! 启动失败不同于非零退出，零退出但找不到产物是单独的不一致错误。

use thiserror::Error;

use crate::domain::clone::CloneRequestError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 请求校验失败（进程未启动）
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部管线无法启动
    #[error("Failed to start clone pipeline: {0}")]
    SpawnError(String),

    /// 外部管线以非零状态退出；tail 是合并输出的有界尾部
    #[error("Clone pipeline exited with status {exit_code}: {tail}")]
    ProcessFailure { exit_code: i32, tail: String },

    /// 管线正常退出但注册表中找不到产出的版本
    #[error("Clone pipeline finished but no voice version was found for '{0}'")]
    ResultNotFound(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建进程失败错误
    pub fn process_failure(exit_code: i32, tail: impl Into<String>) -> Self {
        Self::ProcessFailure {
            exit_code,
            tail: tail.into(),
        }
    }

    /// 创建产物缺失错误
    pub fn result_not_found(voice_name: impl Into<String>) -> Self {
        Self::ResultNotFound(voice_name.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<CloneRequestError> for ApplicationError {
    fn from(err: CloneRequestError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<crate::application::ports::PipelineError> for ApplicationError {
    fn from(err: crate::application::ports::PipelineError) -> Self {
        use crate::application::ports::PipelineError;
        match err {
            PipelineError::Spawn(message) => Self::SpawnError(message),
            PipelineError::Io(message) => Self::InternalError(message),
        }
    }
}
