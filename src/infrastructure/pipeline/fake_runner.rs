//! Fake Pipeline Runner - 用于测试的管线适配器
//!
//! 回放预设的输出行与退出结果，不真正启动子进程；
//! 同时记录每次调用的完整命令，供测试断言。

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::application::ports::{
    PipelineCommand, PipelineError, PipelineOutput, PipelineRunnerPort,
};

/// Fake Pipeline Runner
pub struct FakePipelineRunner {
    lines: Vec<String>,
    exit_code: i32,
    stderr: String,
    spawn_error: Option<String>,
    /// run 时创建的工件文件（模拟外部管线写注册表的副作用）
    artifact: Option<PathBuf>,
    invocations: Mutex<Vec<PipelineCommand>>,
}

impl FakePipelineRunner {
    /// 成功退出，按顺序回放给定输出行
    pub fn succeeding(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            exit_code: 0,
            stderr: String::new(),
            spawn_error: None,
            artifact: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// 以非零状态退出，stderr 为给定文本
    pub fn failing(exit_code: i32, stderr: &str) -> Self {
        Self {
            lines: Vec::new(),
            exit_code,
            stderr: stderr.to_string(),
            spawn_error: None,
            artifact: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// 模拟进程无法启动
    pub fn failing_to_spawn(message: &str) -> Self {
        Self {
            lines: Vec::new(),
            exit_code: -1,
            stderr: String::new(),
            spawn_error: Some(message.to_string()),
            artifact: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// run 成功前在该路径创建空工件文件（含父目录）
    pub fn with_artifact(mut self, path: PathBuf) -> Self {
        self.artifact = Some(path);
        self
    }

    /// 已记录的调用命令
    pub async fn invocations(&self) -> Vec<PipelineCommand> {
        self.invocations.lock().await.clone()
    }
}

#[async_trait]
impl PipelineRunnerPort for FakePipelineRunner {
    async fn run(
        &self,
        command: PipelineCommand,
        lines: mpsc::UnboundedSender<String>,
    ) -> Result<PipelineOutput, PipelineError> {
        self.invocations.lock().await.push(command);

        if let Some(message) = &self.spawn_error {
            return Err(PipelineError::Spawn(message.clone()));
        }

        for line in &self.lines {
            let _ = lines.send(line.clone());
        }

        if let Some(artifact) = &self.artifact {
            if let Some(parent) = artifact.parent() {
                let _ = tokio::fs::create_dir_all(parent).await;
            }
            let _ = tokio::fs::write(artifact, b"").await;
        }

        Ok(PipelineOutput {
            exit_code: self.exit_code,
            stdout: self.lines.join("\n"),
            stderr: self.stderr.clone(),
        })
    }
}
