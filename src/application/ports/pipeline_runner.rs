//! Pipeline Runner Port - 外部克隆管线抽象
//!
//! 外部管线被当作不透明程序：接收参数，向两个输出流写自由文本，
//! 以退出码结束。具体实现在 infrastructure/pipeline 层。

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// 管线运行错误
///
/// 启动失败必须与"运行后失败"区分开，后者通过 `PipelineOutput`
/// 的非零退出码表达。
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to spawn pipeline process: {0}")]
    Spawn(String),

    #[error("pipeline I/O error: {0}")]
    Io(String),
}

/// 一次管线调用的完整命令
#[derive(Debug, Clone)]
pub struct PipelineCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl PipelineCommand {
    /// 日志用的单行命令描述
    pub fn display(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

/// 管线进程结束后的汇总输出
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// 进程退出码；异常终止时为 -1
    pub exit_code: i32,
    /// stdout 全文（与行回调无关，独立保留）
    pub stdout: String,
    /// stderr 全文
    pub stderr: String,
}

impl PipelineOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// 合并输出的末尾若干行，用于失败报告
    ///
    /// 与外部管线的诊断习惯一致：stderr 在前、stdout 在后，
    /// 去除首尾空白后取最后 `max_lines` 行。
    pub fn combined_tail(&self, max_lines: usize) -> String {
        let combined = format!("{}\n{}", self.stderr.trim(), self.stdout.trim());
        let combined = combined.trim();
        let lines: Vec<&str> = combined.lines().collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// Pipeline Runner Port
///
/// 启动外部管线并以行为单位回传输出。每个完成的、去除首尾空白后
/// 非空的行按所在流内的顺序送入 `lines`；两个流之间的交错顺序
/// 不作保证。发送端在进程结束后关闭。
#[async_trait]
pub trait PipelineRunnerPort: Send + Sync {
    async fn run(
        &self,
        command: PipelineCommand,
        lines: mpsc::UnboundedSender<String>,
    ) -> Result<PipelineOutput, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_tail_is_bounded() {
        let output = PipelineOutput {
            exit_code: 1,
            stdout: (1..=30).map(|i| format!("out {i}\n")).collect(),
            stderr: "model download failed\n".to_string(),
        };
        let tail = output.combined_tail(25);
        assert_eq!(tail.lines().count(), 25);
        assert!(tail.ends_with("out 30"));
    }

    #[test]
    fn test_combined_tail_puts_stderr_first() {
        let output = PipelineOutput {
            exit_code: 1,
            stdout: "some stdout\n".to_string(),
            stderr: "model download failed\n".to_string(),
        };
        assert_eq!(output.combined_tail(25), "model download failed\nsome stdout");
    }

    #[test]
    fn test_combined_tail_empty_output() {
        let output = PipelineOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(output.combined_tail(25), "");
    }
}
