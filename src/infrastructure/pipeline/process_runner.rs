//! Process Pipeline Runner - 外部管线进程适配器
//!
//! 以子进程方式运行外部克隆管线：不接管 stdin，stdout/stderr
//! 并发读取并按行回传。两个流各自保序，流间交错顺序不保证。

use std::process::Stdio;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;

use super::line_codec::LineCodec;
use crate::application::ports::{
    PipelineCommand, PipelineError, PipelineOutput, PipelineRunnerPort,
};

/// 真实子进程实现
///
/// `kill_on_drop(true)` 保证编排任务被取消时子进程一并结束。
#[derive(Debug, Default)]
pub struct ProcessPipelineRunner;

impl ProcessPipelineRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineRunnerPort for ProcessPipelineRunner {
    async fn run(
        &self,
        command: PipelineCommand,
        lines: mpsc::UnboundedSender<String>,
    ) -> Result<PipelineOutput, PipelineError> {
        tracing::debug!(
            command = %command.display(),
            working_dir = %command.working_dir.display(),
            "spawning clone pipeline"
        );

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&command.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| PipelineError::Spawn(e.to_string()))?;

        // 在独立任务里读两个流，child.wait() 需要 &mut child
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();
        let stdout_lines = lines.clone();
        let stdout_task = tokio::spawn(read_stream(stdout_handle, stdout_lines));
        let stderr_task = tokio::spawn(read_stream(stderr_handle, lines));

        let status = child
            .wait()
            .await
            .map_err(|e| PipelineError::Io(e.to_string()))?;

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();
        let exit_code = status.code().unwrap_or(-1);

        tracing::debug!(exit_code, "clone pipeline exited");

        Ok(PipelineOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}

/// 逐行读取一个输出流
///
/// 每个完成的、去除首尾空白后非空的行发送给 `lines`；同时按行
/// 重组流的全文（行终止统一为 `\n`）用于事后诊断。
async fn read_stream<R: AsyncRead + Unpin>(
    handle: Option<R>,
    lines: mpsc::UnboundedSender<String>,
) -> String {
    let mut full_text = String::new();
    let Some(handle) = handle else {
        return full_text;
    };

    let mut reader = FramedRead::new(handle, LineCodec::new());
    while let Some(result) = reader.next().await {
        match result {
            Ok(line) => {
                full_text.push_str(&line);
                full_text.push('\n');
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    // 接收端掉线不影响读取，继续积累全文
                    let _ = lines.send(trimmed.to_string());
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "pipeline output stream read failed");
                break;
            }
        }
    }
    full_text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sh(script: &str) -> PipelineCommand {
        PipelineCommand {
            program: "/bin/sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            working_dir: std::env::temp_dir(),
        }
    }

    async fn run_collecting(command: PipelineCommand) -> (Vec<String>, PipelineOutput) {
        let runner = ProcessPipelineRunner::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let output = runner.run(command, tx).await.expect("run should succeed");
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        (lines, output)
    }

    #[tokio::test]
    async fn test_captures_lines_in_order() {
        let (lines, output) = run_collecting(sh("printf 'one\\ntwo\\n'; printf 'three\\n'")).await;
        assert_eq!(lines, vec!["one", "two", "three"]);
        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.contains("two"));
    }

    #[tokio::test]
    async fn test_handles_cr_terminators_and_final_fragment() {
        let (lines, _) = run_collecting(sh("printf 'a\\rb\\r\\nc'")).await;
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_blank_lines_are_filtered_and_lines_trimmed() {
        let (lines, _) = run_collecting(sh("printf '  padded  \\n\\n\\nnext\\n'")).await;
        assert_eq!(lines, vec!["padded", "next"]);
    }

    #[tokio::test]
    async fn test_stderr_is_captured_separately() {
        let (lines, output) =
            run_collecting(sh("echo to-stdout; echo to-stderr >&2; exit 3")).await;
        assert!(lines.contains(&"to-stdout".to_string()));
        assert!(lines.contains(&"to-stderr".to_string()));
        assert_eq!(output.exit_code, 3);
        assert!(output.stdout.contains("to-stdout"));
        assert!(!output.stdout.contains("to-stderr"));
        assert!(output.stderr.contains("to-stderr"));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_not_an_exit_code() {
        let runner = ProcessPipelineRunner::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let command = PipelineCommand {
            program: "/nonexistent/clone-pipeline".to_string(),
            args: vec![],
            working_dir: PathBuf::from("/tmp"),
        };
        let result = runner.run(command, tx).await;
        assert!(matches!(result, Err(PipelineError::Spawn(_))));
    }

    #[tokio::test]
    async fn test_channel_closes_after_exit() {
        let runner = ProcessPipelineRunner::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let output = runner.run(sh("printf 'done\\n'"), tx).await.unwrap();
        assert!(output.success());
        assert_eq!(rx.recv().await.as_deref(), Some("done"));
        // 所有发送端随 run 返回而释放
        assert_eq!(rx.recv().await, None);
    }
}
