//! Progress Event - 克隆进度事件
//!
//! 编排器到调用方的单向有序事件流。编码为每行一个自描述 JSON
//! 对象（NDJSON），恰好以一个终态事件（result 或 error）收尾。

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::domain::clone::CloneStage;

/// 进度事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// 阶段推进
    Stage { stage: CloneStage, message: String },
    /// 终态: 克隆成功，产物已在注册表中
    Result {
        name: String,
        version: u32,
        location: String,
    },
    /// 终态: 克隆失败
    Error { message: String },
}

impl ProgressEvent {
    /// 以阶段的标准描述构造阶段事件
    pub fn stage(stage: CloneStage) -> Self {
        Self::Stage {
            stage,
            message: stage.label().to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// result 与 error 是终态，一个流里只允许出现一次
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result { .. } | Self::Error { .. })
    }

    /// 编码为一行 NDJSON（含换行符）
    pub fn to_ndjson_line(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(mut line) => {
                line.push('\n');
                Some(line)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to encode progress event");
                None
            }
        }
    }
}

/// 进度事件发送端
///
/// 对无界通道的薄封装：发送永不阻塞，接收端（调用方）断开后
/// 发送静默失败，任务的清理流程不依赖调用方在线。
#[derive(Clone)]
pub struct ProgressSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressSink {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// 建一对已连接的发送端/接收端
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("progress consumer disconnected, event dropped");
        }
    }

    pub fn emit_stage(&self, stage: CloneStage) {
        self.emit(ProgressEvent::stage(stage));
    }
}
