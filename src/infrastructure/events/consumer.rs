//! Progress Stream Reader - 进度流解析器
//!
//! 消费端对 NDJSON 进度流的增量解析：按换行切分、逐行解码、
//! 静默跳过无法识别的行（前向兼容），并校验流以终态事件收尾。

use thiserror::Error;

use super::progress::ProgressEvent;

/// 流在终态事件之前结束
#[derive(Debug, Error, PartialEq)]
#[error("progress stream ended without a result or error event")]
pub struct ProtocolViolation;

/// 增量 NDJSON 解析器
///
/// 字节块边界与事件边界无关：半行以原始字节缓存到下一个块，
/// 凑成整行才做 UTF-8 解码，跨块拆开的多字节字符不会损坏；
/// 末尾无换行的最后一行由 [`finish`](Self::finish) 收尾。
#[derive(Debug, Default)]
pub struct ProgressStreamReader {
    buffer: Vec<u8>,
    saw_terminal: bool,
}

impl ProgressStreamReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 喂入一块字节，返回其中完整解码出的事件
    pub fn push(&mut self, chunk: &[u8]) -> Vec<ProgressEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = self.decode_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    /// 流结束：解码未换行的残余行并校验终态事件已出现
    pub fn finish(mut self) -> Result<Vec<ProgressEvent>, ProtocolViolation> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            if let Some(event) = self.decode_line(&String::from_utf8_lossy(&rest)) {
                events.push(event);
            }
        }
        if self.saw_terminal {
            Ok(events)
        } else {
            Err(ProtocolViolation)
        }
    }

    fn decode_line(&mut self, line: &str) -> Option<ProgressEvent> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<ProgressEvent>(trimmed) {
            Ok(event) => {
                if event.is_terminal() {
                    self.saw_terminal = true;
                }
                Some(event)
            }
            Err(e) => {
                // 无法识别的行按协议跳过，保留日志便于排查
                tracing::debug!(error = %e, line = trimmed, "skipping unrecognized progress line");
                None
            }
        }
    }
}
