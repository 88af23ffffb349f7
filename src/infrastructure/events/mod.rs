//! Events - 进度事件协议

pub mod consumer;
pub mod progress;

pub use consumer::{ProgressStreamReader, ProtocolViolation};
pub use progress::{ProgressEvent, ProgressSink};
