//! Pipeline 适配器 - 外部克隆管线的进程级实现

mod fake_runner;
mod line_codec;
mod process_runner;

pub use fake_runner::FakePipelineRunner;
pub use line_codec::LineCodec;
pub use process_runner::ProcessPipelineRunner;
