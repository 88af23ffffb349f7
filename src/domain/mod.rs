//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Voice Context: 音色名称/版本与注册表条目
//! - Clone Context: 克隆请求与阶段分类

pub mod clone;
pub mod voice;
