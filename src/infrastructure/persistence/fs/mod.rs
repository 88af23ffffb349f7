//! 文件系统存储实现

mod download_cache;
mod voice_registry;

pub use download_cache::{
    source_fingerprint, FsDownloadCache, CACHE_STEM_PREFIX, LEGACY_CACHE_STEM_PREFIX,
};
pub use voice_registry::FsVoiceRegistry;
