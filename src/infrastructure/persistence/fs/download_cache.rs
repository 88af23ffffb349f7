//! Fs Download Cache - 文件系统下载缓存
//!
//! 缓存文件由外部管线的下载步骤写入，文件名形如
//! `source_<指纹>.<扩展名>`；早期版本使用 `youtube_` 前缀，
//! 清除时两种命名都要覆盖。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::application::ports::DownloadCachePort;

/// 当前缓存文件名前缀
pub const CACHE_STEM_PREFIX: &str = "source_";

/// 历史缓存文件名前缀
pub const LEGACY_CACHE_STEM_PREFIX: &str = "youtube_";

/// 来源引用的内容指纹
///
/// 去除首尾空白后取 SHA-256 十六进制摘要的前 20 个字符，
/// 与外部管线的缓存键算法一致。
pub fn source_fingerprint(reference: &str) -> String {
    let digest = Sha256::digest(reference.trim().as_bytes());
    let mut hex = format!("{digest:x}");
    hex.truncate(20);
    hex
}

/// 文件系统下载缓存
pub struct FsDownloadCache {
    root: PathBuf,
}

impl FsDownloadCache {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DownloadCachePort for FsDownloadCache {
    async fn evict(&self, source_reference: &str) {
        let fingerprint = source_fingerprint(source_reference);
        let stems = [
            format!("{CACHE_STEM_PREFIX}{fingerprint}"),
            format!("{LEGACY_CACHE_STEM_PREFIX}{fingerprint}"),
        ];

        let Ok(mut reader) = fs::read_dir(&self.root).await else {
            tracing::debug!(root = %self.root.display(), "cache root unreadable, nothing to evict");
            return;
        };

        while let Ok(Some(entry)) = reader.next_entry().await {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if !stems.iter().any(|stem| stem_matches(file_name, stem)) {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => {
                    tracing::info!(file = file_name, "evicted cached download");
                }
                Err(e) => {
                    tracing::warn!(file = file_name, error = %e, "cache eviction failed");
                }
            }
        }
    }
}

/// 文件名主干是否等于 stem（允许任意扩展名，含多段扩展名）
fn stem_matches(file_name: &str, stem: &str) -> bool {
    match file_name.strip_prefix(stem) {
        Some("") => true,
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fingerprint_is_deterministic_and_trimmed() {
        let url = "https://example.com/watch?v=abc";
        assert_eq!(source_fingerprint(url), source_fingerprint(url));
        assert_eq!(source_fingerprint(url), source_fingerprint("  https://example.com/watch?v=abc \n"));
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = source_fingerprint("hello");
        assert_eq!(fp.len(), 20);
        assert!(fp.bytes().all(|b| b.is_ascii_hexdigit()));
        // sha256("hello") 的前 20 个十六进制字符
        assert_eq!(fp, "2cf24dba5fb0a30e26e8");
    }

    #[test]
    fn test_distinct_references_get_distinct_fingerprints() {
        assert_ne!(
            source_fingerprint("https://example.com/a"),
            source_fingerprint("https://example.com/b")
        );
    }

    #[test]
    fn test_stem_matching() {
        assert!(stem_matches("source_abc.mp3", "source_abc"));
        assert!(stem_matches("source_abc.info.json", "source_abc"));
        assert!(stem_matches("source_abc", "source_abc"));
        assert!(!stem_matches("source_abcd.mp3", "source_abc"));
        assert!(!stem_matches("source_ab.mp3", "source_abc"));
    }

    #[tokio::test]
    async fn test_evict_removes_both_naming_schemes() {
        let temp = tempdir().unwrap();
        let url = "https://example.com/watch?v=abc";
        let fp = source_fingerprint(url);
        let other_fp = source_fingerprint("https://example.com/other");

        for name in [
            format!("source_{fp}.mp3"),
            format!("youtube_{fp}.mp3"),
            format!("source_{other_fp}.mp3"),
        ] {
            fs::write(temp.path().join(name), b"audio").await.unwrap();
        }

        let cache = FsDownloadCache::new(temp.path());
        cache.evict(url).await;

        assert!(!temp.path().join(format!("source_{fp}.mp3")).exists());
        assert!(!temp.path().join(format!("youtube_{fp}.mp3")).exists());
        assert!(temp.path().join(format!("source_{other_fp}.mp3")).exists());
    }

    #[tokio::test]
    async fn test_evict_missing_root_is_a_no_op() {
        let cache = FsDownloadCache::new("/nonexistent/voclone-cache");
        cache.evict("https://example.com/watch?v=abc").await;
    }
}
