//! Fs Voice Registry - 文件系统音色注册表
//!
//! 目录布局 `<root>/<name>/<version>/voice.safetensors`，由外部
//! 管线写入。这里只读：枚举、过滤、排序。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;

use crate::application::ports::VoiceRegistryPort;
use crate::domain::voice::{
    VoiceEntry, VoiceName, VoiceVersion, VOICE_ARTIFACT_FILE, VOICE_REFERENCE_WAV,
};

/// 文件系统注册表
pub struct FsVoiceRegistry {
    /// 注册表根目录；缺失视为空注册表
    root: PathBuf,
}

impl FsVoiceRegistry {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 某个名称目录下所有存在工件的版本条目
    async fn versions_of(&self, name: &str, name_dir: &Path) -> Vec<VoiceEntry> {
        let mut entries = Vec::new();
        for (dir_name, version_dir) in read_subdirs(name_dir).await {
            let Some(version) = VoiceVersion::parse(&dir_name) else {
                continue;
            };
            let artifact_path = version_dir.join(VOICE_ARTIFACT_FILE);
            let Ok(metadata) = fs::metadata(&artifact_path).await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let modified_at = metadata.modified().ok().map(DateTime::<Utc>::from);
            let has_reference_wav = fs::metadata(version_dir.join(VOICE_REFERENCE_WAV))
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            entries.push(VoiceEntry {
                name: name.to_string(),
                version,
                artifact_path,
                has_reference_wav,
                modified_at,
            });
        }
        entries
    }
}

#[async_trait]
impl VoiceRegistryPort for FsVoiceRegistry {
    async fn list_voices(&self) -> Vec<VoiceEntry> {
        let mut entries = Vec::new();
        for (dir_name, name_dir) in read_subdirs(&self.root).await {
            // 谓词只过滤不改写，手工创建的目录名按原样上报
            if !VoiceName::is_valid(&dir_name) {
                continue;
            }
            entries.extend(self.versions_of(&dir_name, &name_dir).await);
        }
        // 名称升序（不区分大小写），同名内版本降序
        entries.sort_by(|a, b| {
            a.name
                .to_ascii_lowercase()
                .cmp(&b.name.to_ascii_lowercase())
                .then(b.version.cmp(&a.version))
        });
        entries
    }

    async fn resolve_latest_version(&self, name: &VoiceName) -> Option<VoiceVersion> {
        let name_dir = self.root.join(name.as_str());
        self.versions_of(name.as_str(), &name_dir)
            .await
            .into_iter()
            .map(|entry| entry.version)
            .max()
    }
}

/// 列出一个目录的全部子目录；目录缺失或不可读一律视为空
async fn read_subdirs(path: &Path) -> Vec<(String, PathBuf)> {
    let mut subdirs = Vec::new();
    let Ok(mut reader) = fs::read_dir(path).await else {
        return subdirs;
    };
    while let Ok(Some(entry)) = reader.next_entry().await {
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let Some(dir_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        subdirs.push((dir_name, entry.path()));
    }
    subdirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn put_version(root: &Path, name: &str, version: &str, with_artifact: bool) {
        let dir = root.join(name).join(version);
        fs::create_dir_all(&dir).await.unwrap();
        if with_artifact {
            fs::write(dir.join(VOICE_ARTIFACT_FILE), b"").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_list_sorted_name_asc_version_desc() {
        let temp = tempdir().unwrap();
        put_version(temp.path(), "zed", "1", true).await;
        put_version(temp.path(), "alpha", "2", true).await;
        put_version(temp.path(), "alpha", "10", true).await;

        let registry = FsVoiceRegistry::new(temp.path());
        let entries = registry.list_voices().await;
        let listed: Vec<(String, u32)> = entries
            .iter()
            .map(|e| (e.name.to_string(), e.version.get()))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("alpha".to_string(), 10),
                ("alpha".to_string(), 2),
                ("zed".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_listing_preserves_directory_casing() {
        let temp = tempdir().unwrap();
        put_version(temp.path(), "Stefan", "1", true).await;
        put_version(temp.path(), "alpha", "1", true).await;

        let registry = FsVoiceRegistry::new(temp.path());
        let entries = registry.list_voices().await;
        let listed: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        // 目录名不做小写化，排序不区分大小写
        assert_eq!(listed, vec!["alpha", "Stefan"]);
    }

    #[tokio::test]
    async fn test_version_without_artifact_is_omitted() {
        let temp = tempdir().unwrap();
        put_version(temp.path(), "stefan", "1", true).await;
        put_version(temp.path(), "stefan", "2", false).await;

        let registry = FsVoiceRegistry::new(temp.path());
        let entries = registry.list_voices().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].version.get(), 1);
        assert_eq!(
            registry
                .resolve_latest_version(&VoiceName::new("stefan").unwrap())
                .await
                .map(|v| v.get()),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_invalid_names_and_versions_are_skipped() {
        let temp = tempdir().unwrap();
        put_version(temp.path(), "bad-name", "1", true).await;
        put_version(temp.path(), "good_name", "01", true).await;
        put_version(temp.path(), "good_name", "0", true).await;
        put_version(temp.path(), "good_name", "v2", true).await;
        put_version(temp.path(), "good_name", "3", true).await;

        let registry = FsVoiceRegistry::new(temp.path());
        let entries = registry.list_voices().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name.as_str(), "good_name");
        assert_eq!(entries[0].version.get(), 3);
    }

    #[tokio::test]
    async fn test_missing_root_is_empty() {
        let registry = FsVoiceRegistry::new("/nonexistent/voclone-registry");
        assert!(registry.list_voices().await.is_empty());
        assert_eq!(
            registry
                .resolve_latest_version(&VoiceName::new("stefan").unwrap())
                .await,
            None
        );
    }

    #[tokio::test]
    async fn test_reference_wav_flag() {
        let temp = tempdir().unwrap();
        put_version(temp.path(), "stefan", "1", true).await;
        fs::write(
            temp.path().join("stefan/1").join(VOICE_REFERENCE_WAV),
            b"wav",
        )
        .await
        .unwrap();
        put_version(temp.path(), "stefan", "2", true).await;

        let registry = FsVoiceRegistry::new(temp.path());
        let entries = registry.list_voices().await;
        // 版本降序: [2, 1]
        assert!(!entries[0].has_reference_wav);
        assert!(entries[1].has_reference_wav);
    }

    #[tokio::test]
    async fn test_plain_files_in_root_are_ignored() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("stray.txt"), b"x").await.unwrap();
        put_version(temp.path(), "stefan", "1", true).await;

        let registry = FsVoiceRegistry::new(temp.path());
        assert_eq!(registry.list_voices().await.len(), 1);
    }
}
