//! Download Cache Port - 下载缓存抽象
//!
//! 缓存文件由外部管线的下载步骤写入；这一侧只负责按来源指纹
//! 清除条目。清除是优化手段而非正确性要求，失败不向上传播。

use async_trait::async_trait;

/// Download Cache Port
#[async_trait]
pub trait DownloadCachePort: Send + Sync {
    /// 尽力删除该来源引用在当前与历史命名方案下的全部缓存文件
    async fn evict(&self, source_reference: &str);
}
