//! 清理器与缓存的组合入口，供 HTTP 层直接调用。

use std::sync::Arc;
use std::time::Duration;

use crate::cache::ListingCache;
use crate::error::Result;
use crate::reader::{DirectoryReader, Listing};
use crate::sanitize::PathSanitizer;

/// 相册目录浏览服务。进程启动时创建一次，由所有请求共享。
pub struct Gallery {
    sanitizer: PathSanitizer,
    cache: ListingCache,
}

impl Gallery {
    pub fn new(
        sanitizer: PathSanitizer,
        reader: Arc<dyn DirectoryReader>,
        freshness: Duration,
    ) -> Self {
        Self {
            sanitizer,
            cache: ListingCache::new(reader, freshness),
        }
    }

    pub fn sanitizer(&self) -> &PathSanitizer {
        &self.sanitizer
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    /// 列出调用方路径对应的目录。
    pub async fn list(&self, input: &str) -> Result<Listing> {
        let resolved = self.sanitizer.resolve(input);
        self.cache.get(&resolved).await
    }
}
