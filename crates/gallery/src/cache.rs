//! 目录列表缓存。
//!
//! 以解析后的绝对路径为键，缓存最近一次读取结果与读取时间。条目在新鲜期内
//! 原样返回；过期条目不会被主动淘汰，而是在下次访问该键时整体覆盖。
//! 读取失败不写入缓存，下次访问会重新读取。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

use crate::error::Result;
use crate::reader::{DirectoryReader, Listing};

/// 默认新鲜期：5 分钟。
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    listing: Listing,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, freshness: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < freshness
    }
}

/// 按路径缓存的目录列表。
///
/// 同一个键的并发未命中通过按键的互斥锁合并为一次读取；不同键之间互不阻塞。
/// 映射表的锁只在查找与写入时持有，从不跨越目录读取。
/// 按键的互斥锁在最后一个使用者离开时移除，失败的读取不会留下任何状态。
pub struct ListingCache {
    reader: Arc<dyn DirectoryReader>,
    freshness: Duration,
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
    refills: std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

/// 一次刷新占用的按键互斥锁，释放时若无其他等待者则从表中移除。
struct RefillSlot<'a> {
    refills: &'a std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl Drop for RefillSlot<'_> {
    fn drop(&mut self) {
        let mut refills = self.refills.lock().unwrap_or_else(PoisonError::into_inner);
        // 表中一份加上自身一份
        let unused = Arc::strong_count(&self.lock) == 2;
        let ours = refills
            .get(&self.path)
            .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock));
        if unused && ours {
            refills.remove(&self.path);
        }
    }
}

impl ListingCache {
    /// 创建空缓存。
    pub fn new(reader: Arc<dyn DirectoryReader>, freshness: Duration) -> Self {
        Self {
            reader,
            freshness,
            entries: RwLock::new(HashMap::new()),
            refills: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// 获取 `path` 的目录列表，缺失或过期时重新读取。
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub async fn get(&self, path: &Path) -> Result<Listing> {
        if let Some(listing) = self.fresh(path).await {
            debug!("listing cache hit");
            return Ok(listing);
        }

        let slot = self.refill_slot(path);
        let _guard = slot.lock.lock().await;

        // 等锁期间可能已被其他请求刷新
        if let Some(listing) = self.fresh(path).await {
            debug!("listing refreshed by concurrent request");
            return Ok(listing);
        }

        let fetched_at = Instant::now();
        let listing = self.reader.list(path).await?;

        self.entries.write().await.insert(
            path.to_path_buf(),
            CacheEntry {
                listing: listing.clone(),
                fetched_at,
            },
        );
        debug!(
            folders = listing.folders.len(),
            files = listing.files.len(),
            "listing cache refilled"
        );

        Ok(listing)
    }

    /// 已缓存的键数量（含过期条目）。
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn fresh(&self, path: &Path) -> Option<Listing> {
        let entries = self.entries.read().await;
        entries
            .get(path)
            .filter(|entry| entry.is_fresh(self.freshness, Instant::now()))
            .map(|entry| entry.listing.clone())
    }

    fn refill_slot(&self, path: &Path) -> RefillSlot<'_> {
        let mut refills = self.refills.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = refills.entry(path.to_path_buf()).or_default().clone();
        RefillSlot {
            refills: &self.refills,
            path: path.to_path_buf(),
            lock,
        }
    }

    #[cfg(test)]
    fn pending_refills(&self) -> usize {
        self.refills
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
