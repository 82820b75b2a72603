use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use folio_gallery::{DirectoryReader, GalleryError, Listing, Result};

/// In-memory reader that counts how often each path is read.
#[derive(Clone, Default)]
pub struct MockReader {
    listings: Arc<HashMap<PathBuf, Listing>>,
    reads: Arc<std::sync::Mutex<HashMap<PathBuf, usize>>>,
    failures_left: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockReader {
    pub fn new(listings: impl IntoIterator<Item = (PathBuf, Listing)>) -> Self {
        Self {
            listings: Arc::new(listings.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Every read sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The next `n` reads fail with an I/O error.
    pub fn fail_next(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    pub fn reads(&self, path: &Path) -> usize {
        self.reads
            .lock()
            .expect("reads lock")
            .get(path)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl DirectoryReader for MockReader {
    async fn list(&self, path: &Path) -> Result<Listing> {
        *self
            .reads
            .lock()
            .expect("reads lock")
            .entry(path.to_path_buf())
            .or_default() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(GalleryError::Io(std::io::Error::other("simulated read failure")));
        }

        self.listings
            .get(path)
            .cloned()
            .ok_or_else(|| GalleryError::PathNotFound(path.display().to_string()))
    }
}

pub fn listing(folders: &[&str], files: &[&str]) -> Listing {
    Listing {
        folders: folders.iter().map(|s| s.to_string()).collect(),
        files: files.iter().map(|s| s.to_string()).collect(),
    }
}
