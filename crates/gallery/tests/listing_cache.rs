#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use folio_gallery::{DEFAULT_FRESHNESS, FsReader, Gallery, ListingCache, PathSanitizer};
use tokio::task::JoinSet;

use common::{MockReader, listing};

fn two_paths() -> (PathBuf, PathBuf, MockReader) {
    let a = PathBuf::from("/srv/photos/a");
    let b = PathBuf::from("/srv/photos/b");
    let reader = MockReader::new([
        (a.clone(), listing(&["x"], &["1.jpg"])),
        (b.clone(), listing(&[], &["2.jpg"])),
    ]);
    (a, b, reader)
}

#[tokio::test(start_paused = true)]
async fn repeated_get_within_window_reads_once() {
    let (a, _, reader) = two_paths();
    let cache = ListingCache::new(Arc::new(reader.clone()), DEFAULT_FRESHNESS);

    let first = cache.get(&a).await.unwrap();
    tokio::time::advance(DEFAULT_FRESHNESS - Duration::from_millis(1)).await;
    let second = cache.get(&a).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(reader.reads(&a), 1);
}

#[tokio::test(start_paused = true)]
async fn get_after_window_triggers_exactly_one_read() {
    let (a, _, reader) = two_paths();
    let cache = ListingCache::new(Arc::new(reader.clone()), DEFAULT_FRESHNESS);

    cache.get(&a).await.unwrap();
    cache.get(&a).await.unwrap();
    tokio::time::advance(DEFAULT_FRESHNESS).await;
    cache.get(&a).await.unwrap();
    cache.get(&a).await.unwrap();

    assert_eq!(reader.reads(&a), 2);
}

#[tokio::test(start_paused = true)]
async fn keys_are_cached_independently() {
    let (a, b, reader) = two_paths();
    let cache = ListingCache::new(Arc::new(reader.clone()), DEFAULT_FRESHNESS);

    cache.get(&a).await.unwrap();
    tokio::time::advance(Duration::from_secs(200)).await;
    let b_listing = cache.get(&b).await.unwrap();
    tokio::time::advance(Duration::from_secs(200)).await;

    // a is now stale, b is still fresh
    cache.get(&a).await.unwrap();
    assert_eq!(cache.get(&b).await.unwrap(), b_listing);

    assert_eq!(reader.reads(&a), 2);
    assert_eq!(reader.reads(&b), 1);
    assert_eq!(cache.len().await, 2);
}

#[tokio::test]
async fn failed_read_is_retried_on_next_call() {
    let (a, _, reader) = two_paths();
    let cache = ListingCache::new(Arc::new(reader.clone()), DEFAULT_FRESHNESS);

    reader.fail_next(1);
    assert!(cache.get(&a).await.is_err());
    assert!(cache.is_empty().await);

    let listing = cache.get(&a).await.unwrap();
    assert_eq!(listing.files, vec!["1.jpg".to_string()]);
    assert_eq!(reader.reads(&a), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_misses_on_one_path_read_once() {
    let (a, _, reader) = two_paths();
    let reader = reader.with_delay(Duration::from_secs(1));
    let cache = Arc::new(ListingCache::new(
        Arc::new(reader.clone()),
        DEFAULT_FRESHNESS,
    ));

    let mut set = JoinSet::new();
    for _ in 0..32 {
        let cache = Arc::clone(&cache);
        let path = a.clone();
        set.spawn(async move { cache.get(&path).await.unwrap() });
    }

    let mut results = Vec::new();
    while let Some(result) = set.join_next().await {
        results.push(result.unwrap());
    }

    assert_eq!(results.len(), 32);
    assert!(results.iter().all(|listing| *listing == results[0]));
    assert_eq!(reader.reads(&a), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_read_does_not_block_other_paths() {
    let (a, b, reader) = two_paths();
    let delay = Duration::from_secs(10);
    let reader = reader.with_delay(delay);
    let cache = ListingCache::new(Arc::new(reader.clone()), DEFAULT_FRESHNESS);

    let started = tokio::time::Instant::now();
    let (first, second) = tokio::join!(cache.get(&a), cache.get(&b));
    first.unwrap();
    second.unwrap();

    // both reads overlap instead of queueing behind one another
    assert!(started.elapsed() < delay * 2);
    assert_eq!(reader.reads(&a), 1);
    assert_eq!(reader.reads(&b), 1);
}

#[tokio::test]
async fn gallery_lists_real_directory_inside_root() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir(tmp.path().join(".git")).unwrap();
    std::fs::create_dir(tmp.path().join("sub")).unwrap();
    std::fs::write(tmp.path().join("notes.txt"), b"notes").unwrap();

    let gallery = Gallery::new(
        PathSanitizer::new(tmp.path()).unwrap(),
        Arc::new(FsReader),
        DEFAULT_FRESHNESS,
    );

    let listing = gallery.list("../../").await.unwrap();
    assert_eq!(listing.folders, vec!["sub".to_string()]);
    assert_eq!(listing.files, vec!["notes.txt".to_string()]);

    let resolved = gallery.sanitizer().resolve("../../etc");
    assert!(resolved.starts_with(tmp.path()));
    assert_eq!(resolved, tmp.path().join("etc"));
}

#[tokio::test]
async fn gallery_reports_missing_subdirectory() {
    let tmp = tempfile::tempdir().unwrap();
    let gallery = Gallery::new(
        PathSanitizer::new(tmp.path()).unwrap(),
        Arc::new(FsReader),
        DEFAULT_FRESHNESS,
    );

    assert!(gallery.list("does/not/exist").await.is_err());
    assert!(gallery.cache().is_empty().await);
    assert_eq!(
        gallery.sanitizer().resolve("does/not/exist"),
        Path::new(tmp.path()).join("does/not/exist")
    );
}
