//! 目录读取。

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{GalleryError, Result};

/// 一次目录读取的结果：直接子目录名与文件名。
///
/// 顺序即底层 `read_dir` 返回的顺序，不做排序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// 子目录名称。
    pub folders: Vec<String>,
    /// 文件名称。
    pub files: Vec<String>,
}

/// 目录读取接口。
#[async_trait]
pub trait DirectoryReader: Send + Sync {
    /// 非递归地列出 `path` 的直接子项，排除以 `.` 开头的条目。
    async fn list(&self, path: &Path) -> Result<Listing>;
}

/// 基于 `tokio::fs` 的目录读取实现。
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

#[async_trait]
impl DirectoryReader for FsReader {
    async fn list(&self, path: &Path) -> Result<Listing> {
        info!(path = %path.display(), "Listing directory");

        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|e| GalleryError::from_io(path, e))?;
        let mut listing = Listing::default();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| GalleryError::from_io(path, e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_hidden(&name) {
                continue;
            }

            // 不跟随符号链接
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                listing.folders.push(name);
            } else if file_type.is_file() {
                listing.files.push(name);
            } else {
                debug!(name = %name, "skipping entry that is neither file nor directory");
            }
        }

        Ok(listing)
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
