//! 路径清理。
//!
//! 调用方传入的是相对于相册根目录的路径。先按常规语义做词法规范化
//! （折叠 `.`、`..` 与多余分隔符），再去掉开头连续的 `..` 段，最后拼接到根目录上。

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

/// 将调用方路径限定在根目录内的清理器。
#[derive(Debug, Clone)]
pub struct PathSanitizer {
    root: PathBuf,
}

impl PathSanitizer {
    /// 创建清理器。`root` 会被转换为绝对路径（不解析符号链接）。
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = std::path::absolute(root.as_ref())?;
        Ok(Self { root })
    }

    /// 根目录。
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 解析调用方路径，返回用作缓存键的绝对路径。
    ///
    /// 不会失败：空串或无法识别的输入都解析为根目录本身。
    pub fn resolve(&self, input: &str) -> PathBuf {
        let segments = normalize(input);
        let resolved = strip_leading_parents(&segments)
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        // 拼接后再做一次前缀校验
        if resolved.starts_with(&self.root) {
            resolved
        } else {
            warn!(
                input = %input,
                resolved = %resolved.display(),
                "resolved path escaped gallery root, falling back to root"
            );
            self.root.clone()
        }
    }
}

/// 词法规范化，返回剩余的路径段。
///
/// 开头的 `/` 视为相对根目录。无法抵消的 `..` 会保留并聚集在最前面。
pub fn normalize(input: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in input.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    segments
}

/// 去掉开头连续的 `..` 段。
pub fn strip_leading_parents<'a>(segments: &'a [&'a str]) -> &'a [&'a str] {
    let skip = segments.iter().take_while(|s| **s == "..").count();
    &segments[skip..]
}
