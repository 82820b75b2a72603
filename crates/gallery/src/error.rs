use std::io;
use std::path::Path;

use thiserror::Error;

/// 相册目录读取错误类型。
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("路径不存在: {0}")]
    PathNotFound(String),

    #[error("路径不是目录: {0}")]
    NotADirectory(String),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
}

impl GalleryError {
    /// 按 IO 错误种类归类，附带出错的路径。
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let display = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => Self::PathNotFound(display),
            io::ErrorKind::NotADirectory => Self::NotADirectory(display),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(display),
            _ => Self::Io(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
