//! Gallery - 相册目录浏览模块。
//!
//! 将调用方提供的相对路径限定在配置的根目录内，读取目录的直接子项，
//! 并按路径缓存读取结果直到新鲜期结束。

pub mod cache;
pub mod error;
pub mod reader;
pub mod sanitize;
pub mod service;

pub use cache::{DEFAULT_FRESHNESS, ListingCache};
pub use error::{GalleryError, Result};
pub use reader::{DirectoryReader, FsReader, Listing};
pub use sanitize::PathSanitizer;
pub use service::Gallery;
