//! 文件存储模块
//!
//! 缩略图等二进制文件通过 [`BlobStorage`] 存取，与关系型数据库相互独立。
//! 目前提供基于本地文件系统的 [`LocalStorage`] 实现。

pub mod local;
pub mod traits;

use axum::body::Bytes;
use thiserror::Error;

pub use local::LocalStorage;
pub use traits::BlobStorage;

/// 项目缩略图所在的逻辑目录
pub const PROJECTS_DIRECTORY: &str = "projects";

/// 文件存储错误
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("非法的存储路径: {0}")]
    InvalidPath(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// 上传的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// 客户端提供的原始文件名
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// 是否为图片
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.starts_with("image/"))
    }

    /// 存储时使用的扩展名
    ///
    /// 优先根据 `Content-Type` 推断，其次使用原始文件名的扩展名
    pub fn extension(&self) -> String {
        let from_content_type = match self.content_type.as_deref() {
            Some("image/jpeg") => Some("jpg"),
            Some("image/png") => Some("png"),
            Some("image/gif") => Some("gif"),
            Some("image/webp") => Some("webp"),
            Some("image/svg+xml") => Some("svg"),
            Some("image/avif") => Some("avif"),
            Some("image/bmp") => Some("bmp"),
            _ => None,
        };

        if let Some(extension) = from_content_type {
            return extension.to_string();
        }

        self.file_name
            .as_deref()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|extension| extension.to_str())
            .filter(|extension| !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "bin".to_string())
    }
}
