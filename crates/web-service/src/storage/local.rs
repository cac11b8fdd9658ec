//! 本地文件系统存储

use super::{BlobStorage, StorageError, StorageResult, UploadedFile};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// 随机文件名长度
const FILE_NAME_LENGTH: usize = 40;

/// 基于本地目录的文件存储
///
/// 所有文件都保存在 `root` 目录下，返回的路径是相对于 `root` 的路径。
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 把相对路径转换为 `root` 下的绝对路径
    ///
    /// 只允许普通路径片段，拒绝 `..`、绝对路径等可能逃逸出 `root` 的路径
    fn resolve(&self, relative: &str) -> StorageResult<PathBuf> {
        let path = Path::new(relative);
        let is_plain = !relative.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(StorageError::InvalidPath(relative.to_string()));
        }

        Ok(self.root.join(path))
    }
}

fn random_file_name(extension: &str) -> String {
    let name: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FILE_NAME_LENGTH)
        .map(char::from)
        .collect();

    format!("{name}.{extension}")
}

#[async_trait::async_trait]
impl BlobStorage for LocalStorage {
    async fn put(&self, directory: &str, file: &UploadedFile) -> StorageResult<String> {
        let directory_path = self.resolve(directory)?;
        tokio::fs::create_dir_all(&directory_path).await?;

        let file_name = random_file_name(&file.extension());
        tokio::fs::write(directory_path.join(&file_name), &file.bytes).await?;

        let stored = format!("{}/{}", directory.trim_end_matches('/'), file_name);
        debug!("💾 文件已保存: {} ({} bytes)", stored, file.bytes.len());
        Ok(stored)
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let full_path = self.resolve(path)?;

        match tokio::fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!("🗑️ 文件已删除: {}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("⚠️ 要删除的文件不存在: {}", path);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
