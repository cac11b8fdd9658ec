use super::{StorageResult, UploadedFile};

/// 二进制文件存储
///
/// 以路径为键存取文件，路径由 [`put`](BlobStorage::put) 生成并返回，
/// 调用方只需要保存这个路径。
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BlobStorage: Send + Sync + 'static {
    /// 把文件保存到 `directory` 目录下，返回存储路径（例如 `projects/xxx.png`）
    async fn put(&self, directory: &str, file: &UploadedFile) -> StorageResult<String>;

    /// 删除文件，文件不存在时不报错
    async fn delete(&self, path: &str) -> StorageResult<()>;
}
