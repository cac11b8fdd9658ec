use crate::models::TechnologyInfo;
use crate::DatabaseResult;

/// 技术栈仓库trait定义
#[async_trait::async_trait]
pub trait TechnologyRepositoryTrait: Send + Sync + 'static {
    /// 查询所有技术栈
    async fn list_technologies(&self) -> DatabaseResult<Vec<TechnologyInfo>>;

    /// 根据 ID 列表批量查询技术栈，不存在的ID会被忽略
    async fn find_technologies_by_ids(&self, ids: &[i64]) -> DatabaseResult<Vec<TechnologyInfo>>;
}
