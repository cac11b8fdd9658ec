use crate::models::TypeInfo;
use crate::DatabaseResult;

/// 项目分类仓库trait定义
#[async_trait::async_trait]
pub trait TypeRepositoryTrait: Send + Sync + 'static {
    /// 查询所有分类
    async fn list_types(&self) -> DatabaseResult<Vec<TypeInfo>>;

    /// 根据 ID 查询分类
    async fn get_type_by_id(&self, id: i64) -> DatabaseResult<Option<TypeInfo>>;
}
