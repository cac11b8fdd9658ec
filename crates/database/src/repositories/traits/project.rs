//! 项目仓库 trait 定义
//!
//! 定义项目数据库操作的抽象接口

use crate::models::{ProjectCreate, ProjectInfo, ProjectUpdate, TechnologyInfo, TechnologySync};
use crate::DatabaseResult;

/// 项目仓库trait定义
///
/// 除 [`slug_exists`](ProjectRepositoryTrait::slug_exists) 外，
/// 所有查询都只针对未被软删除的记录。
#[async_trait::async_trait]
pub trait ProjectRepositoryTrait: Send + Sync + 'static {
    /// 查询所有有效项目，按ID排序
    async fn list_projects(&self) -> DatabaseResult<Vec<ProjectInfo>>;

    /// 根据 slug 查询有效项目
    async fn find_project_by_slug(&self, slug: &str) -> DatabaseResult<Option<ProjectInfo>>;

    /// slug 是否已被占用
    ///
    /// 检查范围包括已软删除的记录。`ignore_id` 用于更新时排除当前项目自身。
    async fn slug_exists(&self, slug: &str, ignore_id: Option<i64>) -> DatabaseResult<bool>;

    /// 创建新项目
    ///
    /// slug 重复时返回 [`DatabaseError::Conflict`](crate::DatabaseError::Conflict)
    async fn create_project(&self, project: ProjectCreate) -> DatabaseResult<ProjectInfo>;

    /// 更新项目信息，`None` 字段保持原值
    async fn update_project(&self, id: i64, update: ProjectUpdate) -> DatabaseResult<ProjectInfo>;

    /// 软删除项目
    async fn soft_delete_project(&self, id: i64) -> DatabaseResult<ProjectInfo>;

    /// 查询项目关联的技术栈
    async fn project_technologies(&self, id: i64) -> DatabaseResult<Vec<TechnologyInfo>>;

    /// 为项目追加技术栈关联，不检查是否已存在
    async fn attach_technologies(&self, id: i64, technology_ids: &[i64]) -> DatabaseResult<()>;

    /// 把项目的技术栈关联同步为 `technology_ids`
    ///
    /// 缺少的关联会被添加，多余的关联会被移除，已有的保持不变
    async fn sync_technologies(&self, id: i64, technology_ids: &[i64]) -> DatabaseResult<TechnologySync>;

    /// 移除项目的所有技术栈关联，返回移除的数量
    async fn detach_technologies(&self, id: i64) -> DatabaseResult<u64>;
}
