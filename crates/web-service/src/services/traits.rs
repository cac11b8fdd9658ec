//! 服务层 trait 定义
//!
//! 定义服务层的抽象接口，遵循六边形架构的端口适配器模式

use crate::models::err::AppResult;
use crate::models::projects::{ProjectDetail, ProjectEditForm, ProjectFormOptions, ProjectUpsert};
use database::{ProjectInfo, TechnologyInfo, TypeInfo};

/// 项目服务 trait 定义
///
/// 定义了项目相关的业务逻辑接口，作为应用层的端口(Port)
///
/// 该 trait 作为业务逻辑的抽象接口，具体实现由 [`ProjectService`](crate::services::ProjectService) 提供
#[async_trait::async_trait]
pub trait ProjectServiceTrait: Send + Sync + Clone + 'static {
    /// 查询所有有效项目
    async fn list_projects(&self) -> AppResult<Vec<ProjectInfo>>;

    /// 新建项目表单的可选项（所有分类和技术栈）
    async fn create_form(&self) -> AppResult<ProjectFormOptions>;

    /// 创建新项目
    ///
    /// # 参数
    /// - `form`: 从请求中解析的参数，`title` 和 `thumb` 必填
    ///
    /// # 返回值
    /// 返回创建的项目信息，其中 `slug` 已保证唯一
    async fn store_project(&self, form: ProjectUpsert) -> AppResult<ProjectInfo>;

    /// 根据 slug 查询项目详情，不存在时返回 `None`
    async fn show_project(&self, slug: &str) -> AppResult<Option<ProjectDetail>>;

    /// 编辑项目表单，项目不存在时返回 [`AppError::NotFound`](crate::models::err::AppError::NotFound)
    async fn edit_project(&self, slug: &str) -> AppResult<ProjectEditForm>;

    /// 更新项目信息
    ///
    /// # 参数
    /// - `slug`: 当前 slug
    /// - `form`: 更新参数，`technologies` 必填（可以为空列表）
    ///
    /// # 返回值
    /// 返回更新后的项目信息，标题变化时 `slug` 会重新生成
    async fn update_project(&self, slug: &str, form: ProjectUpsert) -> AppResult<ProjectInfo>;

    /// 删除项目（软删除），同时删除缩略图并解除技术栈关联
    async fn destroy_project(&self, slug: &str) -> AppResult<ProjectInfo>;

    /// 查询所有分类
    async fn list_types(&self) -> AppResult<Vec<TypeInfo>>;

    /// 查询所有技术栈
    async fn list_technologies(&self) -> AppResult<Vec<TechnologyInfo>>;
}
