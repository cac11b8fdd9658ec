//! 路由入口
//!
//! 提供 [`create_app_router`] 函数，导出当前App的所有路由。
//!
//! 用户可以在导出路由时传入共享数据 shared_state，这样所有路由函数都可以访问。

use crate::routes::projects::__path_create_form;
use crate::routes::projects::__path_destroy_project;
use crate::routes::projects::__path_edit_form;
use crate::routes::projects::__path_list_projects;
use crate::routes::projects::__path_list_technologies;
use crate::routes::projects::__path_list_types;
use crate::routes::projects::__path_show_project;
use crate::routes::projects::__path_store_project;
use crate::routes::projects::__path_update_project;
use crate::routes::projects::{
    create_form, destroy_project, edit_form, list_projects, list_technologies, list_types, show_project,
    store_project, update_project,
};
use crate::{services::ProjectServiceTrait, AppState};
use axum::routing::patch;
use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_scalar::{Scalar, Servable};

pub mod projects;

/// 导出当前App的所有路由
///
/// ## 参数定义
/// - state: 共享数据，参考 [`AppState`] 定义。一般存放服务层实例之类的全局共享数据。
///
/// ## **❗️注意事项：**
///
/// 由于 [`routes!`] 宏限制，在同一个宏里面不能同时定义多个相同类型的http接口。
/// 不能这样定义：
///
/// ```rust,ignore
/// routes!(get, get, post)
/// ```
///
/// 这样会导致Panic
///
/// 需要拆开定义
///
/// ```rust,ignore
/// routes!(get, post)
/// .routes!(get)
/// ```
///
/// `PATCH /projects/{slug}` 与 `PUT` 共用同一个处理函数，文档中只登记 `PUT`。
fn routers<PS: ProjectServiceTrait>(state: AppState<PS>) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_projects, store_project))
        .routes(routes!(create_form))
        .routes(routes!(show_project, update_project, destroy_project))
        .route("/projects/{slug}", patch(update_project::<PS>))
        .routes(routes!(edit_form))
        .routes(routes!(list_types))
        .routes(routes!(list_technologies))
        .with_state(state)
}

/// 创建当前App的路由
///
/// 完成以下功能：
/// - 生成OpenAPI文档
/// - 生成App路由
/// - 使用Scalar作为最终在线文档格式
///
/// 由于使用了 `utoipa` 库来自动化生成`openapi`文档，因此我们没有使用原生的 [`Router`]，而是使用了
/// [`OpenApiRouter`] 。
pub fn create_app_router<PS: ProjectServiceTrait>(shared_state: AppState<PS>) -> Router {
    // 当前项目的OpenAPI声明
    #[derive(OpenApi)]
    #[openapi(
        tags(
            (name = "projects", description = r#"
作品集项目管理接口：

- 新建/更新时根据标题生成唯一 slug
- 缩略图上传（multipart/form-data）
- 技术栈关联同步
- 软删除
            "#),
            (name = "types", description = "项目分类"),
            (name = "technologies", description = "技术栈"),
        ),
    )]
    struct ApiDoc;

    // 使用`utoipa_axum`提供的OpenApiRouter来创建路由。
    // 同时传递共享状态数据到路由中供使用。
    // 最终拿到的变量：
    // - router: Axum的Router，实际的路由对象
    // - api: utoipa的OpenApi，生成的OpenAPI对象
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api/v1", routers(shared_state))
        .split_for_parts();

    // 合并文档路由，用户可通过 /docs 访问文档网页地址
    router.merge(Scalar::with_url("/docs", api))
}
