//! 项目相关接口
//!
//! 所有处理函数都是 [`ProjectServiceTrait`] 的泛型函数，业务逻辑全部在服务层，
//! 这里只负责：
//!
//! 1. 从请求中提取参数（路径中的 `slug`、multipart 表单）
//! 2. 调用服务层
//! 3. 把结果包装为 [`Reply`] / [`ReplyList`]，或者设置状态码和 `Location` 头
//!
//! 新建和更新接口使用 `multipart/form-data`，因为需要上传缩略图。
//! [`Multipart`] 会消费请求体，所以必须是处理函数的最后一个参数。

use crate::models::common::{Reply, ReplyList};
use crate::models::err::AppError;
use crate::models::projects::{
    ProjectDetail, ProjectEditForm, ProjectForm, ProjectFormOptions, ProjectInfo, ProjectUpsert, TechnologyInfo,
    TypeInfo,
};
use crate::services::ProjectServiceTrait;
use crate::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::Redirect;
use axum::Json;
use tracing::{debug, instrument};

/// 项目列表页地址，删除后重定向到这里
pub const PROJECTS_INDEX: &str = "/api/v1/projects";

/// 项目详情地址
fn project_location(slug: &str) -> String {
    format!("{PROJECTS_INDEX}/{slug}")
}

/// 查询所有项目
///
/// 只返回未删除的项目，按ID排序
#[utoipa::path(get,
    path = "/projects",
    tag = "projects",
    responses(
        (status = 200, description = "All active projects", body = ReplyList<ProjectInfo>)
    ),
)]
pub async fn list_projects<PS: ProjectServiceTrait>(
    State(state): State<AppState<PS>>,
) -> Result<Json<ReplyList<ProjectInfo>>, AppError> {
    debug!("🔍 查询项目列表");

    let projects = state.project_service.list_projects().await?;

    Ok(Json(ReplyList::new(projects)))
}

/// 新建项目表单
///
/// 返回新建项目时可选择的分类和技术栈
#[utoipa::path(get,
    path = "/projects/create",
    tag = "projects",
    responses(
        (status = 200, description = "Types and technologies to choose from", body = Reply<ProjectFormOptions>)
    ),
)]
pub async fn create_form<PS: ProjectServiceTrait>(
    State(state): State<AppState<PS>>,
) -> Result<Json<Reply<ProjectFormOptions>>, AppError> {
    let options = state.project_service.create_form().await?;

    Ok(Json(Reply { data: options }))
}

/// 创建项目
///
/// 根据标题生成唯一的 `slug`，保存缩略图后写入数据库。
///
/// ## 返回值
///
/// 成功时返回 `201 Created`，`Location` 头指向新项目的详情地址。
#[utoipa::path(post,
    path = "/projects",
    tag = "projects",
    request_body(content = ProjectForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Project created", body = Reply<ProjectInfo>,
            headers(("Location" = String, description = "Detail url of the new project"))),
        (status = 400, description = "Invalid form"),
        (status = 409, description = "Slug already taken by a concurrent request"),
    )
)]
#[instrument(skip_all)]
pub async fn store_project<PS: ProjectServiceTrait>(
    State(state): State<AppState<PS>>,
    multipart: Multipart,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Reply<ProjectInfo>>), AppError> {
    let form = ProjectUpsert::from_multipart(multipart).await?;
    debug!("📝 创建项目 {:?}", form.title);

    let project = state.project_service.store_project(form).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, project_location(&project.slug))],
        Json(Reply { data: project.into() }),
    ))
}

/// 查询指定项目详情
///
/// 项目不存在时返回 `{"data": null}`
#[utoipa::path(get,
    path = "/projects/{slug}",
    tag = "projects",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "Project detail, data is null when not found", body = Reply<ProjectDetail>)
    ),
)]
pub async fn show_project<PS: ProjectServiceTrait>(
    State(state): State<AppState<PS>>,
    Path(slug): Path<String>,
) -> Result<Json<Reply<Option<ProjectDetail>>>, AppError> {
    debug!("🔍 查询项目 {}", slug);

    let detail = state.project_service.show_project(&slug).await?;

    Ok(Json(Reply { data: detail }))
}

/// 编辑项目表单
#[utoipa::path(get,
    path = "/projects/{slug}/edit",
    tag = "projects",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "Project detail with types and technologies", body = Reply<ProjectEditForm>),
        (status = 404, description = "Project not found"),
    ),
)]
pub async fn edit_form<PS: ProjectServiceTrait>(
    State(state): State<AppState<PS>>,
    Path(slug): Path<String>,
) -> Result<Json<Reply<ProjectEditForm>>, AppError> {
    let form = state.project_service.edit_project(&slug).await?;

    Ok(Json(Reply { data: form }))
}

/// 更新项目信息
///
/// 同时注册为 `PUT` 和 `PATCH`。`technologies[]` 必须提交，
/// 提交一个空值表示清空所有技术栈。标题变化时 `slug` 会重新生成，
/// `Location` 头总是指向更新后的地址。
#[utoipa::path(put,
    path = "/projects/{slug}",
    tag = "projects",
    params(("slug" = String, Path, description = "Current project slug")),
    request_body(content = ProjectForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Project updated", body = Reply<ProjectInfo>,
            headers(("Location" = String, description = "Detail url of the project"))),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Project not found"),
    )
)]
#[instrument(skip(state, multipart))]
pub async fn update_project<PS: ProjectServiceTrait>(
    State(state): State<AppState<PS>>,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Reply<ProjectInfo>>), AppError> {
    let form = ProjectUpsert::from_multipart(multipart).await?;

    let project = state.project_service.update_project(&slug, form).await?;

    Ok((
        StatusCode::OK,
        [(header::LOCATION, project_location(&project.slug))],
        Json(Reply { data: project.into() }),
    ))
}

/// 删除指定的项目
///
/// 软删除，完成后 `303` 重定向到项目列表
#[utoipa::path(delete,
    path = "/projects/{slug}",
    tag = "projects",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 303, description = "Project deleted, redirect to the project list"),
        (status = 404, description = "Project not found"),
    )
)]
#[instrument(skip(state))]
pub async fn destroy_project<PS: ProjectServiceTrait>(
    State(state): State<AppState<PS>>,
    Path(slug): Path<String>,
) -> Result<Redirect, AppError> {
    state.project_service.destroy_project(&slug).await?;

    Ok(Redirect::to(PROJECTS_INDEX))
}

/// 查询所有项目分类
#[utoipa::path(get,
    path = "/types",
    tag = "types",
    responses(
        (status = 200, description = "All project types", body = ReplyList<TypeInfo>)
    ),
)]
pub async fn list_types<PS: ProjectServiceTrait>(
    State(state): State<AppState<PS>>,
) -> Result<Json<ReplyList<TypeInfo>>, AppError> {
    let types = state.project_service.list_types().await?;

    Ok(Json(ReplyList::new(types)))
}

/// 查询所有技术栈
#[utoipa::path(get,
    path = "/technologies",
    tag = "technologies",
    responses(
        (status = 200, description = "All technologies", body = ReplyList<TechnologyInfo>)
    ),
)]
pub async fn list_technologies<PS: ProjectServiceTrait>(
    State(state): State<AppState<PS>>,
) -> Result<Json<ReplyList<TechnologyInfo>>, AppError> {
    let technologies = state.project_service.list_technologies().await?;

    Ok(Json(ReplyList::new(technologies)))
}
