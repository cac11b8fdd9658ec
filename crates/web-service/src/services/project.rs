//! 项目服务
//!
//! 提供项目相关的业务逻辑操作：
//!
//! - 根据标题生成唯一的 slug
//! - 缩略图的保存、替换与删除
//! - 项目与技术栈的多对多关联同步
//! - 软删除
//!
//! 数据库和文件存储之间没有事务，出错时会尽量删除本次请求新保存的文件，
//! 旧文件只会在数据库更新成功后才删除。

use crate::models::err::{AppError, AppResult};
use crate::models::projects::{ProjectDetail, ProjectEditForm, ProjectFormOptions, ProjectUpsert};
use crate::services::traits::ProjectServiceTrait;
use crate::storage::{BlobStorage, PROJECTS_DIRECTORY};
use database::{
    DatabaseResult, ProjectCreate, ProjectInfo, ProjectRepositoryTrait, ProjectUpdate, TechnologyInfo, TechnologyRepositoryTrait,
    TypeInfo, TypeRepositoryTrait,
};
use shared_lib::{slugify, try_generate_slug};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 项目服务
///
/// 仓库和文件存储都通过 `Arc` 共享，`Clone` 的开销很小。
pub struct ProjectService<PR, TR, CR, BS> {
    projects: Arc<PR>,
    types: Arc<TR>,
    technologies: Arc<CR>,
    storage: Arc<BS>,
}

impl<PR, TR, CR, BS> Clone for ProjectService<PR, TR, CR, BS> {
    fn clone(&self) -> Self {
        Self {
            projects: Arc::clone(&self.projects),
            types: Arc::clone(&self.types),
            technologies: Arc::clone(&self.technologies),
            storage: Arc::clone(&self.storage),
        }
    }
}

/// 与固定路由冲突的 slug，例如 `/projects/create`
const RESERVED_SLUGS: &[&str] = &["create"];

/// 去重并排序
fn unique_ids(ids: &[i64]) -> Vec<i64> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

impl<PR, TR, CR, BS> ProjectService<PR, TR, CR, BS>
where
    PR: ProjectRepositoryTrait,
    TR: TypeRepositoryTrait,
    CR: TechnologyRepositoryTrait,
    BS: BlobStorage,
{
    pub fn new(projects: PR, types: TR, technologies: CR, storage: BS) -> Self {
        Self {
            projects: Arc::new(projects),
            types: Arc::new(types),
            technologies: Arc::new(technologies),
            storage: Arc::new(storage),
        }
    }

    async fn find_active(&self, slug: &str) -> AppResult<ProjectInfo> {
        self.projects
            .find_project_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("project {slug}")))
    }

    /// 生成唯一 slug，`ignore_id` 用于更新时排除当前项目
    async fn unique_slug(&self, title: &str, ignore_id: Option<i64>) -> AppResult<String> {
        if slugify(title).is_empty() {
            return Err(AppError::invalid("title", "slug", "title must contain letters or digits"));
        }

        let projects = &self.projects;
        let slug = try_generate_slug(title, move |candidate| async move {
            if RESERVED_SLUGS.contains(&candidate.as_str()) {
                return Ok(true);
            }
            projects.slug_exists(&candidate, ignore_id).await
        })
        .await?;

        debug!("🏷️ 标题 {:?} 生成 slug: {}", title, slug);
        Ok(slug)
    }

    /// 检查分类和技术栈是否存在
    async fn ensure_references(&self, type_id: Option<i64>, technology_ids: &[i64]) -> AppResult<()> {
        if let Some(type_id) = type_id {
            if self.types.get_type_by_id(type_id).await?.is_none() {
                return Err(AppError::invalid("type_id", "exists", "type does not exist"));
            }
        }

        if !technology_ids.is_empty() {
            let found = self.technologies.find_technologies_by_ids(technology_ids).await?;
            if found.len() != unique_ids(technology_ids).len() {
                return Err(AppError::invalid("technologies", "exists", "technology does not exist"));
            }
        }

        Ok(())
    }

    /// 尽力删除文件，失败只记录日志
    async fn discard_blob(&self, path: &str) {
        if let Err(e) = self.storage.delete(path).await {
            warn!("⚠️ 删除文件 {} 失败: {}", path, e);
        }
    }

    async fn detail(&self, project: ProjectInfo) -> AppResult<ProjectDetail> {
        let project_type = match project.type_id {
            Some(type_id) => self.types.get_type_by_id(type_id).await?,
            None => None,
        };
        let technologies = self.projects.project_technologies(project.id).await?;

        Ok(ProjectDetail {
            project: project.into(),
            project_type: project_type.map(Into::into),
            technologies: technologies.into_iter().map(Into::into).collect(),
        })
    }

    async fn form_options(&self) -> AppResult<ProjectFormOptions> {
        let types = self.types.list_types().await?;
        let technologies = self.technologies.list_technologies().await?;

        Ok(ProjectFormOptions {
            types: types.into_iter().map(Into::into).collect(),
            technologies: technologies.into_iter().map(Into::into).collect(),
        })
    }
}

#[async_trait::async_trait]
impl<PR, TR, CR, BS> ProjectServiceTrait for ProjectService<PR, TR, CR, BS>
where
    PR: ProjectRepositoryTrait,
    TR: TypeRepositoryTrait,
    CR: TechnologyRepositoryTrait,
    BS: BlobStorage,
{
    async fn list_projects(&self) -> AppResult<Vec<ProjectInfo>> {
        Ok(self.projects.list_projects().await?)
    }

    async fn create_form(&self) -> AppResult<ProjectFormOptions> {
        self.form_options().await
    }

    async fn store_project(&self, form: ProjectUpsert) -> AppResult<ProjectInfo> {
        form.validate_for_store()?;

        let ProjectUpsert { title, description, type_id, release, link, technologies, thumb } = form;
        let (Some(title), Some(thumb)) = (title, thumb) else {
            return Err(AppError::invalid("title", "required", "title and thumb are required"));
        };
        let technologies = unique_ids(technologies.as_deref().unwrap_or_default());
        let type_id = type_id.flatten();

        self.ensure_references(type_id, &technologies).await?;
        let slug = self.unique_slug(&title, None).await?;

        let thumb_path = self.storage.put(PROJECTS_DIRECTORY, &thumb).await?;

        let created = self
            .projects
            .create_project(ProjectCreate {
                title,
                slug,
                description: description.flatten(),
                thumb: Some(thumb_path.clone()),
                release: release.flatten(),
                link: link.flatten(),
                type_id,
            })
            .await;

        let project = match created {
            Ok(project) => project,
            Err(e) => {
                self.discard_blob(&thumb_path).await;
                return Err(e.into());
            }
        };

        if !technologies.is_empty() {
            self.projects.attach_technologies(project.id, &technologies).await?;
        }

        info!("✅ 项目已创建: {}", project.slug);
        Ok(project)
    }

    async fn show_project(&self, slug: &str) -> AppResult<Option<ProjectDetail>> {
        match self.projects.find_project_by_slug(slug).await? {
            Some(project) => Ok(Some(self.detail(project).await?)),
            None => Ok(None),
        }
    }

    async fn edit_project(&self, slug: &str) -> AppResult<ProjectEditForm> {
        let project = self.find_active(slug).await?;
        let detail = self.detail(project).await?;
        let options = self.form_options().await?;

        Ok(ProjectEditForm { project: detail, types: options.types, technologies: options.technologies })
    }

    async fn update_project(&self, slug: &str, form: ProjectUpsert) -> AppResult<ProjectInfo> {
        form.validate_for_update()?;

        let project = self.find_active(slug).await?;

        let ProjectUpsert { title, description, type_id, release, link, technologies, thumb } = form;
        let technologies = unique_ids(technologies.as_deref().unwrap_or_default());
        self.ensure_references(type_id.flatten(), &technologies).await?;

        let new_slug = match &title {
            Some(title) if *title != project.title => Some(self.unique_slug(title, Some(project.id)).await?),
            _ => None,
        };

        let new_thumb = match &thumb {
            Some(file) => Some(self.storage.put(PROJECTS_DIRECTORY, file).await?),
            None => None,
        };

        let update = ProjectUpdate {
            title,
            slug: new_slug,
            description,
            thumb: new_thumb.clone(),
            release,
            link,
            type_id,
        };

        let persisted: DatabaseResult<ProjectInfo> = async {
            let sync = self.projects.sync_technologies(project.id, &technologies).await?;
            debug!("🔗 技术栈同步结果: {:?}", sync);
            self.projects.update_project(project.id, update).await
        }
        .await;

        let updated = match persisted {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(path) = &new_thumb {
                    self.discard_blob(path).await;
                }
                return Err(e.into());
            }
        };

        if new_thumb.is_some() {
            if let Some(old_thumb) = &project.thumb {
                self.discard_blob(old_thumb).await;
            }
        }

        info!("✅ 项目已更新: {} -> {}", slug, updated.slug);
        Ok(updated)
    }

    async fn destroy_project(&self, slug: &str) -> AppResult<ProjectInfo> {
        let project = self.find_active(slug).await?;

        if let Some(thumb) = &project.thumb {
            self.storage.delete(thumb).await?;
        }

        self.projects.detach_technologies(project.id).await?;
        let trashed = self.projects.soft_delete_project(project.id).await?;

        info!("🗑️ 项目已删除: {}", trashed.slug);
        Ok(trashed)
    }

    async fn list_types(&self) -> AppResult<Vec<TypeInfo>> {
        Ok(self.types.list_types().await?)
    }

    async fn list_technologies(&self) -> AppResult<Vec<TechnologyInfo>> {
        Ok(self.technologies.list_technologies().await?)
    }
}
