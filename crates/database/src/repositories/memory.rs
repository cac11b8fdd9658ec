//! 内存仓库
//!
//! 同时实现三个仓库 trait，数据保存在进程内，适合本地开发和测试。
//! 行为与 PostgreSQL 实现保持一致：软删除、slug 唯一约束、技术栈关联同步。

use crate::models::{ProjectCreate, ProjectInfo, ProjectUpdate, TechnologyInfo, TechnologySync, TypeInfo};
use crate::repositories::project::diff_technologies;
use crate::repositories::traits::{ProjectRepositoryTrait, TechnologyRepositoryTrait, TypeRepositoryTrait};
use crate::{DatabaseError, DatabaseResult};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryState {
    projects: BTreeMap<i64, ProjectInfo>,
    types: BTreeMap<i64, TypeInfo>,
    technologies: BTreeMap<i64, TechnologyInfo>,
    /// (project_id, technology_id)
    project_technology: BTreeSet<(i64, i64)>,
}

impl MemoryState {
    fn active_project(&self, id: i64) -> DatabaseResult<&ProjectInfo> {
        self.projects
            .get(&id)
            .filter(|p| !p.is_trashed())
            .ok_or_else(|| DatabaseError::not_found(format!("project {id}")))
    }

    fn technology_ids_of(&self, id: i64) -> BTreeSet<i64> {
        self.project_technology
            .iter()
            .filter(|(project_id, _)| *project_id == id)
            .map(|(_, technology_id)| *technology_id)
            .collect()
    }

    fn ensure_technologies(&self, technology_ids: &[i64]) -> DatabaseResult<()> {
        match technology_ids.iter().find(|id| !self.technologies.contains_key(*id)) {
            Some(missing) => Err(DatabaseError::not_found(format!("technology {missing}"))),
            None => Ok(()),
        }
    }
}

fn next_id<T>(map: &BTreeMap<i64, T>) -> i64 {
    map.keys().next_back().map_or(1, |id| id + 1)
}

/// 内存数据库
///
/// `Clone` 之后共享同一份数据。
#[derive(Debug, Default, Clone)]
pub struct MemoryDatabase {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增一个分类
    pub async fn add_type(&self, name: &str) -> TypeInfo {
        let mut state = self.state.write().await;
        let project_type = TypeInfo { id: next_id(&state.types), name: name.to_string() };
        state.types.insert(project_type.id, project_type.clone());
        project_type
    }

    /// 新增一个技术栈
    pub async fn add_technology(&self, name: &str) -> TechnologyInfo {
        let mut state = self.state.write().await;
        let technology = TechnologyInfo { id: next_id(&state.technologies), name: name.to_string() };
        state.technologies.insert(technology.id, technology.clone());
        technology
    }

    /// 根据 slug 查询项目，包括已软删除的记录
    pub async fn find_project_with_trashed(&self, slug: &str) -> Option<ProjectInfo> {
        let state = self.state.read().await;
        state.projects.values().find(|p| p.slug == slug).cloned()
    }

    /// 所有技术栈关联的数量
    pub async fn association_count(&self) -> usize {
        self.state.read().await.project_technology.len()
    }
}

#[async_trait::async_trait]
impl ProjectRepositoryTrait for MemoryDatabase {
    async fn list_projects(&self) -> DatabaseResult<Vec<ProjectInfo>> {
        let state = self.state.read().await;
        Ok(state.projects.values().filter(|p| !p.is_trashed()).cloned().collect())
    }

    async fn find_project_by_slug(&self, slug: &str) -> DatabaseResult<Option<ProjectInfo>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .values()
            .find(|p| p.slug == slug && !p.is_trashed())
            .cloned())
    }

    async fn slug_exists(&self, slug: &str, ignore_id: Option<i64>) -> DatabaseResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .values()
            .any(|p| p.slug == slug && Some(p.id) != ignore_id))
    }

    async fn create_project(&self, project: ProjectCreate) -> DatabaseResult<ProjectInfo> {
        let mut state = self.state.write().await;

        if state.projects.values().any(|p| p.slug == project.slug) {
            return Err(DatabaseError::conflict(format!("slug {} already exists", project.slug)));
        }
        if let Some(type_id) = project.type_id {
            if !state.types.contains_key(&type_id) {
                return Err(DatabaseError::not_found(format!("type {type_id}")));
            }
        }

        let now = Utc::now();
        let info = ProjectInfo {
            id: next_id(&state.projects),
            title: project.title,
            slug: project.slug,
            description: project.description,
            thumb: project.thumb,
            release: project.release,
            link: project.link,
            type_id: project.type_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.projects.insert(info.id, info.clone());

        debug!("📝 [memory] 创建项目: {}", info.slug);
        Ok(info)
    }

    async fn update_project(&self, id: i64, update: ProjectUpdate) -> DatabaseResult<ProjectInfo> {
        let mut state = self.state.write().await;
        state.active_project(id)?;

        if let Some(slug) = &update.slug {
            if state.projects.values().any(|p| &p.slug == slug && p.id != id) {
                return Err(DatabaseError::conflict(format!("slug {slug} already exists")));
            }
        }

        let project = state
            .projects
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::not_found(format!("project {id}")))?;

        if let Some(title) = update.title {
            project.title = title;
        }
        if let Some(slug) = update.slug {
            project.slug = slug;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        if let Some(thumb) = update.thumb {
            project.thumb = Some(thumb);
        }
        if let Some(release) = update.release {
            project.release = release;
        }
        if let Some(link) = update.link {
            project.link = link;
        }
        if let Some(type_id) = update.type_id {
            project.type_id = type_id;
        }
        project.updated_at = Utc::now();

        Ok(project.clone())
    }

    async fn soft_delete_project(&self, id: i64) -> DatabaseResult<ProjectInfo> {
        let mut state = self.state.write().await;
        state.active_project(id)?;

        let project = state
            .projects
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::not_found(format!("project {id}")))?;
        let now = Utc::now();
        project.deleted_at = Some(now);
        project.updated_at = now;

        Ok(project.clone())
    }

    async fn project_technologies(&self, id: i64) -> DatabaseResult<Vec<TechnologyInfo>> {
        let state = self.state.read().await;
        Ok(state
            .technology_ids_of(id)
            .into_iter()
            .filter_map(|technology_id| state.technologies.get(&technology_id).cloned())
            .collect())
    }

    async fn attach_technologies(&self, id: i64, technology_ids: &[i64]) -> DatabaseResult<()> {
        let mut state = self.state.write().await;
        state.active_project(id)?;
        state.ensure_technologies(technology_ids)?;

        let existing = state.technology_ids_of(id);
        if let Some(duplicate) = technology_ids.iter().find(|t| existing.contains(*t)) {
            return Err(DatabaseError::conflict(format!("technology {duplicate} already attached to project {id}")));
        }

        state
            .project_technology
            .extend(technology_ids.iter().map(|technology_id| (id, *technology_id)));
        Ok(())
    }

    async fn sync_technologies(&self, id: i64, technology_ids: &[i64]) -> DatabaseResult<TechnologySync> {
        let mut state = self.state.write().await;
        state.active_project(id)?;
        state.ensure_technologies(technology_ids)?;

        let sync = diff_technologies(&state.technology_ids_of(id), technology_ids);
        for technology_id in &sync.detached {
            state.project_technology.remove(&(id, *technology_id));
        }
        for technology_id in &sync.attached {
            state.project_technology.insert((id, *technology_id));
        }

        Ok(sync)
    }

    async fn detach_technologies(&self, id: i64) -> DatabaseResult<u64> {
        let mut state = self.state.write().await;
        let before = state.project_technology.len();
        state.project_technology.retain(|(project_id, _)| *project_id != id);
        Ok((before - state.project_technology.len()) as u64)
    }
}

#[async_trait::async_trait]
impl TypeRepositoryTrait for MemoryDatabase {
    async fn list_types(&self) -> DatabaseResult<Vec<TypeInfo>> {
        Ok(self.state.read().await.types.values().cloned().collect())
    }

    async fn get_type_by_id(&self, id: i64) -> DatabaseResult<Option<TypeInfo>> {
        Ok(self.state.read().await.types.get(&id).cloned())
    }
}

#[async_trait::async_trait]
impl TechnologyRepositoryTrait for MemoryDatabase {
    async fn list_technologies(&self) -> DatabaseResult<Vec<TechnologyInfo>> {
        Ok(self.state.read().await.technologies.values().cloned().collect())
    }

    async fn find_technologies_by_ids(&self, ids: &[i64]) -> DatabaseResult<Vec<TechnologyInfo>> {
        let state = self.state.read().await;
        let ids: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(ids
            .into_iter()
            .filter_map(|id| state.technologies.get(&id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_project(title: &str, slug: &str) -> ProjectCreate {
        ProjectCreate {
            title: title.to_string(),
            slug: slug.to_string(),
            description: None,
            thumb: Some(format!("projects/{slug}.png")),
            release: None,
            link: None,
            type_id: None,
        }
    }

    #[tokio::test]
    async fn soft_deleted_projects_are_hidden_but_keep_their_slug() {
        let db = MemoryDatabase::new();
        let project = db.create_project(new_project("Blog", "blog")).await.unwrap();

        db.soft_delete_project(project.id).await.unwrap();

        assert!(db.list_projects().await.unwrap().is_empty());
        assert!(db.find_project_by_slug("blog").await.unwrap().is_none());
        assert!(db.slug_exists("blog", None).await.unwrap());

        let trashed = db.find_project_with_trashed("blog").await.unwrap();
        assert!(trashed.is_trashed());
    }

    #[tokio::test]
    async fn slug_exists_can_ignore_a_project() {
        let db = MemoryDatabase::new();
        let project = db.create_project(new_project("Blog", "blog")).await.unwrap();

        assert!(db.slug_exists("blog", None).await.unwrap());
        assert!(!db.slug_exists("blog", Some(project.id)).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let db = MemoryDatabase::new();
        db.create_project(new_project("Blog", "blog")).await.unwrap();

        let result = db.create_project(new_project("Blog", "blog")).await;
        assert!(matches!(result, Err(DatabaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn sync_replaces_associations() {
        let db = MemoryDatabase::new();
        let vue = db.add_technology("Vue").await;
        let react = db.add_technology("React").await;
        let php = db.add_technology("PHP").await;
        let project = db.create_project(new_project("Blog", "blog")).await.unwrap();

        db.attach_technologies(project.id, &[vue.id, react.id]).await.unwrap();
        let sync = db.sync_technologies(project.id, &[react.id, php.id]).await.unwrap();

        assert_eq!(sync.attached, vec![php.id]);
        assert_eq!(sync.detached, vec![vue.id]);
        assert_eq!(db.project_technologies(project.id).await.unwrap(), vec![react, php]);
    }

    #[tokio::test]
    async fn attach_rejects_existing_association() {
        let db = MemoryDatabase::new();
        let vue = db.add_technology("Vue").await;
        let project = db.create_project(new_project("Blog", "blog")).await.unwrap();

        db.attach_technologies(project.id, &[vue.id]).await.unwrap();
        let result = db.attach_technologies(project.id, &[vue.id]).await;

        assert!(matches!(result, Err(DatabaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn detach_removes_only_that_project() {
        let db = MemoryDatabase::new();
        let vue = db.add_technology("Vue").await;
        let blog = db.create_project(new_project("Blog", "blog")).await.unwrap();
        let shop = db.create_project(new_project("Shop", "shop")).await.unwrap();
        db.attach_technologies(blog.id, &[vue.id]).await.unwrap();
        db.attach_technologies(shop.id, &[vue.id]).await.unwrap();

        assert_eq!(db.detach_technologies(blog.id).await.unwrap(), 1);

        assert!(db.project_technologies(blog.id).await.unwrap().is_empty());
        assert_eq!(db.association_count().await, 1);
    }

    #[tokio::test]
    async fn update_keeps_unset_fields() {
        let db = MemoryDatabase::new();
        let project = db.create_project(new_project("Blog", "blog")).await.unwrap();

        let updated = db
            .update_project(
                project.id,
                ProjectUpdate { description: Some(Some("Personal blog".to_string())), ..Default::default() },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Blog");
        assert_eq!(updated.slug, "blog");
        assert_eq!(updated.thumb, project.thumb);
        assert_eq!(updated.description.as_deref(), Some("Personal blog"));
    }

    #[tokio::test]
    async fn update_clears_nullable_fields() {
        let db = MemoryDatabase::new();
        let web = db.add_type("Web").await;
        let project = db
            .create_project(ProjectCreate {
                description: Some("Personal blog".to_string()),
                link: Some("https://example.com".to_string()),
                type_id: Some(web.id),
                ..new_project("Blog", "blog")
            })
            .await
            .unwrap();

        let update = ProjectUpdate { description: Some(None), link: Some(None), ..Default::default() };
        let updated = db.update_project(project.id, update).await.unwrap();

        assert_eq!(updated.description, None);
        assert_eq!(updated.link, None);
        assert_eq!(updated.type_id, Some(web.id));
    }

    #[tokio::test]
    async fn trashed_projects_cannot_be_updated() {
        let db = MemoryDatabase::new();
        let project = db.create_project(new_project("Blog", "blog")).await.unwrap();
        db.soft_delete_project(project.id).await.unwrap();

        let result = db.update_project(project.id, ProjectUpdate::default()).await;
        assert!(matches!(result, Err(DatabaseError::NotFound(_))));
    }
}
