//! 项目仓库
//!
//! 负责项目相关的数据库操作

use crate::models::{ProjectCreate, ProjectInfo, ProjectUpdate, TechnologyInfo, TechnologySync};
use crate::repositories::traits::ProjectRepositoryTrait;
use crate::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use std::collections::BTreeSet;
use tracing::debug;

/// `projects` 表返回的列，和 [`ProjectInfo`] 字段一一对应
const PROJECT_COLUMNS: &str =
    r#"id, title, slug, description, thumb, "release", link, type_id, created_at, updated_at, deleted_at"#;

/// 项目仓库结构体
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// 创建新的项目仓库实例
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProjectRepositoryTrait for ProjectRepository {
    async fn list_projects(&self) -> DatabaseResult<Vec<ProjectInfo>> {
        debug!("🔍 查询项目列表");

        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE deleted_at IS NULL ORDER BY id");
        let projects = sqlx::query_as::<_, ProjectInfo>(&sql).fetch_all(&self.pool).await?;

        debug!("✅ 查询完成 - 找到 {} 个项目", projects.len());
        Ok(projects)
    }

    async fn find_project_by_slug(&self, slug: &str) -> DatabaseResult<Option<ProjectInfo>> {
        debug!("🔍 根据 slug 获取项目: {}", slug);

        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = $1 AND deleted_at IS NULL LIMIT 1");
        let project = sqlx::query_as::<_, ProjectInfo>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(project)
    }

    /// 检查 slug 是否被占用
    ///
    /// ## SQL
    ///
    /// 这里故意不过滤 `deleted_at`：软删除的项目仍然占用它的 slug，
    /// 与 `projects_slug_unique` 唯一约束的范围保持一致。
    async fn slug_exists(&self, slug: &str, ignore_id: Option<i64>) -> DatabaseResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM projects
                WHERE slug = $1
                  AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(slug)
        .bind(ignore_id)
        .fetch_one(&self.pool)
        .await?;

        debug!("🔍 slug {} 是否已存在: {}", slug, exists);
        Ok(exists)
    }

    async fn create_project(&self, project: ProjectCreate) -> DatabaseResult<ProjectInfo> {
        debug!("📝 创建项目: {:#?}", project);

        let sql = format!(
            r#"
            INSERT INTO projects (title, slug, description, thumb, "release", link, type_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
            RETURNING {PROJECT_COLUMNS}
            "#
        );
        let project_info = sqlx::query_as::<_, ProjectInfo>(&sql)
            .bind(project.title)
            .bind(project.slug)
            .bind(project.description)
            .bind(project.thumb)
            .bind(project.release)
            .bind(project.link)
            .bind(project.type_id)
            .fetch_one(&self.pool)
            .await?;

        debug!("✅ 项目创建成功: {}", project_info.slug);
        Ok(project_info)
    }

    /// 更新项目信息
    ///
    /// ## SQL
    ///
    /// 不可为空的列（`title`、`slug`、`thumb`）使用`coalesce`把`None`（数据库null）转换为之前的值。
    ///
    /// 可空列需要区分“没有提交”和“清空”，所以额外绑定一个布尔参数，
    /// 通过 `CASE WHEN` 决定是否写入新值（可能是 `NULL`）。
    async fn update_project(&self, id: i64, update: ProjectUpdate) -> DatabaseResult<ProjectInfo> {
        debug!("🔄 更新项目 {} 信息: {:#?}", id, update);

        let sql = format!(
            r#"
            UPDATE projects
            SET title       = coalesce($2, title),
                slug        = coalesce($3, slug),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                thumb       = coalesce($6, thumb),
                "release"   = CASE WHEN $7 THEN $8 ELSE "release" END,
                link        = CASE WHEN $9 THEN $10 ELSE link END,
                type_id     = CASE WHEN $11 THEN $12 ELSE type_id END,
                updated_at  = now()
            WHERE id = $1
              AND deleted_at IS NULL
            RETURNING {PROJECT_COLUMNS}
            "#
        );
        let project = sqlx::query_as::<_, ProjectInfo>(&sql)
            .bind(id)
            .bind(update.title)
            .bind(update.slug)
            .bind(update.description.is_some())
            .bind(update.description.flatten())
            .bind(update.thumb)
            .bind(update.release.is_some())
            .bind(update.release.flatten())
            .bind(update.link.is_some())
            .bind(update.link.flatten())
            .bind(update.type_id.is_some())
            .bind(update.type_id.flatten())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("project {id}")))?;

        debug!("✅ 项目更新成功: {}", project.slug);
        Ok(project)
    }

    async fn soft_delete_project(&self, id: i64) -> DatabaseResult<ProjectInfo> {
        debug!("🗑️ 软删除项目: {}", id);

        let sql = format!(
            r#"
            UPDATE projects
            SET deleted_at = now(),
                updated_at = now()
            WHERE id = $1
              AND deleted_at IS NULL
            RETURNING {PROJECT_COLUMNS}
            "#
        );
        let project = sqlx::query_as::<_, ProjectInfo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("project {id}")))?;

        debug!("✅ 项目删除成功: {}", project.slug);
        Ok(project)
    }

    async fn project_technologies(&self, id: i64) -> DatabaseResult<Vec<TechnologyInfo>> {
        let technologies = sqlx::query_as::<_, TechnologyInfo>(
            r#"
            SELECT t.id, t.name
            FROM technologies t
                     JOIN project_technology pt ON pt.technology_id = t.id
            WHERE pt.project_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(technologies)
    }

    async fn attach_technologies(&self, id: i64, technology_ids: &[i64]) -> DatabaseResult<()> {
        if technology_ids.is_empty() {
            return Ok(());
        }

        debug!("🔗 项目 {} 关联技术栈: {:?}", id, technology_ids);

        sqlx::query(
            r#"
            INSERT INTO project_technology (project_id, technology_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(id)
        .bind(technology_ids.to_vec())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 同步技术栈关联
    ///
    /// 读取现有关联、删除多余关联、插入缺少的关联在同一个事务中完成。
    async fn sync_technologies(&self, id: i64, technology_ids: &[i64]) -> DatabaseResult<TechnologySync> {
        let mut tx = self.pool.begin().await?;

        let current: BTreeSet<i64> = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT technology_id
            FROM project_technology
            WHERE project_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .collect();

        let sync = diff_technologies(&current, technology_ids);

        if !sync.detached.is_empty() {
            sqlx::query("DELETE FROM project_technology WHERE project_id = $1 AND technology_id = ANY($2::BIGINT[])")
                .bind(id)
                .bind(&sync.detached)
                .execute(&mut *tx)
                .await?;
        }

        if !sync.attached.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO project_technology (project_id, technology_id)
                SELECT $1, UNNEST($2::BIGINT[])
                "#,
            )
            .bind(id)
            .bind(&sync.attached)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!("🔗 项目 {} 技术栈同步完成: {:?}", id, sync);
        Ok(sync)
    }

    async fn detach_technologies(&self, id: i64) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM project_technology WHERE project_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!("✂️ 项目 {} 移除了 {} 个技术栈关联", id, result.rows_affected());
        Ok(result.rows_affected())
    }
}

/// 计算现有关联与目标集合的差异
pub(crate) fn diff_technologies(current: &BTreeSet<i64>, target: &[i64]) -> TechnologySync {
    let target: BTreeSet<i64> = target.iter().copied().collect();

    TechnologySync {
        attached: target.difference(current).copied().collect(),
        detached: current.difference(&target).copied().collect(),
    }
}
