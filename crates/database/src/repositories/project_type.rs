//! 项目分类仓库

use crate::models::TypeInfo;
use crate::repositories::traits::TypeRepositoryTrait;
use crate::DatabaseResult;
use sqlx::PgPool;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TypeRepository {
    pool: PgPool,
}

impl TypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TypeRepositoryTrait for TypeRepository {
    async fn list_types(&self) -> DatabaseResult<Vec<TypeInfo>> {
        let types = sqlx::query_as::<_, TypeInfo>("SELECT id, name FROM types ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        debug!("🔍 查询到 {} 个分类", types.len());
        Ok(types)
    }

    async fn get_type_by_id(&self, id: i64) -> DatabaseResult<Option<TypeInfo>> {
        let project_type = sqlx::query_as::<_, TypeInfo>("SELECT id, name FROM types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(project_type)
    }
}
