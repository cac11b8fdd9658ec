//! 技术栈仓库

use crate::models::TechnologyInfo;
use crate::repositories::traits::TechnologyRepositoryTrait;
use crate::DatabaseResult;
use sqlx::PgPool;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TechnologyRepository {
    pool: PgPool,
}

impl TechnologyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TechnologyRepositoryTrait for TechnologyRepository {
    async fn list_technologies(&self) -> DatabaseResult<Vec<TechnologyInfo>> {
        let technologies = sqlx::query_as::<_, TechnologyInfo>("SELECT id, name FROM technologies ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        debug!("🔍 查询到 {} 个技术栈", technologies.len());
        Ok(technologies)
    }

    async fn find_technologies_by_ids(&self, ids: &[i64]) -> DatabaseResult<Vec<TechnologyInfo>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let technologies = sqlx::query_as::<_, TechnologyInfo>(
            "SELECT id, name FROM technologies WHERE id = ANY($1::BIGINT[]) ORDER BY id",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(technologies)
    }
}
