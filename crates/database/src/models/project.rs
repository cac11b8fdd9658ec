//! 项目数据库模型
//!
//! 定义项目相关的数据库模型结构体

use chrono::{DateTime, NaiveDate, Utc};

/// 项目信息结构体，对应 `projects` 表的一行
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ProjectInfo {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// 缩略图在文件存储中的路径
    pub thumb: Option<String>,
    pub release: Option<NaiveDate>,
    pub link: Option<String>,
    pub type_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 软删除标记，`None` 表示记录有效
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ProjectInfo {
    /// 是否已被软删除
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// 项目创建参数
#[derive(Debug, Clone)]
pub struct ProjectCreate {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumb: Option<String>,
    pub release: Option<NaiveDate>,
    pub link: Option<String>,
    pub type_id: Option<i64>,
}

/// 项目更新参数
///
/// 值为 `None` 的字段保持不变。可空列使用 `Option<Option<T>>`，
/// `Some(None)` 表示把该列清空为 `NULL`。
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub thumb: Option<String>,
    pub release: Option<Option<NaiveDate>>,
    pub link: Option<Option<String>>,
    pub type_id: Option<Option<i64>>,
}

/// 技术栈关联同步结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologySync {
    /// 新增关联的技术ID
    pub attached: Vec<i64>,
    /// 移除关联的技术ID
    pub detached: Vec<i64>,
}
