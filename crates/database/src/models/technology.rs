/// 技术栈
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TechnologyInfo {
    pub id: i64,
    pub name: String,
}
