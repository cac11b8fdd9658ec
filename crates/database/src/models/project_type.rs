/// 项目分类
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TypeInfo {
    pub id: i64,
    pub name: String,
}
