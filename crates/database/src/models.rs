//! 数据库模型模块
//!
//! 这里定义与数据库表对应的结构体和相关操作

pub mod project;
pub mod project_type;
pub mod technology;

// 重新导出具体的模型
pub use project::{ProjectCreate, ProjectInfo, ProjectUpdate, TechnologySync};
pub use project_type::TypeInfo;
pub use technology::TechnologyInfo;
