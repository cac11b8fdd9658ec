//! 数据库仓库模块
//!
//! 这里定义数据库操作的Repository层：
//! - PostgreSQL 实现：[`ProjectRepository`]、[`TypeRepository`]、[`TechnologyRepository`]
//! - 内存实现：[`MemoryDatabase`]，用于本地开发和测试

pub mod memory;
pub mod project;
pub mod project_type;
pub mod technology;
pub mod traits;

// 重新导出具体的类型
pub use memory::MemoryDatabase;
pub use project::ProjectRepository;
pub use project_type::TypeRepository;
pub use technology::TechnologyRepository;
pub use traits::{ProjectRepositoryTrait, TechnologyRepositoryTrait, TypeRepositoryTrait};
