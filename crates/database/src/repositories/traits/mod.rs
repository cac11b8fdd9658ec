//! 数据库仓库 trait 定义
//!
//! 每个实体对应一个仓库 trait，而不是共享一个通用的基类：
//!
//! | 实体 | trait | 说明 |
//! |------|-------|------|
//! | 项目 | [`ProjectRepositoryTrait`] | 增删改查、软删除、技术栈关联 |
//! | 分类 | [`TypeRepositoryTrait`] | 只读 |
//! | 技术栈 | [`TechnologyRepositoryTrait`] | 只读 |
//!
//! ## Trait 约束 📚
//!
//! 所有仓库 trait 都要求 `Send + Sync + 'static`：
//!
//! - `Send` / `Sync`：仓库实例会被 `Arc` 包装后在多个请求（多个线程）之间共享
//! - `'static`：服务层作为 axum 的共享状态长期存活，不能持有短期引用
//!
//! 服务层通过泛型参数使用这些 trait（而不是 trait object），
//! 因此生产环境使用 PostgreSQL 实现，测试中可以直接替换为 [`crate::MemoryDatabase`]：
//!
//! ```rust,ignore
//! let service = ProjectService::new(
//!     ProjectRepository::new(pool.clone()),
//!     TypeRepository::new(pool.clone()),
//!     TechnologyRepository::new(pool.clone()),
//!     LocalStorage::new("storage/app"),
//! );
//! ```

pub mod project;
pub mod project_type;
pub mod technology;

// 重新导出
pub use project::ProjectRepositoryTrait;
pub use project_type::TypeRepositoryTrait;
pub use technology::TechnologyRepositoryTrait;
