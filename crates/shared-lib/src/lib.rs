//! 🔧 共享库模块
//!
//! 这个模块包含了在多个服务之间共享的通用代码，包括：
//! - 程序配置
//! - Slug 生成工具

pub mod models;
pub mod slug;

// 重新导出常用类型
pub use models::{AppConfig, StorageConfig};
pub use slug::{generate_slug, slugify, try_generate_slug, SlugCandidates, MAX_SLUG_BASE_LENGTH};
