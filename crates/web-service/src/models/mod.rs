//! Web 层数据模型
//!
//! - [`common`]：通用的 json-api 返回结构
//! - [`err`]：错误类型以及到 HTTP 响应的转换
//! - [`projects`]：项目相关的请求/响应结构

pub mod common;
pub mod err;
pub mod projects;
