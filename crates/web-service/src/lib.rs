//! Web服务模块
//!
//! 提供 HTTP API 接口和文档服务

use axum::extract::DefaultBodyLimit;
use color_eyre::eyre::Context;
use color_eyre::Result;
use database::{DatabasePool, ProjectRepository, TechnologyRepository, TypeRepository};
use shared_lib::AppConfig;
use std::sync::Arc;
use tokio::sync::watch::Receiver;
use tracing::info;

pub mod models;
pub mod routes;
pub mod services;
pub mod storage;

use services::{ProjectService, ProjectServiceTrait};
use storage::LocalStorage;

/// 应用共享状态
#[derive(Clone)]
pub struct AppState<PS: ProjectServiceTrait> {
    pub project_service: PS,
}

/// 生产环境使用的项目服务：PostgreSQL 仓库 + 本地文件存储
pub type ConcreteProjectService = ProjectService<ProjectRepository, TypeRepository, TechnologyRepository, LocalStorage>;

/// 具体的 AppState 类型别名
pub type ConcreteAppState = AppState<ConcreteProjectService>;

impl ConcreteAppState {
    pub fn new(config: &AppConfig, pool: DatabasePool) -> Self {
        let project_service = ProjectService::new(
            ProjectRepository::new(pool.clone()),
            TypeRepository::new(pool.clone()),
            TechnologyRepository::new(pool),
            LocalStorage::new(config.storage.root.clone()),
        );

        Self { project_service }
    }
}

/// 启动 Web 服务
pub async fn start_web_service(config: Arc<AppConfig>, pool: DatabasePool, mut shutdown_rx: Receiver<bool>) -> Result<()> {
    let shared_state = ConcreteAppState::new(&config, pool);

    let router = routes::create_app_router(shared_state).layer(DefaultBodyLimit::max(config.storage.max_upload_size));

    info!("🚀 启动 Web Service 在 {}", config.bind_addr);
    info!("📁 文件存储目录: {}", config.storage.root.display());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Bind {}", config.bind_addr))?;

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            // 发送端被丢弃时同样视为关闭信号
            let _ = shutdown_rx.changed().await;
            info!("🛑 Web Service 正在关闭...");
        })
        .await?;

    Ok(())
}
