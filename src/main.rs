//! 作品集后台服务入口
//!
//! 启动顺序：
//!
//! 1. 加载配置（`.env` + 环境变量）
//! 2. 初始化日志
//! 3. 连接数据库并执行迁移
//! 4. 启动 Web 服务，收到 Ctrl+C 后优雅退出

use color_eyre::eyre::Context;
use color_eyre::Result;
use shared_lib::AppConfig;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = AppConfig::load()?;

    tracing_subscriber::fmt().with_max_level(config.log_level).init();

    let pool = database::initialize_database(config.clone())
        .await
        .context("Initialize postgresql database")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("📴 收到退出信号"),
            Err(e) => error!("❌ 监听退出信号失败: {}", e),
        }
        let _ = shutdown_tx.send(true);
    });

    web_service::start_web_service(config, pool, shutdown_rx).await?;

    info!("👋 服务已退出");
    Ok(())
}
