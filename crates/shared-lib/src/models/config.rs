use color_eyre::eyre::{eyre, Context};
use color_eyre::{Help, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

/// 默认监听地址
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// 默认文件存储根目录
pub const DEFAULT_STORAGE_ROOT: &str = "storage/app";

/// 默认上传请求体大小上限（4 MiB）
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 4 * 1024 * 1024;

/// 文件存储配置
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// 本地存储根目录
    ///
    /// 可通过环境变量 `STORAGE_ROOT` 来调整
    pub root: PathBuf,

    /// 单个请求体的最大字节数，缩略图上传受此限制
    ///
    /// 可通过环境变量 `MAX_UPLOAD_SIZE` 来调整
    pub max_upload_size: usize,
}

/// 程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// postgresql数据库链接字符串
    pub postgresql_conn_str: String,

    /// HTTP服务监听地址，环境变量 `BIND_ADDR`
    pub bind_addr: String,

    /// 日志级别，环境变量 `LOG_LEVEL`
    pub log_level: Level,

    /// 文件存储配置
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Arc<AppConfig>> {
        // 加载.env文件中的数据注入到环境变量中，方便本地测试
        // 线上环境部署时会直接使用环境变量，没有.env文件时忽略
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        Ok(Arc::new(config))
    }

    /// 通过 `lookup` 读取配置项，方便在测试中替换环境变量
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 读取数据库地址信息（仅支持postgresql）
        let db_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("Can not load DATABASE_URL in environment"))
            .suggestion("设置 DATABASE_URL 环境变量")?;

        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => level
                .parse::<Level>()
                .with_context(|| format!("Invalid LOG_LEVEL: {level}"))
                .suggestion("可选值: TRACE/DEBUG/INFO/WARN/ERROR")?,
            None => Level::DEBUG,
        };

        let max_upload_size = match lookup("MAX_UPLOAD_SIZE") {
            Some(size) => size
                .parse::<usize>()
                .with_context(|| format!("Invalid MAX_UPLOAD_SIZE: {size}"))
                .suggestion("MAX_UPLOAD_SIZE 以字节为单位，例如 4194304")?,
            None => DEFAULT_MAX_UPLOAD_SIZE,
        };

        Ok(AppConfig {
            postgresql_conn_str: db_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            log_level,
            storage: StorageConfig {
                root: lookup("STORAGE_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT)),
                max_upload_size,
            },
        })
    }
}
