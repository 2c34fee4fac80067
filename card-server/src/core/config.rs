use crate::utils::{AppError, AppResult};

/// 服务器配置 - 订单履约服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/cardplatform | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | PRINT_API_URL | https://api.printprovider.example | 履约服务商 API 地址 |
/// | PRINT_API_KEY | (必需) | 履约服务商 API 密钥 |
/// | PRINT_WEBHOOK_SECRET | (必需) | Webhook 共享密钥 |
/// | PRINT_TIMEOUT_SECS | 30 | 服务商请求超时(秒) |
/// | SWEEP_INTERVAL_SECS | 60 | 履约意图扫描间隔(秒) |
/// | SWEEP_STALE_AFTER_SECS | 120 | 意图视为滞留的时限(秒) |
///
/// # 示例
///
/// ```ignore
/// PRINT_API_KEY=pk_xxx PRINT_WEBHOOK_SECRET=whs_xxx cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 履约服务商配置 ===
    /// 服务商 API 地址
    pub print_api_url: String,
    /// 服务商 API 密钥
    pub print_api_key: String,
    /// Webhook 共享密钥 (header / query 认证)
    pub webhook_secret: String,
    /// 服务商请求超时 (秒)
    pub print_timeout_secs: u64,

    // === 意图扫描配置 ===
    /// 扫描间隔 (秒)
    pub sweep_interval_secs: u64,
    /// 意图滞留时限 (秒)，超过后进入修复流程
    pub sweep_stale_after_secs: i64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 缺少必需的服务商密钥或 Webhook 密钥时立即失败，
    /// 避免启动一个无法认证推送事件的服务。
    pub fn from_env() -> AppResult<Self> {
        let print_api_key = require_env("PRINT_API_KEY")?;
        let webhook_secret = require_env("PRINT_WEBHOOK_SECRET")?;

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/cardplatform".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            print_api_url: std::env::var("PRINT_API_URL")
                .unwrap_or_else(|_| "https://api.printprovider.example".into()),
            print_api_key,
            webhook_secret,
            print_timeout_secs: std::env::var("PRINT_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            sweep_stale_after_secs: std::env::var("SWEEP_STALE_AFTER_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(120),
        })
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        work_dir: impl Into<String>,
        http_port: u16,
        api_key: impl Into<String>,
        webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port,
            environment: "development".into(),
            print_api_url: "https://api.printprovider.example".into(),
            print_api_key: api_key.into(),
            webhook_secret: webhook_secret.into(),
            print_timeout_secs: 30,
            sweep_interval_secs: 60,
            sweep_stale_after_secs: 120,
        }
    }

    /// 数据库目录
    pub fn database_dir(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.work_dir).join("database")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn require_env(key: &str) -> AppResult<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::config(format!(
            "Missing required environment variable: {key}"
        ))),
    }
}
