use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::db::DbService;
use crate::fulfillment::IntentSweeper;
use crate::utils::AppResult;
use fulfillment_client::{ClientConfig, FulfillmentClient, ProviderApi};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是订单服务的核心数据结构。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | provider | Arc<dyn ProviderApi> | 履约服务商客户端 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 履约服务商客户端 (测试中可替换为 mock)
    pub provider: Arc<dyn ProviderApi>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替；
    /// 测试场景用它注入内存数据库和 mock 服务商。
    pub fn new(config: Config, db: Surreal<Db>, provider: Arc<dyn ProviderApi>) -> Self {
        Self {
            config,
            db,
            provider,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库 (work_dir/database/card.db)
    /// 2. 履约服务商客户端 (复用连接池，带超时和重试策略)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        // 1. Initialize DB
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)
            .map_err(|e| crate::utils::AppError::internal(format!("Failed to create database dir: {e}")))?;
        let db_path = db_dir.join("card.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        // 2. Initialize provider client
        let client_config = ClientConfig::new(&config.print_api_url, &config.print_api_key)
            .with_timeout(config.print_timeout_secs);
        let provider: Arc<dyn ProviderApi> = Arc::new(FulfillmentClient::new(&client_config));

        Ok(Self::new(config.clone(), db_service.db, provider))
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 履约意图扫描 (IntentSweeper)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let sweeper = IntentSweeper::new(
            self.db.clone(),
            self.provider.clone(),
            std::time::Duration::from_secs(self.config.sweep_interval_secs),
            self.config.sweep_stale_after_secs * 1000,
        );
        let token = tasks.shutdown_token();
        tasks.spawn("intent_sweeper", TaskKind::Periodic, async move {
            sweeper.run(token).await;
        });

        tasks.log_summary();
        tasks
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
