//! Card Platform Server - 名片平台订单服务
//!
//! # 架构概述
//!
//! 本模块是打印订单履约服务的主入口，提供以下核心功能：
//!
//! - **订单生命周期** (`fulfillment`): 创建草稿订单、确认下单
//! - **状态同步** (`fulfillment::reconcile`): 读取时拉取 + Webhook 推送双通道收敛
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **HTTP API** (`api`): RESTful API 接口 + Webhook 接收
//!
//! # 模块结构
//!
//! ```text
//! card-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── api/           # HTTP 路由和处理器
//! ├── fulfillment/   # 订单生命周期与状态同步
//! ├── utils/         # 错误、日志
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod fulfillment;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______               __
  / ____/___ __________/ /
 / /   / __ `/ ___/ __  /
/ /___/ /_/ / /  / /_/ /
\____/\__,_/_/   \__,_/
    _____
   / ___/___  ______   _____  _____
   \__ \/ _ \/ ___/ | / / _ \/ ___/
  ___/ /  __/ /   | |/ /  __/ /
 /____/\___/_/    |___/\___/_/
    "#
    );
}
