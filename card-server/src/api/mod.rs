//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`print_orders`] - 打印订单管理接口
//! - [`catalog`] - 服务商商品/运输方式透传接口
//! - [`webhooks`] - 履约服务商 Webhook 接收

pub mod catalog;
pub mod health;
pub mod print_orders;
pub mod webhooks;
