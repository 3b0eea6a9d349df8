//! 基础设施层实现。
//!
//! 提供数据库仓储、直播云 HTTP 客户端等适配器，实现应用/领域层定义的接口。

pub mod builder;
pub mod live_client;
pub mod migrations;
pub mod repository;

pub use builder::{Infrastructure, InfrastructureError};
pub use live_client::HttpLiveClient;
pub use migrations::MIGRATOR;
pub use repository::{create_pg_pool, PgLiveStatisticsRepository};
