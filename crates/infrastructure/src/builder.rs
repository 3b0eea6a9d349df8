//! 基础设施装配
//!
//! 按配置把连接池、仓储、直播云客户端和统计服务接在一起。

use std::sync::Arc;

use application::{
    DefaultProcessorProvider, LiveClientError, LiveStatisticsService,
    LiveStatisticsServiceDependencies, SystemClock,
};
use config::AppConfig;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::live_client::HttpLiveClient;
use crate::migrations::MIGRATOR;
use crate::repository::{create_pg_pool, PgLiveStatisticsRepository};

#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("数据库初始化失败: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库迁移失败: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("直播云客户端初始化失败: {0}")]
    LiveClient(#[from] LiveClientError),
}

pub struct Infrastructure {
    pub pool: PgPool,
    pub statistics_service: Arc<LiveStatisticsService>,
}

impl Infrastructure {
    pub async fn build(config: &AppConfig) -> Result<Self, InfrastructureError> {
        let pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;
        MIGRATOR.run(&pool).await?;

        let repository = Arc::new(PgLiveStatisticsRepository::new(pool.clone()));
        let live_client = Arc::new(HttpLiveClient::from_config(&config.live_api)?);

        let statistics_service = LiveStatisticsService::new(LiveStatisticsServiceDependencies {
            repository,
            live_client,
            processors: Arc::new(DefaultProcessorProvider::default()),
            clock: Arc::new(SystemClock),
        });

        info!("live statistics infrastructure ready");
        Ok(Self {
            pool,
            statistics_service: Arc::new(statistics_service),
        })
    }
}
