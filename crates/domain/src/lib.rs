//! 直播统计领域模型
//!
//! 包含直播统计实体、统计类型，以及仓储接口定义。

pub mod errors;
pub mod live_statistics;
pub mod repository;

// 重新导出常用类型
pub use errors::{DomainError, DomainResult, RepositoryError, RepositoryResult};
pub use live_statistics::{
    LiveId, LiveStatistics, NewLiveStatistics, StatisticsId, StatisticsKind, Timestamp,
};
pub use repository::LiveStatisticsRepository;
