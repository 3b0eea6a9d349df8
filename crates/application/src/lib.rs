//! 应用层实现。
//!
//! 这里提供围绕直播统计领域模型的用例服务，处理统计数据的拉取、
//! 归一化与持久化，以及对外部适配器（直播云客户端、结果处理器）的抽象。

pub mod clock;
pub mod error;
pub mod live_client;
pub mod processor;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use error::{ApplicationError, ApplicationResult};
pub use live_client::{LiveClient, LiveClientError, LiveClientResponse};
pub use processor::{
    CheckinStatisticsProcessor, DefaultProcessorProvider, ProcessorError, ProcessorProvider,
    StatisticsProcessor, VisitorStatisticsProcessor,
};
pub use services::{LiveStatisticsService, LiveStatisticsServiceDependencies};
