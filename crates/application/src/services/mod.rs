mod live_statistics_service;
mod live_statistics_service_tests;

pub use live_statistics_service::{LiveStatisticsService, LiveStatisticsServiceDependencies};
