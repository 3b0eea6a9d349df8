//! 直播统计仓储接口定义

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::errors::RepositoryResult;
use crate::live_statistics::{
    LiveId, LiveStatistics, NewLiveStatistics, StatisticsId, StatisticsKind, Timestamp,
};

/// 直播统计仓储。
///
/// 查询不到记录返回 `None`，不作为错误处理。
#[async_trait]
pub trait LiveStatisticsRepository: Send + Sync {
    /// 插入一条新记录，返回带 id 的完整记录。
    async fn create(&self, statistics: NewLiveStatistics) -> RepositoryResult<LiveStatistics>;

    /// 按 id 覆盖 `data` 字段，返回更新后的记录。
    async fn update_data(
        &self,
        id: StatisticsId,
        data: JsonValue,
        updated_at: Timestamp,
    ) -> RepositoryResult<LiveStatistics>;

    /// 查询某直播间指定类型的统计记录。
    async fn find_by_live_id(
        &self,
        live_id: LiveId,
        kind: StatisticsKind,
    ) -> RepositoryResult<Option<LiveStatistics>>;

    /// 批量查询，结果按 live_id 作键；没有记录的 live_id 不出现在结果中。
    async fn find_by_live_ids(
        &self,
        kind: StatisticsKind,
        live_ids: &[LiveId],
    ) -> RepositoryResult<HashMap<LiveId, LiveStatistics>>;
}
