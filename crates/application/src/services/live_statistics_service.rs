use std::collections::HashMap;
use std::sync::Arc;

use domain::{
    LiveId, LiveStatistics, LiveStatisticsRepository, NewLiveStatistics, StatisticsKind,
};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::{
    clock::Clock,
    error::ApplicationResult,
    live_client::LiveClient,
    processor::ProcessorProvider,
};

pub struct LiveStatisticsServiceDependencies {
    pub repository: Arc<dyn LiveStatisticsRepository>,
    pub live_client: Arc<dyn LiveClient>,
    pub processors: Arc<dyn ProcessorProvider>,
    pub clock: Arc<dyn Clock>,
}

/// 直播统计用例服务。
///
/// 创建/更新时从直播云拉取原始数据，经处理器归一化后落库；
/// 查询操作直接读仓储，不触发外部调用。
pub struct LiveStatisticsService {
    deps: LiveStatisticsServiceDependencies,
}

impl LiveStatisticsService {
    pub fn new(deps: LiveStatisticsServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn create_checkin_statistics(
        &self,
        live_id: LiveId,
    ) -> ApplicationResult<LiveStatistics> {
        self.create_statistics(live_id, StatisticsKind::Checkin).await
    }

    pub async fn create_visitor_statistics(
        &self,
        live_id: LiveId,
    ) -> ApplicationResult<LiveStatistics> {
        self.create_statistics(live_id, StatisticsKind::Visitor).await
    }

    pub async fn update_checkin_statistics(
        &self,
        live_id: LiveId,
    ) -> ApplicationResult<LiveStatistics> {
        self.update_statistics(live_id, StatisticsKind::Checkin).await
    }

    pub async fn update_visitor_statistics(
        &self,
        live_id: LiveId,
    ) -> ApplicationResult<LiveStatistics> {
        self.update_statistics(live_id, StatisticsKind::Visitor).await
    }

    pub async fn get_checkin_statistics_by_live_id(
        &self,
        live_id: LiveId,
    ) -> ApplicationResult<Option<LiveStatistics>> {
        let record = self
            .deps
            .repository
            .find_by_live_id(live_id, StatisticsKind::Checkin)
            .await?;
        Ok(record)
    }

    pub async fn get_visitor_statistics_by_live_id(
        &self,
        live_id: LiveId,
    ) -> ApplicationResult<Option<LiveStatistics>> {
        let record = self
            .deps
            .repository
            .find_by_live_id(live_id, StatisticsKind::Visitor)
            .await?;
        Ok(record)
    }

    pub async fn find_checkin_statistics_by_live_ids(
        &self,
        live_ids: &[LiveId],
    ) -> ApplicationResult<HashMap<LiveId, LiveStatistics>> {
        let records = self
            .deps
            .repository
            .find_by_live_ids(StatisticsKind::Checkin, live_ids)
            .await?;
        Ok(records)
    }

    pub async fn find_visitor_statistics_by_live_ids(
        &self,
        live_ids: &[LiveId],
    ) -> ApplicationResult<HashMap<LiveId, LiveStatistics>> {
        let records = self
            .deps
            .repository
            .find_by_live_ids(StatisticsKind::Visitor, live_ids)
            .await?;
        Ok(records)
    }

    async fn create_statistics(
        &self,
        live_id: LiveId,
        kind: StatisticsKind,
    ) -> ApplicationResult<LiveStatistics> {
        let data = self.fetch_processed_data(live_id, kind).await?;
        let now = self.deps.clock.now();

        let record = self
            .deps
            .repository
            .create(NewLiveStatistics::with_data(live_id, kind, data, now))
            .await?;

        debug!(%live_id, kind = %kind, id = %record.id, "created live statistics record");
        Ok(record)
    }

    async fn update_statistics(
        &self,
        live_id: LiveId,
        kind: StatisticsKind,
    ) -> ApplicationResult<LiveStatistics> {
        let data = self.fetch_processed_data(live_id, kind).await?;
        let now = self.deps.clock.now();

        // 没有记录则创建，已有记录就地刷新，不产生重复行
        match self.deps.repository.find_by_live_id(live_id, kind).await? {
            Some(existing) => {
                let updated = self
                    .deps
                    .repository
                    .update_data(existing.id, data, now)
                    .await?;
                debug!(%live_id, kind = %kind, id = %updated.id, "refreshed live statistics record");
                Ok(updated)
            }
            None => {
                let record = self
                    .deps
                    .repository
                    .create(NewLiveStatistics::with_data(live_id, kind, data, now))
                    .await?;
                debug!(%live_id, kind = %kind, id = %record.id, "created live statistics record on update");
                Ok(record)
            }
        }
    }

    // 每次创建/更新恰好一次外部拉取、一次处理器调用
    async fn fetch_processed_data(
        &self,
        live_id: LiveId,
        kind: StatisticsKind,
    ) -> ApplicationResult<JsonValue> {
        let response = match kind {
            StatisticsKind::Checkin => self.deps.live_client.list_checkins(live_id).await?,
            StatisticsKind::Visitor => self.deps.live_client.list_visitor_history(live_id).await?,
        };

        if !response.is_success() {
            // 非零 code 不翻译成错误，原样交给处理器
            warn!(%live_id, kind = %kind, code = response.code, "live cloud returned non-zero code");
        }

        let processor = self.deps.processors.processor_for(kind);
        let payload = processor.process(live_id, kind, &response)?;
        Ok(payload)
    }
}
