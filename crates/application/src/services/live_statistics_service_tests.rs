//! 直播统计服务单元测试
//!
//! 覆盖创建、更新、查询三类操作：创建/更新各触发恰好一次
//! 直播云调用和一次处理器调用，查询不触发外部调用。

#[cfg(test)]
mod live_statistics_service_tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use domain::{
        LiveId, LiveStatistics, LiveStatisticsRepository, NewLiveStatistics, RepositoryError,
        RepositoryResult, StatisticsId, StatisticsKind, Timestamp,
    };
    use serde_json::{json, Value as JsonValue};
    use tokio::sync::RwLock;
    use uuid::Uuid;

    use crate::clock::SystemClock;
    use crate::live_client::{LiveClientResponse, MockLiveClient};
    use crate::processor::{MockStatisticsProcessor, ProcessorProvider, StatisticsProcessor};
    use crate::services::{LiveStatisticsService, LiveStatisticsServiceDependencies};

    /// 内存仓储，等价于原服务的 DAO 存储
    #[derive(Default)]
    struct InMemoryLiveStatisticsRepository {
        records: RwLock<Vec<LiveStatistics>>,
    }

    #[async_trait]
    impl LiveStatisticsRepository for InMemoryLiveStatisticsRepository {
        async fn create(
            &self,
            statistics: NewLiveStatistics,
        ) -> RepositoryResult<LiveStatistics> {
            let record = LiveStatistics {
                id: StatisticsId::from(Uuid::new_v4()),
                live_id: statistics.live_id,
                kind: statistics.kind,
                data: statistics.data,
                created_at: statistics.created_at,
                updated_at: statistics.created_at,
            };
            self.records.write().await.push(record.clone());
            Ok(record)
        }

        async fn update_data(
            &self,
            id: StatisticsId,
            data: JsonValue,
            updated_at: Timestamp,
        ) -> RepositoryResult<LiveStatistics> {
            let mut records = self.records.write().await;
            let record = records
                .iter_mut()
                .find(|record| record.id == id)
                .ok_or(RepositoryError::NotFound)?;
            record.data = data;
            record.updated_at = updated_at;
            Ok(record.clone())
        }

        async fn find_by_live_id(
            &self,
            live_id: LiveId,
            kind: StatisticsKind,
        ) -> RepositoryResult<Option<LiveStatistics>> {
            let records = self.records.read().await;
            Ok(records
                .iter()
                .find(|record| record.live_id == live_id && record.kind == kind)
                .cloned())
        }

        async fn find_by_live_ids(
            &self,
            kind: StatisticsKind,
            live_ids: &[LiveId],
        ) -> RepositoryResult<HashMap<LiveId, LiveStatistics>> {
            let records = self.records.read().await;
            Ok(records
                .iter()
                .filter(|record| record.kind == kind && live_ids.contains(&record.live_id))
                .map(|record| (record.live_id, record.clone()))
                .collect())
        }
    }

    /// 固定返回同一个处理器的工厂，对应测试中替换处理器的注入点
    struct StubProcessorProvider {
        processor: Arc<dyn StatisticsProcessor>,
    }

    impl ProcessorProvider for StubProcessorProvider {
        fn processor_for(&self, _kind: StatisticsKind) -> Arc<dyn StatisticsProcessor> {
            Arc::clone(&self.processor)
        }
    }

    fn processed_payload() -> JsonValue {
        json!({
            "data": {
                "success": 1,
                "detail": "test detail",
            }
        })
    }

    fn mock_processor() -> MockStatisticsProcessor {
        let mut processor = MockStatisticsProcessor::new();
        processor
            .expect_process()
            .times(1)
            .returning(|_, _, _| Ok(processed_payload()));
        processor
    }

    fn mock_checkin_client() -> MockLiveClient {
        let mut client = MockLiveClient::new();
        client
            .expect_list_checkins()
            .times(1)
            .returning(|_| Ok(LiveClientResponse { code: 0, data: json!([]) }));
        client
    }

    fn mock_visitor_client() -> MockLiveClient {
        let mut client = MockLiveClient::new();
        client
            .expect_list_visitor_history()
            .times(1)
            .returning(|_| Ok(LiveClientResponse { code: 0, data: json!([]) }));
        client
    }

    fn build_service(
        repository: Arc<InMemoryLiveStatisticsRepository>,
        client: MockLiveClient,
        processor: MockStatisticsProcessor,
    ) -> LiveStatisticsService {
        LiveStatisticsService::new(LiveStatisticsServiceDependencies {
            repository,
            live_client: Arc::new(client),
            processors: Arc::new(StubProcessorProvider {
                processor: Arc::new(processor),
            }),
            clock: Arc::new(SystemClock),
        })
    }

    /// 查询类测试不允许触发外部调用，空 mock 一旦被调用立即失败
    fn build_query_service(
        repository: Arc<InMemoryLiveStatisticsRepository>,
    ) -> LiveStatisticsService {
        build_service(repository, MockLiveClient::new(), MockStatisticsProcessor::new())
    }

    async fn create_empty_record(
        repository: &InMemoryLiveStatisticsRepository,
        live_id: LiveId,
        kind: StatisticsKind,
    ) -> LiveStatistics {
        repository
            .create(NewLiveStatistics::empty(live_id, kind, Utc::now()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_checkin_statistics() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());
        let service = build_service(Arc::clone(&repository), mock_checkin_client(), mock_processor());

        let live_id = LiveId::new(1);
        let result = service.create_checkin_statistics(live_id).await.unwrap();

        assert_eq!(result.live_id, live_id);
        assert_eq!(result.kind, StatisticsKind::Checkin);
        assert_eq!(result.data, processed_payload());
    }

    #[tokio::test]
    async fn test_create_visitor_statistics() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());
        let service = build_service(Arc::clone(&repository), mock_visitor_client(), mock_processor());

        let live_id = LiveId::new(1);
        let result = service.create_visitor_statistics(live_id).await.unwrap();

        assert_eq!(result.live_id, live_id);
        assert_eq!(result.kind, StatisticsKind::Visitor);
        assert_eq!(result.data, processed_payload());
    }

    #[tokio::test]
    async fn test_get_checkin_statistics_by_live_id() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());
        let service = build_query_service(Arc::clone(&repository));

        let live_id = LiveId::new(1);
        let result = service.get_checkin_statistics_by_live_id(live_id).await.unwrap();
        assert!(result.is_none());

        let existed_checkin =
            create_empty_record(&repository, live_id, StatisticsKind::Checkin).await;
        create_empty_record(&repository, live_id, StatisticsKind::Visitor).await;

        let result = service
            .get_checkin_statistics_by_live_id(live_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.id, existed_checkin.id);
    }

    #[tokio::test]
    async fn test_get_visitor_statistics_by_live_id() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());
        let service = build_query_service(Arc::clone(&repository));

        let live_id = LiveId::new(1);
        let result = service.get_visitor_statistics_by_live_id(live_id).await.unwrap();
        assert!(result.is_none());

        create_empty_record(&repository, live_id, StatisticsKind::Checkin).await;
        let existed_visitor =
            create_empty_record(&repository, live_id, StatisticsKind::Visitor).await;

        let result = service
            .get_visitor_statistics_by_live_id(live_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.id, existed_visitor.id);
    }

    #[tokio::test]
    async fn test_update_checkin_statistics_without_existed_statistics() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());
        let service = build_service(Arc::clone(&repository), mock_checkin_client(), mock_processor());

        let live_id = LiveId::new(1);
        let result = service.update_checkin_statistics(live_id).await.unwrap();

        assert_eq!(result.live_id, live_id);
        assert_eq!(result.kind, StatisticsKind::Checkin);
        assert_eq!(result.data, processed_payload());
    }

    #[tokio::test]
    async fn test_update_checkin_statistics_with_existed_statistics() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());
        let service = build_service(Arc::clone(&repository), mock_checkin_client(), mock_processor());

        let live_id = LiveId::new(1);
        let existed = create_empty_record(&repository, live_id, StatisticsKind::Checkin).await;
        assert!(!existed.has_data());

        let result = service.update_checkin_statistics(live_id).await.unwrap();

        // 就地刷新：同一条记录被更新，拿到新处理的数据
        assert_eq!(result.id, existed.id);
        assert_eq!(result.live_id, live_id);
        assert_eq!(result.kind, StatisticsKind::Checkin);
        assert_eq!(result.data, processed_payload());

        // 没有产生重复行
        let records = repository
            .find_by_live_ids(StatisticsKind::Checkin, &[live_id])
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_update_visitor_statistics_without_existed_statistics() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());
        let service = build_service(Arc::clone(&repository), mock_visitor_client(), mock_processor());

        let live_id = LiveId::new(1);
        let result = service.update_visitor_statistics(live_id).await.unwrap();

        assert_eq!(result.live_id, live_id);
        assert_eq!(result.kind, StatisticsKind::Visitor);
        assert_eq!(result.data, processed_payload());
    }

    #[tokio::test]
    async fn test_update_visitor_statistics_with_existed_statistics() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());
        let service = build_service(Arc::clone(&repository), mock_visitor_client(), mock_processor());

        let live_id = LiveId::new(1);
        let existed = create_empty_record(&repository, live_id, StatisticsKind::Visitor).await;
        assert!(!existed.has_data());

        let result = service.update_visitor_statistics(live_id).await.unwrap();

        assert_eq!(result.id, existed.id);
        assert_eq!(result.kind, StatisticsKind::Visitor);
        assert_eq!(result.data, processed_payload());
    }

    #[tokio::test]
    async fn test_find_checkin_statistics_by_live_ids() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());
        let service = build_query_service(Arc::clone(&repository));

        let live_ids = [LiveId::new(1), LiveId::new(2), LiveId::new(4)];
        let result = service.find_checkin_statistics_by_live_ids(&live_ids).await.unwrap();
        assert!(result.is_empty());

        let mut expected = HashMap::new();
        expected.insert(
            LiveId::new(1),
            create_empty_record(&repository, LiveId::new(1), StatisticsKind::Checkin).await,
        );
        expected.insert(
            LiveId::new(2),
            create_empty_record(&repository, LiveId::new(2), StatisticsKind::Checkin).await,
        );
        create_empty_record(&repository, LiveId::new(3), StatisticsKind::Checkin).await;

        let result = service.find_checkin_statistics_by_live_ids(&live_ids).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_find_visitor_statistics_by_live_ids() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());
        let service = build_query_service(Arc::clone(&repository));

        let live_ids = [LiveId::new(1), LiveId::new(2), LiveId::new(4)];
        let result = service.find_visitor_statistics_by_live_ids(&live_ids).await.unwrap();
        assert!(result.is_empty());

        let mut expected = HashMap::new();
        expected.insert(
            LiveId::new(1),
            create_empty_record(&repository, LiveId::new(1), StatisticsKind::Visitor).await,
        );
        expected.insert(
            LiveId::new(2),
            create_empty_record(&repository, LiveId::new(2), StatisticsKind::Visitor).await,
        );
        create_empty_record(&repository, LiveId::new(3), StatisticsKind::Visitor).await;

        let result = service.find_visitor_statistics_by_live_ids(&live_ids).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_update_propagates_vendor_failure_code_to_processor() {
        let repository = Arc::new(InMemoryLiveStatisticsRepository::default());

        let mut client = MockLiveClient::new();
        client
            .expect_list_checkins()
            .times(1)
            .returning(|_| Ok(LiveClientResponse { code: 3001, data: JsonValue::Null }));

        let mut processor = MockStatisticsProcessor::new();
        processor
            .expect_process()
            .times(1)
            .withf(|_, _, response| response.code == 3001)
            .returning(|_, _, _| Ok(json!({"data": {"success": 0}})));

        let service = build_service(Arc::clone(&repository), client, processor);

        let result = service
            .update_checkin_statistics(LiveId::new(1))
            .await
            .unwrap();

        assert_eq!(result.data, json!({"data": {"success": 0}}));
    }
}
