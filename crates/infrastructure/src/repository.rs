//! 直播统计仓储的 Postgres 实现

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    LiveId, LiveStatistics, LiveStatisticsRepository, NewLiveStatistics, RepositoryError,
    RepositoryResult, StatisticsId, StatisticsKind, Timestamp,
};
use serde_json::Value as JsonValue;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(ref db_err) if db_err.code().is_some_and(|code| code == "23505") => {
            RepositoryError::Conflict
        }
        other => {
            let message = other.to_string();
            RepositoryError::storage_with_source(message, other)
        }
    }
}

#[derive(Debug, FromRow)]
struct LiveStatisticsRecord {
    id: Uuid,
    live_id: i64,
    kind: String,
    data: JsonValue,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LiveStatisticsRecord> for LiveStatistics {
    type Error = RepositoryError;

    fn try_from(value: LiveStatisticsRecord) -> Result<Self, Self::Error> {
        let kind = StatisticsKind::parse(&value.kind)?;

        Ok(LiveStatistics {
            id: StatisticsId::from(value.id),
            live_id: LiveId::from(value.live_id),
            kind,
            data: value.data,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgLiveStatisticsRepository {
    pool: PgPool,
}

impl PgLiveStatisticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LiveStatisticsRepository for PgLiveStatisticsRepository {
    async fn create(&self, statistics: NewLiveStatistics) -> RepositoryResult<LiveStatistics> {
        let record = sqlx::query_as::<_, LiveStatisticsRecord>(
            r#"
            INSERT INTO live_statistics (id, live_id, kind, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, live_id, kind, data, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(i64::from(statistics.live_id))
        .bind(statistics.kind.as_str())
        .bind(&statistics.data)
        .bind(statistics.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        LiveStatistics::try_from(record)
    }

    async fn update_data(
        &self,
        id: StatisticsId,
        data: JsonValue,
        updated_at: Timestamp,
    ) -> RepositoryResult<LiveStatistics> {
        let record = sqlx::query_as::<_, LiveStatisticsRecord>(
            r#"
            UPDATE live_statistics
            SET data = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, live_id, kind, data, created_at, updated_at
            "#,
        )
        .bind(Uuid::from(id))
        .bind(&data)
        .bind(updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        LiveStatistics::try_from(record)
    }

    async fn find_by_live_id(
        &self,
        live_id: LiveId,
        kind: StatisticsKind,
    ) -> RepositoryResult<Option<LiveStatistics>> {
        let record = sqlx::query_as::<_, LiveStatisticsRecord>(
            r#"
            SELECT id, live_id, kind, data, created_at, updated_at
            FROM live_statistics
            WHERE live_id = $1 AND kind = $2
            "#,
        )
        .bind(i64::from(live_id))
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(LiveStatistics::try_from).transpose()
    }

    async fn find_by_live_ids(
        &self,
        kind: StatisticsKind,
        live_ids: &[LiveId],
    ) -> RepositoryResult<HashMap<LiveId, LiveStatistics>> {
        if live_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i64> = live_ids.iter().copied().map(i64::from).collect();

        let records = sqlx::query_as::<_, LiveStatisticsRecord>(
            r#"
            SELECT id, live_id, kind, data, created_at, updated_at
            FROM live_statistics
            WHERE kind = $1 AND live_id = ANY($2)
            "#,
        )
        .bind(kind.as_str())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let mut statistics = HashMap::with_capacity(records.len());
        for record in records {
            let entry = LiveStatistics::try_from(record)?;
            statistics.insert(entry.live_id, entry);
        }
        Ok(statistics)
    }
}
