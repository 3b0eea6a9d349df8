//! 直播统计实体定义
//!
//! 每个直播间按统计类型（签到、访客）各保存一条统计记录，
//! `data` 字段存放处理器产出的归一化结果。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::errors::DomainError;

/// 统一的时间戳类型。
pub type Timestamp = DateTime<Utc>;

/// 统计记录唯一标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatisticsId(pub Uuid);

impl StatisticsId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for StatisticsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for StatisticsId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<StatisticsId> for Uuid {
    fn from(value: StatisticsId) -> Self {
        value.0
    }
}

/// 直播间标识，来自直播云端，不单独唯一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiveId(pub i64);

impl LiveId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for LiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for LiveId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<LiveId> for i64 {
    fn from(value: LiveId) -> Self {
        value.0
    }
}

/// 统计类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsKind {
    Checkin,
    Visitor,
}

impl StatisticsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticsKind::Checkin => "checkin",
            StatisticsKind::Visitor => "visitor",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "checkin" => Ok(StatisticsKind::Checkin),
            "visitor" => Ok(StatisticsKind::Visitor),
            other => Err(DomainError::unknown_statistics_kind(other)),
        }
    }
}

impl fmt::Display for StatisticsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 直播统计记录。
///
/// 同一 `(live_id, kind)` 组合在查询语义上只有一条"当前"记录，
/// 创建后通过更新操作刷新 `data`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveStatistics {
    pub id: StatisticsId,
    pub live_id: LiveId,
    pub kind: StatisticsKind,
    pub data: JsonValue,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LiveStatistics {
    /// `data` 尚未填充时为空对象。
    pub fn has_data(&self) -> bool {
        match &self.data {
            JsonValue::Object(map) => !map.is_empty(),
            JsonValue::Null => false,
            _ => true,
        }
    }
}

/// 待插入的统计记录，`id` 由仓储在创建时分配。
#[derive(Debug, Clone)]
pub struct NewLiveStatistics {
    pub live_id: LiveId,
    pub kind: StatisticsKind,
    pub data: JsonValue,
    pub created_at: Timestamp,
}

impl NewLiveStatistics {
    /// 创建一条 `data` 为空对象的新记录。
    pub fn empty(live_id: LiveId, kind: StatisticsKind, now: Timestamp) -> Self {
        Self {
            live_id,
            kind,
            data: JsonValue::Object(Default::default()),
            created_at: now,
        }
    }

    pub fn with_data(
        live_id: LiveId,
        kind: StatisticsKind,
        data: JsonValue,
        now: Timestamp,
    ) -> Self {
        Self {
            live_id,
            kind,
            data,
            created_at: now,
        }
    }
}
