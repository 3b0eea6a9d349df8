//! 统计结果处理器
//!
//! 处理器把直播云的原始返回归一化为 `{"data": {...}}` 形式的载荷，
//! 按统计类型各有一个实现，通过 `ProcessorProvider` 解析。
//! 测试或新增统计类型时替换 provider 即可，服务层不感知具体实现。

use std::sync::Arc;

use domain::{LiveId, StatisticsKind};
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::live_client::LiveClientResponse;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("统计结果处理失败: {message}")]
    InvalidPayload { message: String },
}

impl ProcessorError {
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }
}

/// 统计结果处理器。每次外部拉取恰好调用一次。
#[cfg_attr(test, mockall::automock)]
pub trait StatisticsProcessor: Send + Sync {
    fn process(
        &self,
        live_id: LiveId,
        kind: StatisticsKind,
        response: &LiveClientResponse,
    ) -> Result<JsonValue, ProcessorError>;
}

/// 按统计类型解析处理器的工厂。
pub trait ProcessorProvider: Send + Sync {
    fn processor_for(&self, kind: StatisticsKind) -> Arc<dyn StatisticsProcessor>;
}

/// 默认工厂：签到、访客各对应一个内置处理器。
pub struct DefaultProcessorProvider {
    checkin: Arc<dyn StatisticsProcessor>,
    visitor: Arc<dyn StatisticsProcessor>,
}

impl Default for DefaultProcessorProvider {
    fn default() -> Self {
        Self {
            checkin: Arc::new(CheckinStatisticsProcessor),
            visitor: Arc::new(VisitorStatisticsProcessor),
        }
    }
}

impl ProcessorProvider for DefaultProcessorProvider {
    fn processor_for(&self, kind: StatisticsKind) -> Arc<dyn StatisticsProcessor> {
        match kind {
            StatisticsKind::Checkin => Arc::clone(&self.checkin),
            StatisticsKind::Visitor => Arc::clone(&self.visitor),
        }
    }
}

fn entries_of(response: &LiveClientResponse) -> Vec<JsonValue> {
    match &response.data {
        JsonValue::Array(entries) => entries.clone(),
        // 云端偶尔把列表包在 data.list 里
        JsonValue::Object(map) => map
            .get("list")
            .and_then(JsonValue::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// 签到统计处理器：统计签到人数，保留原始明细。
pub struct CheckinStatisticsProcessor;

impl StatisticsProcessor for CheckinStatisticsProcessor {
    fn process(
        &self,
        _live_id: LiveId,
        _kind: StatisticsKind,
        response: &LiveClientResponse,
    ) -> Result<JsonValue, ProcessorError> {
        if !response.is_success() {
            return Ok(json!({
                "data": {
                    "success": 0,
                    "detail": [],
                    "code": response.code,
                }
            }));
        }

        let entries = entries_of(response);
        Ok(json!({
            "data": {
                "success": entries.len(),
                "detail": entries,
            }
        }))
    }
}

/// 访客统计处理器：统计访客数和总观看时长，保留原始明细。
pub struct VisitorStatisticsProcessor;

impl StatisticsProcessor for VisitorStatisticsProcessor {
    fn process(
        &self,
        _live_id: LiveId,
        _kind: StatisticsKind,
        response: &LiveClientResponse,
    ) -> Result<JsonValue, ProcessorError> {
        if !response.is_success() {
            return Ok(json!({
                "data": {
                    "total": 0,
                    "watchTime": 0,
                    "detail": [],
                    "code": response.code,
                }
            }));
        }

        let entries = entries_of(response);
        let watch_time: i64 = entries
            .iter()
            .filter_map(|entry| entry.get("watchTime"))
            .filter_map(JsonValue::as_i64)
            .sum();

        Ok(json!({
            "data": {
                "total": entries.len(),
                "watchTime": watch_time,
                "detail": entries,
            }
        }))
    }
}
