//! 直播云客户端适配器接口
//!
//! 对直播云端的两个只读接口做薄封装：拉取签到列表、拉取访客历史。
//! 云端以 `code == 0` 表示成功，非零 code 不在这一层翻译成错误，
//! 由调用方原样交给结果处理器（见服务层）。

use async_trait::async_trait;
use domain::LiveId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// 直播云接口的原始返回。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveClientResponse {
    pub code: i64,
    #[serde(default)]
    pub data: JsonValue,
}

impl LiveClientResponse {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// 传输层错误，云端业务错误码不属于这一类。
#[derive(Debug, Error)]
pub enum LiveClientError {
    #[error("直播云请求失败: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("直播云返回无法解析: {message}")]
    InvalidResponse { message: String },
}

impl LiveClientError {
    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

/// 直播云客户端。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiveClient: Send + Sync {
    /// 拉取直播间签到列表。
    async fn list_checkins(&self, live_id: LiveId) -> Result<LiveClientResponse, LiveClientError>;

    /// 拉取直播间访客/观看历史。
    async fn list_visitor_history(
        &self,
        live_id: LiveId,
    ) -> Result<LiveClientResponse, LiveClientError>;
}
