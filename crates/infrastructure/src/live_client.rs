//! 直播云 HTTP 客户端
//!
//! 封装直播云端的两个只读接口，返回体统一为 `{code, data}`；
//! 传输失败和解析失败映射为 `LiveClientError`，业务 code 原样透传。

use std::time::Duration;

use application::{LiveClient, LiveClientError, LiveClientResponse};
use async_trait::async_trait;
use config::LiveApiConfig;
use domain::LiveId;
use tracing::debug;

pub struct HttpLiveClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLiveClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: trim_base_url(base_url.into()),
        }
    }

    pub fn from_config(config: &LiveApiConfig) -> Result<Self, LiveClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| LiveClientError::transport("构建 HTTP 客户端失败", err))?;

        Ok(Self {
            http,
            base_url: trim_base_url(config.base_url.clone()),
        })
    }

    async fn get_listing(
        &self,
        live_id: LiveId,
        resource: &str,
    ) -> Result<LiveClientResponse, LiveClientError> {
        let url = format!("{}/live/rooms/{}/{}", self.base_url, live_id, resource);
        debug!(%live_id, %url, "fetching live room listing");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| LiveClientError::transport(format!("请求 {url} 失败"), err))?;

        response
            .json::<LiveClientResponse>()
            .await
            .map_err(|err| LiveClientError::invalid_response(format!("{url}: {err}")))
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_owned()
}

#[async_trait]
impl LiveClient for HttpLiveClient {
    async fn list_checkins(&self, live_id: LiveId) -> Result<LiveClientResponse, LiveClientError> {
        self.get_listing(live_id, "checkins").await
    }

    async fn list_visitor_history(
        &self,
        live_id: LiveId,
    ) -> Result<LiveClientResponse, LiveClientError> {
        self.get_listing(live_id, "history").await
    }
}
