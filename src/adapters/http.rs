use crate::domain::ports::{ApiRequest, ApiResponse, Transport};
use crate::utils::error::{CrptError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("crpt-api/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 基於 reqwest 的傳輸層實作
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    pub fn with_settings(timeout: Duration, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, parse_header_value(USER_AGENT.as_str(), user_agent)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// 使用外部建立的 client（共用連線池時使用）
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| CrptError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn build_header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut header_map = HeaderMap::new();

    for (key, value) in headers {
        let name = HeaderName::from_str(key).map_err(|e| CrptError::InvalidHeader {
            name: key.clone(),
            reason: e.to_string(),
        })?;
        header_map.append(name, parse_header_value(key, value)?);
    }

    Ok(header_map)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, request: ApiRequest) -> Result<ApiResponse> {
        let headers = build_header_map(&request.headers)?;

        tracing::debug!("📡 POST {} ({} bytes)", request.url, request.body.len());

        let response = self
            .client
            .post(&request.url)
            .headers(headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let url = response.url().to_string();
        tracing::debug!("📡 Response status: {}", status);

        let body = response.text().await?;

        Ok(ApiResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            url,
            body,
        })
    }
}
