use crate::core::time_unit::TimeUnit;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 送往 CRPT API 的 JSON POST 請求
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub reason: String,
    pub url: String,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 傳輸層。非 2xx 狀態碼以 `ApiResponse` 回傳，不視為錯誤。
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: ApiRequest) -> Result<ApiResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn time_unit(&self) -> TimeUnit;
    fn request_limit(&self) -> usize;
    fn timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
}
