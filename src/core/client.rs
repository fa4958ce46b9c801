use crate::adapters::http::ReqwestTransport;
use crate::core::rate_limiter::RateLimiter;
use crate::core::time_unit::TimeUnit;
use crate::domain::model::Document;
use crate::domain::ports::{ApiRequest, ConfigProvider, Transport};
use crate::utils::error::{CrptError, Result};
use std::sync::Arc;

pub const DEFAULT_API_URL: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";
const CONTENT_TYPE_JSON: &str = "application/json";

/// 「Честный знак」API 客戶端
///
/// Clone 共用同一個限流器與傳輸層，可在多個 task 之間分享。
#[derive(Clone)]
pub struct CrptApi {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    api_url: String,
}

impl CrptApi {
    pub fn new(time_unit: TimeUnit, request_limit: usize) -> Result<Self> {
        let transport = ReqwestTransport::new()?;
        Self::with_transport(Arc::new(transport), time_unit, request_limit)
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        time_unit: TimeUnit,
        request_limit: usize,
    ) -> Result<Self> {
        let limiter = RateLimiter::new(time_unit.as_duration(), request_limit)?;

        Ok(Self {
            transport,
            limiter: Arc::new(limiter),
            api_url: DEFAULT_API_URL.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let transport = ReqwestTransport::with_settings(config.timeout(), config.user_agent())?;
        let client = Self::with_transport(
            Arc::new(transport),
            config.time_unit(),
            config.request_limit(),
        )?;

        tracing::info!(
            "🔧 CRPT client ready: {} requests per {} -> {}",
            config.request_limit(),
            config.time_unit(),
            config.api_url()
        );

        Ok(client.with_endpoint(config.api_url()))
    }

    pub fn with_endpoint(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.api_url
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// 建立商品投入流通文件，回傳 API 回應內容
    ///
    /// 超過目前窗口上限時會等待下一個窗口。`signature` 原樣放入
    /// `Authorization` 標頭。
    pub async fn create_document(&self, document: &Document, signature: &str) -> Result<String> {
        self.limiter.acquire().await?;

        let body = serde_json::to_string(document)?;
        let request = ApiRequest {
            url: self.api_url.clone(),
            headers: vec![
                ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
                ("Authorization".to_string(), signature.to_string()),
            ],
            body,
        };

        tracing::debug!(
            "📤 Creating document {} with {} products",
            document.doc_id.as_deref().unwrap_or("<no id>"),
            document.product_count()
        );

        let response = self.transport.post(request).await?;

        if !response.is_success() {
            tracing::warn!(
                "❌ Document creation failed with status {} {}",
                response.status,
                response.reason
            );
            return Err(CrptError::UnexpectedStatus {
                status: response.status,
                reason: response.reason,
                url: response.url,
                body: response.body,
            });
        }

        tracing::debug!("✅ Document accepted ({} bytes in response)", response.body.len());
        Ok(response.body)
    }

    /// 依序送出同一份文件 `times` 次，遇到第一個錯誤即停止
    pub async fn create_documents(
        &self,
        document: &Document,
        signature: &str,
        times: usize,
    ) -> Result<Vec<String>> {
        let mut responses = Vec::with_capacity(times);
        for attempt in 1..=times {
            tracing::info!("📤 Submitting document ({}/{})", attempt, times);
            responses.push(self.create_document(document, signature).await?);
        }
        Ok(responses)
    }

    pub fn shutdown(&self) {
        self.limiter.shutdown();
    }
}

impl std::fmt::Debug for CrptApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrptApi")
            .field("api_url", &self.api_url)
            .field("request_limit", &self.limiter.request_limit())
            .field("window", &self.limiter.window())
            .finish()
    }
}
