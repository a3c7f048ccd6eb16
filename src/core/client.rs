use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{config::OkexConfig, error::ExchangeError, types::Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 底层客户端：负责签名、发送、连接复用与限速
///
/// 适配层只通过这两个方法与它交互，每次调用都是一次性的，
/// 并发安全由实现方保证。
#[async_trait]
pub trait BaseClient: Send + Sync {
    /// 发送请求并返回原始响应体
    async fn do_request(&self, method: HttpMethod, path: &str, body: &str) -> Result<String>;

    /// 把请求参数序列化为待签名的请求体
    fn build_request_body(&self, param: &serde_json::Value) -> Result<String> {
        Ok(serde_json::to_string(param)?)
    }
}

/// 认证头生成器，具体签名算法由调用方提供
pub trait RequestSigner: Send + Sync {
    fn sign(&self, method: HttpMethod, path: &str, body: &str) -> Result<Vec<(String, String)>>;
}

/// 基于 reqwest 的默认实现
#[derive(Clone)]
pub struct HttpBaseClient {
    base_url: String,
    client: reqwest::Client,
    signer: Option<Arc<dyn RequestSigner>>,
}

impl HttpBaseClient {
    pub fn new(config: &OkexConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("okex-spot-adapter/0.1")
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            signer: None,
        })
    }

    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }
}

#[async_trait]
impl BaseClient for HttpBaseClient {
    async fn do_request(&self, method: HttpMethod, path: &str, body: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        request = request.header("Content-Type", "application/json");

        if let Some(signer) = &self.signer {
            for (name, value) in signer.sign(method, path, body)? {
                request = request.header(name, value);
            }
        }

        if method == HttpMethod::Post && !body.is_empty() {
            request = request.body(body.to_string());
        }

        log::debug!("{} {}", method, path);
        let response = request.send().await?;

        if response.status().is_success() {
            Ok(response.text().await?)
        } else {
            let status_code = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "未知错误".to_string());
            Err(ExchangeError::ApiError {
                code: status_code.to_string(),
                message: error_text,
            })
        }
    }
}
