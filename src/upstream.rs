use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{Provider, UpstreamConfig};
use crate::error::{ConfigError, ScoringError};
use crate::structs::upstream::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, MessagesRequest, MessagesResponse,
};

const ANTHROPIC_VERSION: &str = "2023-06-01";
// 错误信息里最多带上这么多上游响应内容
const MAX_ERROR_BODY: usize = 500;

/// 上游AI服务的客户端，内部的reqwest连接池在所有请求间共享
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: Url,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<UpstreamClient, ConfigError> {
        let endpoint = config.endpoint()?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {}", e)))?;
        Ok(UpstreamClient { http, endpoint, config })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// 发送一条用户消息并返回模型生成的文本
    pub async fn complete(&self, prompt: &str) -> Result<String, ScoringError> {
        let messages = vec![ChatMessage { role: "user", content: prompt }];
        let text = match self.config.provider {
            Provider::OpenAi => {
                let body = ChatCompletionRequest {
                    model: self.config.model(),
                    messages,
                    temperature: self.config.temperature(),
                    reasoning_effort: self.config.reasoning_effort(),
                };
                let request = self
                    .http
                    .post(self.endpoint.clone())
                    .bearer_auth(&self.config.api_key)
                    .json(&body);
                self.send::<ChatCompletionResponse>(request)
                    .await?
                    .into_text()
            }
            Provider::Anthropic => {
                let body = MessagesRequest {
                    model: self.config.model(),
                    max_tokens: self.config.max_tokens,
                    temperature: self.config.temperature().unwrap_or(0.0),
                    messages,
                };
                let request = self
                    .http
                    .post(self.endpoint.clone())
                    .header("x-api-key", &self.config.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body);
                self.send::<MessagesResponse>(request).await?.into_text()
            }
        };

        match text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            Some(_) => Err(ScoringError::upstream("no response from upstream")),
            None => Err(ScoringError::parse("upstream response carried no completion text")),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ScoringError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            return Err(ScoringError::upstream(format!(
                "upstream returned {}: {}",
                status,
                truncate(&body, MAX_ERROR_BODY)
            )));
        }
        serde_json::from_str(&body)
            .map_err(|e| ScoringError::parse(format!("malformed upstream envelope: {}", e)))
    }

    fn transport_error(&self, e: reqwest::Error) -> ScoringError {
        if e.is_timeout() {
            ScoringError::upstream(format!("upstream timed out after {}s", self.config.timeout_secs))
        } else {
            ScoringError::upstream(format!("upstream unreachable: {}", e))
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
