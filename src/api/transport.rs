use super::error::ApiError;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Raw response: status plus the body parsed as JSON when it parses.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns non-2xx into `ApiError::Status`, keeping the server message.
    pub fn into_result(self) -> Result<Option<Value>, ApiError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ApiError::from_status(self.status, self.body.as_ref()))
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse, ApiError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent("iqscore-admin/0.1")
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self.client.request(req.method.clone(), &req.url);
        if let Some(ref body) = req.body {
            builder = builder.json(body);
        }
        if let Some(t) = req.timeout {
            builder = builder.timeout(t);
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("{} {} timed out", req.method, req.url);
                ApiError::Timeout
            } else {
                warn!("{} {} failed: {}", req.method, req.url, e);
                ApiError::Transport(e.to_string())
            }
        })?;

        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Transport(e.to_string())
            }
        })?;
        let body = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<Value>(&text).ok()
        };

        info!("{} {} [{}]", req.method, req.url, status);
        Ok(ApiResponse { status, body })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<ReqwestTransport>")
    }
}
