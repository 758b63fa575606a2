use super::client::ApiClient;
use super::error::ApiError;
use super::transport::{ApiRequest, ApiResponse, Transport};
use super::urls::Endpoints;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory transport: replays queued responses in order and records every
/// request. An empty queue answers `200 []`.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn client() -> (ApiClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::default());
        let api = ApiClient::new(
            transport.clone(),
            Endpoints::new("http://api.test"),
            Some(Duration::from_secs(8)),
        );
        (api, transport)
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.replies.lock().unwrap().push_back(Ok(ApiResponse {
            status,
            body: Some(body),
        }));
    }

    pub fn fail(&self, err: ApiError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self, method: &Method, url: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.method == method && r.url == url)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.sent.lock().unwrap().push(req);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ApiResponse {
                status: 200,
                body: Some(Value::Array(Vec::new())),
            }))
    }
}
