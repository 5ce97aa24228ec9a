use std::time::Instant;

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::ProxyError;
use crate::web::handlers::new_request_id;
use crate::web::models::{ChatPayload, ChatReply, ContactPayload};
use crate::widget::ChatTransport;

// A thin client for the upstream chat/contact backend
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Using backend at: {}", base_url);

        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    pub fn contact_url(&self) -> String {
        format!("{}/contact", self.base_url)
    }

    /// Forwards one chat turn and returns the backend's JSON body untouched.
    pub async fn chat(&self, payload: &ChatPayload, request_id: &str) -> Result<Value, ProxyError> {
        self.post_json(&self.chat_url(), payload, request_id).await
    }

    pub async fn contact(&self, payload: &ContactPayload, request_id: &str) -> Result<Value, ProxyError> {
        self.post_json(&self.contact_url(), payload, request_id).await
    }

    async fn post_json<T: Serialize>(
        &self,
        url: &str,
        payload: &T,
        request_id: &str,
    ) -> Result<Value, ProxyError> {
        info!("[{}] Proxying to backend: {}", request_id, url);

        let started = Instant::now();
        let response = self.client.post(url).json(payload).send().await.map_err(|e| {
            error!("[{}] Backend unreachable: {}", request_id, e);
            ProxyError::Transport(e)
        })?;

        let status = response.status();
        info!(
            "[{}] Backend status: {} ({}ms)",
            request_id,
            status,
            started.elapsed().as_millis()
        );
        debug!(
            "[{}] Backend content-type: {:?}",
            request_id,
            response.headers().get(reqwest::header::CONTENT_TYPE)
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("[{}] Backend error body: {}", request_id, body);
            return Err(ProxyError::Upstream { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<Value>(&bytes).map_err(|e| {
            error!("[{}] Backend body is not JSON: {}", request_id, e);
            ProxyError::InvalidUpstreamBody(e.to_string())
        })
    }
}

// Lets a server-rendered widget talk to the backend without the /api/chat hop
#[async_trait]
impl ChatTransport for BackendClient {
    async fn send(&self, payload: &ChatPayload) -> anyhow::Result<ChatReply> {
        let body = self.chat(payload, &new_request_id()).await?;
        Ok(serde_json::from_value(body)?)
    }
}
