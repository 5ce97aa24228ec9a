use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::web::models::{ChatPayload, ChatReply};

/// How a widget reaches the chat proxy.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, payload: &ChatPayload) -> Result<ChatReply>;
}

/// Posts to a site's `/api/chat` over HTTP.
///
/// Any JSON body counts as a reply, whatever the status: the proxy's error
/// body carries its own apology text in `response`. Only network and
/// decoding failures are errors.
pub struct HttpTransport {
    endpoint: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(site_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/chat", site_url.trim_end_matches('/')),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, payload: &ChatPayload) -> Result<ChatReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.endpoint))?;

        debug!("Chat proxy answered {}", response.status());

        response
            .json::<ChatReply>()
            .await
            .context("chat proxy reply is not valid JSON")
    }
}
