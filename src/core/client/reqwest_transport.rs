use async_trait::async_trait;
use reqwest::Client;

use crate::core::client::transport::{HttpRequest, HttpResponse, Transport};
use crate::errors::{EvaError, EvaResult};

/// [`Transport`] backed by a shared reqwest client.
pub struct ReqwestTransport {
    client: Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> EvaResult<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method, &url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let resp = builder.send().await.map_err(|e| EvaError::TransportFailure {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| EvaError::TransportFailure {
            url: url.clone(),
            reason: format!("failed to read body: {}", e),
        })?;

        Ok(HttpResponse { status, body })
    }
}
