use async_trait::async_trait;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{malformed, EvaError, EvaResult};

pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// One outbound HTTP request, independent of the client library doing the I/O.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: String) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body: Some(body),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> EvaResult<T> {
        serde_json::from_str(&self.body).map_err(malformed)
    }
}

/// Executes HTTP requests against the data service.
///
/// Implementations surface network-level problems as
/// [`EvaError::TransportFailure`] and hand back every HTTP answer, whatever its
/// status, so callers can tell "absent" from "unreachable".
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> EvaResult<HttpResponse>;
}

/// Sends `request` and decodes a 2xx body as JSON.
pub async fn fetch_json<T, R>(transport: &T, request: HttpRequest) -> EvaResult<R>
where
    T: Transport + ?Sized,
    R: DeserializeOwned,
{
    let url = request.url.clone();
    let resp = send_checked(transport, request).await?;
    resp.json().map_err(|e| {
        debug!("Undecodable body from {}: {}", url, e);
        e
    })
}

/// Sends `request` and turns any non-2xx status into a transport failure.
pub async fn send_checked<T>(transport: &T, request: HttpRequest) -> EvaResult<HttpResponse>
where
    T: Transport + ?Sized,
{
    let url = request.url.clone();
    debug!("{} {}", request.method, url);

    let resp = transport.send(request).await?;
    if !resp.is_success() {
        return Err(EvaError::status(&url, resp.status, &resp.body));
    }
    Ok(resp)
}
