use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;

use crate::core::client::transport::{HttpRequest, HttpResponse, Transport};
use crate::errors::{EvaError, EvaResult};

/// Records every request and replays queued responses in order.
/// An empty queue answers `200` with an empty body.
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<EvaResult<HttpResponse>>>,
}

impl MockTransport {
    pub fn push_json(&self, status: u16, body: Value) {
        self.push_text(status, &body.to_string());
    }

    pub fn push_text(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }));
    }

    pub fn push_failure(&self, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(EvaError::TransportFailure {
                url: "mock".into(),
                reason: reason.into(),
            }));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> EvaResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: StatusCode::OK,
                    body: String::new(),
                })
            })
    }
}
