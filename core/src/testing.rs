//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{ApiError, ApiResult};
use crate::hal::HalClient;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::token::{OAuth2Token, StaticTokenProvider};

pub const BASE_URL: &str = "http://localhost:8080/";

/// Replays canned responses in order and records every request.
///
/// Running out of responses is a transport error, so a test that expects no
/// traffic can pass an empty list and assert on `requests()`.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl RecordingTransport {
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Transport("no canned response left".to_string()))
    }
}

pub fn json_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("Content-Type".to_string(), "application/hal+json".to_string())],
        body: body.to_string(),
    }
}

pub fn hal_client(transport: &RecordingTransport) -> HalClient {
    HalClient::new(
        BASE_URL,
        Arc::new(transport.clone()),
        Arc::new(StaticTokenProvider::new(OAuth2Token::new("test-token"))),
    )
    .unwrap()
}
