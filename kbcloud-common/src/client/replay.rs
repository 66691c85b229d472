//! An in-memory [`Transport`] for tests, enabled by the `testing` feature.

use std::collections::VecDeque;
use std::sync::Mutex;

use http::{HeaderMap, Method, StatusCode};
use reqwest::{Request, Url};

use super::Transport;
use crate::error::Error;

/// What a [`ReplayTransport`] saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Answers requests from a queue of canned responses and records every
/// request it receives.
#[derive(Debug, Default)]
pub struct ReplayTransport {
    responses: Mutex<VecDeque<http::Response<Vec<u8>>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ReplayTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: StatusCode, body: &[u8]) -> Self {
        let mut response = http::Response::new(body.to_vec());
        *response.status_mut() = status;
        self.respond_with(response)
    }

    pub fn respond_with(self, response: http::Response<Vec<u8>>) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Transport for ReplayTransport {
    async fn execute(&self, request: Request) -> Result<http::Response<Vec<u8>>, Error> {
        let recorded = RecordedRequest {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body: request
                .body()
                .and_then(|body| body.as_bytes())
                .map(<[u8]>::to_vec),
        };
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(recorded);
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front())
            .ok_or(Error::ReplayExhausted)
    }
}
