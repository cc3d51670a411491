//! Interaction model: what the consumer is expected to send and what the
//! provider answers.
//!
//! Values are built with plain constructors and consuming `with`-style
//! helpers; there is no builder state to reset between tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_state: Option<String>,
    pub request: ExpectedRequest,
    pub response: StubResponse,
}

impl Interaction {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            provider_state: None,
            request: ExpectedRequest::new("GET", "/"),
            response: StubResponse::new(200),
        }
    }

    pub fn given(mut self, state: impl Into<String>) -> Self {
        self.provider_state = Some(state.into());
        self
    }

    pub fn upon(mut self, request: ExpectedRequest) -> Self {
        self.request = request;
        self
    }

    pub fn will_respond_with(mut self, response: StubResponse) -> Self {
        self.response = response;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRequest {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ExpectedRequest {
    pub fn new(method: &str, path: impl Into<String>) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            path: path.into(),
            query: None,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new("PUT", path)
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Compare against a received request and describe every difference.
    ///
    /// Header names are case-insensitive and only the expected headers are
    /// checked. Path and query must match exactly, and no expected query
    /// means none is allowed.
    /// Bodies are compared as JSON values when a body is expected.
    pub fn mismatches(&self, actual: &ReceivedRequest) -> Vec<String> {
        let mut problems = Vec::new();

        if !self.method.eq_ignore_ascii_case(&actual.method) {
            problems.push(format!("method: expected {}, got {}", self.method, actual.method));
        }
        if self.path != actual.path {
            problems.push(format!("path: expected {}, got {}", self.path, actual.path));
        }
        if self.query != actual.query {
            problems.push(format!("query: expected {:?}, got {:?}", self.query, actual.query));
        }
        for (name, expected) in &self.headers {
            match actual.header(name) {
                Some(value) if value == expected => {}
                Some(value) => problems.push(format!(
                    "header {name}: expected {expected:?}, got {value:?}"
                )),
                None => problems.push(format!("header {name}: missing")),
            }
        }
        if let Some(expected) = &self.body {
            match serde_json::from_str::<Value>(&actual.body) {
                Ok(body) if &body == expected => {}
                Ok(body) => problems.push(format!("body: expected {expected}, got {body}")),
                Err(_) => problems.push(format!("body: expected {expected}, got {:?}", actual.body)),
            }
        }

        problems
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StubResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl StubResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A request as the mock provider saw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
