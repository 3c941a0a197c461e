//! Served interaction records
//!
//! A `ServeEvent` is the immutable snapshot of one completed HTTP exchange: the
//! request as it arrived, the response as it was returned, and a reference to the
//! stub that served it (if any). Events are published into the journal as
//! `Arc<ServeEvent>` and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::encoding::{self, base64_body};

/// Single header line. Names keep their original casing; lookups ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

impl HttpHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn first_header<'a>(headers: &'a [HttpHeader], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Request half of a served interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedRequest {
    pub method: String,
    /// Path plus query string, as received
    pub url: String,
    pub absolute_url: Option<String>,
    pub client_ip: Option<String>,
    pub headers: Vec<HttpHeader>,
    #[serde(rename = "bodyAsBase64", with = "base64_body")]
    pub body: Vec<u8>,
    pub logged_at: DateTime<Utc>,
}

impl LoggedRequest {
    /// Captures a request with the given method and url at the current time
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            url: url.into(),
            absolute_url: None,
            client_ip: None,
            headers: Vec::new(),
            body: Vec::new(),
            logged_at: Utc::now(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HttpHeader::new(name, value));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    pub fn with_absolute_url(mut self, url: impl Into<String>) -> Self {
        self.absolute_url = Some(url.into());
        self
    }

    /// First value of the named header
    pub fn header(&self, name: &str) -> Option<&str> {
        first_header(&self.headers, name)
    }

    /// Every value of the named header, in arrival order
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
            .collect()
    }

    /// Url without the query string
    pub fn path(&self) -> &str {
        match self.url.split_once('?') {
            Some((path, _)) => path,
            None => &self.url,
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    pub fn body_as_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_as_base64(&self) -> Option<String> {
        if self.body.is_empty() {
            return None;
        }
        encoding::encode_base64(Some(self.body.as_slice()))
    }
}

/// Response half of a served interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedResponse {
    pub status: u16,
    pub headers: Vec<HttpHeader>,
    #[serde(rename = "bodyAsBase64", with = "base64_body")]
    pub body: Vec<u8>,
}

impl LoggedResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HttpHeader::new(name, value));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        first_header(&self.headers, name)
    }

    pub fn body_as_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Identifies the stub mapping that produced a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StubReference {
    pub id: Uuid,
    pub name: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl StubReference {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            name: None,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// One completed exchange, as stored in the journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServeEvent {
    pub id: Uuid,
    pub request: LoggedRequest,
    pub response: LoggedResponse,
    #[serde(rename = "stubMapping")]
    pub stub: Option<StubReference>,
}

impl ServeEvent {
    /// Builds an event and assigns its identity
    pub fn new(request: LoggedRequest, response: LoggedResponse, stub: Option<StubReference>) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            response,
            stub,
        }
    }

    /// Event for a request that no stub matched
    pub fn unmatched(request: LoggedRequest, response: LoggedResponse) -> Self {
        Self::new(request, response, None)
    }

    pub fn was_matched(&self) -> bool {
        self.stub.is_some()
    }

    pub fn stub_metadata(&self) -> Option<&serde_json::Value> {
        self.stub.as_ref().map(|s| &s.metadata)
    }
}
