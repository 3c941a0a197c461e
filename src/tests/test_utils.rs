// src/tests/test_utils.rs
// Shared builders for journal unit tests

use serde_json::Value;
use uuid::Uuid;

use crate::serve_event::{LoggedRequest, LoggedResponse, ServeEvent, StubReference};

/// GET to `url` that no stub matched
pub fn unmatched(url: &str) -> ServeEvent {
    ServeEvent::unmatched(LoggedRequest::new("GET", url), LoggedResponse::new(404))
}

/// GET to `url` served by a stub carrying `metadata`
pub fn served(url: &str, metadata: Value) -> ServeEvent {
    ServeEvent::new(
        LoggedRequest::new("GET", url),
        LoggedResponse::new(200).with_body("ok"),
        Some(StubReference::new(Uuid::new_v4()).with_metadata(metadata)),
    )
}

pub fn urls<E: AsRef<ServeEvent>>(events: &[E]) -> Vec<String> {
    events.iter().map(|e| e.as_ref().request.url.clone()).collect()
}
