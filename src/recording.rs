//! Recording middleware
//!
//! Journals every exchange that passes through a router. The stub handler tells
//! the journal which mapping served a request by inserting a `MatchedStub`
//! extension into its response; responses without one are recorded as unmatched.
//! Streamed responses (no exact length) pass through untouched and are journaled
//! without a body.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, HttpBody},
    extract::{ConnectInfo, Request, State},
    http::{request, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::errors::{JournalError, JournalResult};
use crate::request_journal::RequestJournal;
use crate::serve_event::{LoggedRequest, LoggedResponse, ServeEvent, StubReference};

/// Response extension naming the stub that produced the response
#[derive(Debug, Clone)]
pub struct MatchedStub(pub StubReference);

/// Wraps `router` so that every served exchange lands in `journal`
pub fn with_recording(router: Router, journal: Arc<RequestJournal>) -> Router {
    router.layer(middleware::from_fn_with_state(journal, record_served_interactions))
}

pub async fn record_served_interactions(
    State(journal): State<Arc<RequestJournal>>,
    request: Request,
    next: Next,
) -> Response {
    if !journal.is_enabled() {
        return next.run(request).await;
    }

    match record(&journal, request, next).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Failed to record served interaction: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn record(journal: &RequestJournal, request: Request, next: Next) -> JournalResult<Response> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| JournalError::body("request", e))?;
    let logged_request = capture_request(&parts).with_body(body.to_vec());

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (mut parts, body) = response.into_parts();
    let stub = parts.extensions.remove::<MatchedStub>().map(|m| m.0);
    let logged_response = header_pairs(&parts.headers).fold(
        LoggedResponse::new(parts.status.as_u16()),
        |logged, (name, value)| logged.with_header(name, value),
    );

    if HttpBody::size_hint(&body).exact().is_none() {
        tracing::debug!(url = %logged_request.url, "Journaling streamed response without its body");
        journal.request_received(ServeEvent::new(logged_request, logged_response, stub));
        return Ok(Response::from_parts(parts, body));
    }

    let body = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| JournalError::body("response", e))?;
    let logged_response = logged_response.with_body(body.to_vec());

    journal.request_received(ServeEvent::new(logged_request, logged_response, stub));
    Ok(Response::from_parts(parts, Body::from(body)))
}

fn capture_request(parts: &request::Parts) -> LoggedRequest {
    let url = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let absolute_url = if parts.uri.scheme().is_some() {
        Some(parts.uri.to_string())
    } else {
        parts
            .headers
            .get(axum::http::header::HOST)
            .and_then(|host| host.to_str().ok())
            .map(|host| format!("http://{host}{url}"))
    };

    let mut logged = header_pairs(&parts.headers).fold(
        LoggedRequest::new(parts.method.as_str(), url),
        |logged, (name, value)| logged.with_header(name, value),
    );
    if let Some(url) = absolute_url {
        logged = logged.with_absolute_url(url);
    }
    if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
        logged = logged.with_client_ip(addr.ip().to_string());
    }
    logged
}

fn header_pairs(headers: &HeaderMap) -> impl Iterator<Item = (&str, String)> + '_ {
    headers
        .iter()
        .map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
}
