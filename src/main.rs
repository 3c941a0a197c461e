// serve_journal - main.rs
// Boots a two-stub test double with request recording, for manual poking

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Extension, Router};
use serve_journal::config_loader::load_config;
use serve_journal::recording::{with_recording, MatchedStub};
use serve_journal::request_pattern::RequestPattern;
use serve_journal::serve_event::StubReference;
use uuid::Uuid;

fn stub_route(router: Router, path: &'static str) -> Router {
    let stub = StubReference::new(Uuid::new_v4()).with_name(path);
    router.route(
        path,
        get(move || {
            let stub = stub.clone();
            async move { (Extension(MatchedStub(stub)), "ok") }
        }),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = load_config().context("failed to load journal configuration")?;
    let journal = Arc::new(config.build()?);

    let router = stub_route(stub_route(Router::new(), "/one"), "/two");
    let app = with_recording(router, Arc::clone(&journal));

    let addr: SocketAddr = std::env::var("JOURNAL_LISTEN")
        .unwrap_or_else(|_| "127.0.0.1:8089".into())
        .parse()
        .context("JOURNAL_LISTEN is not a socket address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, mode = %journal.mode(), "Test double listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    tracing::info!(
        recorded = journal.count_requests_matching(&RequestPattern::anything()),
        unmatched = journal.find_unmatched_requests().len(),
        "Shutting down"
    );
    Ok(())
}
