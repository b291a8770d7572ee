//! Test utilities and helper functions for the citerender test suite

use kodegen_tools_citerender::{LinkResolver, ResolverConfig, SiteSearchRule};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::time::Duration;
use tokio::net::TcpListener;

/// Opaque payload that decodes to bytes without an embedded URL
#[allow(dead_code)]
pub const OPAQUE_PAYLOAD: &str = "AUZIYQE9x8k";

/// Install a tracing subscriber honoring `RUST_LOG`, once per test binary
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sets up a mock HTTP server
#[allow(dead_code)]
pub async fn setup_mock_server() -> ServerGuard {
    Server::new_async().await
}

/// Configuration that treats the local mock server as the grounding redirect host
#[allow(dead_code)]
pub fn local_config() -> ResolverConfig {
    ResolverConfig::builder()
        .wrapper_host("127.0.0.1")
        .request_timeout_secs(2)
        .probe_timeout_secs(2)
        .build()
        .expect("local test config is valid")
}

#[allow(dead_code)]
pub fn local_resolver() -> LinkResolver {
    LinkResolver::new(local_config())
}

/// Site search rule for the local mock server: `/search?q=...` listing `/recipe/...`
#[allow(dead_code)]
pub fn local_search_rule() -> SiteSearchRule {
    SiteSearchRule {
        host: kodegen_tools_citerender::config::HostMatch::Exact("127.0.0.1".to_string()),
        search_url: "{origin}/search?q={query}".to_string(),
        result_prefix: "{origin}/recipe/".to_string(),
    }
}

/// Wrapper URL served by `server`
#[allow(dead_code)]
pub fn wrapper_url(server: &ServerGuard, payload: &str) -> String {
    format!("{}/grounding-api-redirect/{payload}", server.url())
}

/// Helper to create test URLs
#[allow(dead_code)]
pub fn test_url(server: &ServerGuard, path: &str) -> String {
    format!("{}{}", server.url(), path)
}

/// URL on `server` addressed as `localhost`, which is off the wrapper host
#[allow(dead_code)]
pub fn publisher_url(server: &ServerGuard, path: &str) -> String {
    format!("http://localhost:{}{}", server.socket_address().port(), path)
}

/// Creates a HEAD endpoint answering 200 for every path starting with `prefix`
#[allow(dead_code)]
pub fn create_head_ok_mock(server: &mut ServerGuard, prefix: &str) -> Mock {
    server
        .mock("HEAD", Matcher::Regex(format!("^{prefix}")))
        .with_status(200)
        .create()
}

/// Creates a test HTML document with specified head and body
#[allow(dead_code)]
pub fn create_test_html(head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    {head}
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// Creates a mock endpoint that returns HTML content
#[allow(dead_code)]
pub fn create_html_mock(server: &mut ServerGuard, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create()
}

/// Creates a mock endpoint that returns a redirect
#[allow(dead_code)]
pub fn create_redirect_mock(
    server: &mut ServerGuard,
    method: &str,
    from: &str,
    status: usize,
    to: &str,
) -> Mock {
    server
        .mock(method, from)
        .with_status(status)
        .with_header("location", to)
        .create()
}

/// Creates a mock endpoint that returns an error
#[allow(dead_code)]
pub fn create_error_mock(server: &mut ServerGuard, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("<h1>Page not found</h1>")
        .create()
}

/// A TCP server that accepts connections and never answers
///
/// Returns its base URL. Connections are held open until the test ends.
#[allow(dead_code)]
pub async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

/// Upper bound used to assert that a call returned promptly
#[allow(dead_code)]
pub fn prompt(budget_secs: u64) -> Duration {
    Duration::from_secs(budget_secs)
}
