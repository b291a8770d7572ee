//! Grounding redirect resolution against local mock servers

mod common;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use common::*;
use kodegen_tools_citerender::{CancelSignal, LinkResolver, ResolverConfig, resolve_wrapper_url};
use std::time::Instant;

#[tokio::test]
async fn embedded_payload_resolves_without_network() {
    let payload = URL_SAFE_NO_PAD.encode(b"\x0a\x3chttps://www.seriouseats.example/borscht?utm_campaign=ai\x12\x04");
    let wrapper = format!("https://vertexaisearch.cloud.google.com/grounding-api-redirect/{payload}");

    assert_eq!(
        resolve_wrapper_url(&wrapper).await,
        "https://www.seriouseats.example/borscht"
    );
}

#[tokio::test]
async fn http_redirect_is_followed_through_publisher_redirects() {
    init_tracing();
    let mut server = setup_mock_server().await;
    let path = format!("/grounding-api-redirect/{OPAQUE_PAYLOAD}");
    let redirect_location = publisher_url(&server, "/old-borscht");
    let redirect = create_redirect_mock(
        &mut server,
        "HEAD",
        &path,
        302,
        &redirect_location,
    );
    let _moved = create_redirect_mock(&mut server, "HEAD", "/old-borscht", 301, "/borscht");
    let _page = create_head_ok_mock(&mut server, "/borscht");

    let resolved = local_resolver()
        .resolve_wrapper(&wrapper_url(&server, OPAQUE_PAYLOAD))
        .await;

    assert_eq!(resolved, publisher_url(&server, "/borscht"));
    redirect.assert_async().await;
}

#[tokio::test]
async fn trackers_are_stripped_from_the_redirect_destination() {
    let mut server = setup_mock_server().await;
    let path = format!("/grounding-api-redirect/{OPAQUE_PAYLOAD}");
    let redirect_location = publisher_url(&server, "/recipes/borscht?utm_source=vertex&servings=4");
    let _redirect = create_redirect_mock(
        &mut server,
        "HEAD",
        &path,
        302,
        &redirect_location,
    );
    let _page = create_head_ok_mock(&mut server, "/recipes/borscht");

    let resolved = local_resolver()
        .resolve_wrapper(&wrapper_url(&server, OPAQUE_PAYLOAD))
        .await;
    assert_eq!(resolved, publisher_url(&server, "/recipes/borscht?servings=4"));
}

#[tokio::test]
async fn rejected_head_falls_back_to_get_redirect() {
    let mut server = setup_mock_server().await;
    let path = format!("/grounding-api-redirect/{OPAQUE_PAYLOAD}");
    let head = server
        .mock("HEAD", path.as_str())
        .with_status(405)
        .create_async()
        .await;
    let get_location = publisher_url(&server, "/kvass");
    let get = create_redirect_mock(
        &mut server,
        "GET",
        &path,
        302,
        &get_location,
    );
    let _page = create_html_mock(&mut server, "/kvass", &create_test_html("", "<h1>Kvass</h1>"));

    let resolved = local_resolver()
        .resolve_wrapper(&wrapper_url(&server, OPAQUE_PAYLOAD))
        .await;

    assert_eq!(resolved, publisher_url(&server, "/kvass"));
    head.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn redirect_chain_on_the_wrapper_host_is_followed() {
    let mut server = setup_mock_server().await;
    let first = format!("/grounding-api-redirect/{OPAQUE_PAYLOAD}");
    let _hop = create_redirect_mock(&mut server, "HEAD", &first, 302, "/grounding-api-redirect/next");
    let out_location = publisher_url(&server, "/soup");
    let _out = create_redirect_mock(
        &mut server,
        "HEAD",
        "/grounding-api-redirect/next",
        301,
        &out_location,
    );
    let _page = create_head_ok_mock(&mut server, "/soup");

    let resolved = local_resolver()
        .resolve_wrapper(&wrapper_url(&server, OPAQUE_PAYLOAD))
        .await;
    assert_eq!(resolved, publisher_url(&server, "/soup"));
}

#[tokio::test]
async fn meta_refresh_in_wrapper_page_is_used() {
    let mut server = setup_mock_server().await;
    let path = format!("/grounding-api-redirect/{OPAQUE_PAYLOAD}");
    let html = create_test_html(
        r#"<meta http-equiv="refresh" content="0;url='https://publisher.example/pierogi?fbclid=x'">"#,
        "<p>Redirecting</p>",
    );
    let _page = create_html_mock(&mut server, &path, &html);

    let resolved = local_resolver()
        .resolve_wrapper(&wrapper_url(&server, OPAQUE_PAYLOAD))
        .await;
    assert_eq!(resolved, "https://publisher.example/pierogi");
}

#[tokio::test]
async fn first_outbound_anchor_in_wrapper_page_is_used() {
    let mut server = setup_mock_server().await;
    let path = format!("/grounding-api-redirect/{OPAQUE_PAYLOAD}");
    let self_link = test_url(&server, "/help");
    let html = create_test_html(
        "<title>Redirect notice</title>",
        &format!(
            r#"<a href="{self_link}">Help</a> <a href="https://publisher.example/kvass">Continue</a>"#
        ),
    );
    let _page = create_html_mock(&mut server, &path, &html);

    let resolved = local_resolver()
        .resolve_wrapper(&wrapper_url(&server, OPAQUE_PAYLOAD))
        .await;
    assert_eq!(resolved, "https://publisher.example/kvass");
}

#[tokio::test]
async fn unresolvable_wrapper_is_returned_unchanged() {
    let mut server = setup_mock_server().await;
    let path = format!("/grounding-api-redirect/{OPAQUE_PAYLOAD}");
    let _error = create_error_mock(&mut server, &path, 500);

    let wrapper = wrapper_url(&server, OPAQUE_PAYLOAD);
    assert_eq!(local_resolver().resolve_wrapper(&wrapper).await, wrapper);
}

#[tokio::test]
async fn timed_out_wrapper_is_returned_unchanged() {
    let base = spawn_silent_server().await;
    let wrapper = format!("{base}/grounding-api-redirect/{OPAQUE_PAYLOAD}");
    let resolver = LinkResolver::new(
        ResolverConfig::builder()
            .wrapper_host("127.0.0.1")
            .request_timeout_secs(1)
            .build()
            .unwrap(),
    );

    let started = Instant::now();
    assert_eq!(resolver.resolve_wrapper(&wrapper).await, wrapper);
    // HEAD, GET fallback and the body fetch each give up after one second.
    assert!(started.elapsed() < prompt(6));
}

#[tokio::test]
async fn cancellation_stops_pending_resolution() {
    let base = spawn_silent_server().await;
    let wrapper = format!("{base}/grounding-api-redirect/{OPAQUE_PAYLOAD}");
    let cancel = CancelSignal::new();
    let resolver = local_resolver().with_cancel(cancel.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let started = Instant::now();
    assert_eq!(resolver.resolve_wrapper(&wrapper).await, wrapper);
    assert!(started.elapsed() < prompt(1));
    canceller.await.unwrap();
}

#[tokio::test]
async fn non_wrapper_urls_are_not_touched() {
    let resolver = LinkResolver::default();
    let url = "https://publisher.example/page?utm_source=x";
    assert_eq!(resolver.resolve_wrapper(url).await, url);
}

#[tokio::test]
async fn wrappers_resolve_concurrently_in_input_order() {
    let mut server = setup_mock_server().await;
    let a_location = publisher_url(&server, "/a-page");
    let _a = create_redirect_mock(
        &mut server,
        "HEAD",
        "/grounding-api-redirect/AAAA",
        302,
        &a_location,
    );
    let b_location = publisher_url(&server, "/b-page");
    let _b = create_redirect_mock(
        &mut server,
        "HEAD",
        "/grounding-api-redirect/BBBB",
        302,
        &b_location,
    );
    let _pages = create_head_ok_mock(&mut server, "/[ab]-page");

    let urls = vec![
        wrapper_url(&server, "BBBB"),
        "https://plain.example/".to_string(),
        wrapper_url(&server, "AAAA"),
    ];
    let resolved = local_resolver().resolve_wrappers(&urls).await;
    assert_eq!(
        resolved,
        vec![
            publisher_url(&server, "/b-page"),
            "https://plain.example/".to_string(),
            publisher_url(&server, "/a-page"),
        ]
    );
}

#[tokio::test]
async fn slow_wrappers_do_not_hold_up_their_siblings() {
    let mut server = setup_mock_server().await;
    let fast_location = publisher_url(&server, "/fast");
    let _fast = create_redirect_mock(
        &mut server,
        "HEAD",
        "/grounding-api-redirect/FAST",
        302,
        &fast_location,
    );
    let _page = create_head_ok_mock(&mut server, "/fast");
    let silent = spawn_silent_server().await;
    let slow_one = format!("{silent}/grounding-api-redirect/{OPAQUE_PAYLOAD}");
    let slow_two = format!("{silent}/grounding-api-redirect/AUZIYQ");

    let resolver = LinkResolver::new(
        ResolverConfig::builder()
            .wrapper_host("127.0.0.1")
            .request_timeout_secs(1)
            .build()
            .unwrap(),
    );
    let urls = vec![slow_one.clone(), wrapper_url(&server, "FAST"), slow_two.clone()];

    let started = Instant::now();
    let resolved = resolver.resolve_wrappers(&urls).await;

    assert_eq!(
        resolved,
        vec![slow_one, publisher_url(&server, "/fast"), slow_two]
    );
    // Each silent wrapper spends three one-second attempts; run one after the
    // other they would take six.
    assert!(started.elapsed() < prompt(5));
}
