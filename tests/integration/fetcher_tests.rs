use crate::common::{html_page, mount_page, refused_address, silent_server, test_fetcher};
use std::time::{Duration, Instant};
use title_scout::config::DEFAULT_USER_AGENT;
use title_scout::fetch::{Fetcher, FetcherConfig, PageTitle};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_extracts_trimmed_title() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        "<html><head><title>  Example  </title></head></html>".to_string(),
        Duration::ZERO,
    )
    .await;

    let address = format!("{}/", mock_server.uri());
    let result = test_fetcher(2000).fetch(&address).await;

    assert_eq!(result.address, address);
    assert_eq!(result.title, PageTitle::Extracted("Example".to_string()));
}

#[tokio::test]
async fn test_page_without_title_yields_sentinel() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/untitled",
        "<html><body>No head at all</body></html>".to_string(),
        Duration::ZERO,
    )
    .await;

    let result = test_fetcher(2000)
        .fetch(&format!("{}/untitled", mock_server.uri()))
        .await;

    assert_eq!(result.title, PageTitle::NoResponse);
    assert_eq!(result.title.as_str(), "NO RESPONSE");
}

#[tokio::test]
async fn test_empty_body_yields_sentinel() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let result = test_fetcher(2000).fetch(&mock_server.uri()).await;
    assert_eq!(result.title, PageTitle::NoResponse);
}

#[tokio::test]
async fn test_first_of_two_titles_is_used() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        "<title>First</title><title>Second</title>".to_string(),
        Duration::ZERO,
    )
    .await;

    let result = test_fetcher(2000).fetch(&mock_server.uri()).await;
    assert_eq!(result.title, PageTitle::Extracted("First".to_string()));
}

#[tokio::test]
async fn test_error_status_body_is_still_searched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(html_page("Page Not Found")))
        .mount(&mock_server)
        .await;

    let result = test_fetcher(2000)
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await;

    assert_eq!(
        result.title,
        PageTitle::Extracted("Page Not Found".to_string())
    );
}

#[tokio::test]
async fn test_redirects_are_not_followed() {
    let mock_server = MockServer::start().await;
    let target = format!("{}/target", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/target"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Target")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = test_fetcher(2000)
        .fetch(&format!("{}/moved", mock_server.uri()))
        .await;

    assert_eq!(result.title, PageTitle::NoResponse);
}

#[tokio::test]
async fn test_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "TitleScoutTest/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Agent Checked")))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(FetcherConfig {
        user_agent: "TitleScoutTest/1.0".to_string(),
        ..crate::common::test_fetcher_config(2000)
    })
    .unwrap();
    let result = fetcher.fetch(&mock_server.uri()).await;

    assert_eq!(result.title, PageTitle::Extracted("Agent Checked".to_string()));
}

#[test]
fn test_default_user_agent_looks_like_a_browser() {
    let config = crate::common::test_fetcher_config(2000);
    assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    assert!(DEFAULT_USER_AGENT.starts_with("Mozilla/5.0"));
}

#[tokio::test]
async fn test_path_and_query_are_forwarded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Results")))
        .mount(&mock_server)
        .await;

    let result = test_fetcher(2000)
        .fetch(&format!("{}/search?q=rust", mock_server.uri()))
        .await;

    assert_eq!(result.title, PageTitle::Extracted("Results".to_string()));
}

#[tokio::test]
async fn test_connection_refused_yields_sentinel() {
    let address = refused_address();
    let fetcher = test_fetcher(2000);

    let result = fetcher.fetch(&address).await;
    assert_eq!(result.title, PageTitle::NoResponse);

    let failure = fetcher.try_fetch(&address).await.unwrap_err();
    assert_eq!(failure.kind(), "connection");
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let (_listener, address) = silent_server();
    let fetcher = test_fetcher(300);

    let started = Instant::now();
    let result = fetcher.fetch(&address).await;
    let elapsed = started.elapsed();

    assert_eq!(result.title, PageTitle::NoResponse);
    assert!(
        elapsed < Duration::from_secs(2),
        "Fetch should give up near its deadline, took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_timeout_closes_the_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}/", listener.local_addr().unwrap());
    let fetch = tokio::spawn(async move { test_fetcher(300).fetch(&address).await });

    let (mut socket, _) = listener.accept().await.unwrap();
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "Connection closed before the request was sent");
        request.extend_from_slice(&buf[..n]);
    }
    assert!(request.starts_with(b"GET / HTTP/1.1\r\n"));

    // Never answer; the client side must hang up once its deadline fires.
    let read = tokio::time::timeout(Duration::from_secs(2), socket.read(&mut buf))
        .await
        .expect("Connection still open long after the fetch deadline")
        .unwrap();
    assert_eq!(read, 0);

    let result = fetch.await.unwrap();
    assert_eq!(result.title, PageTitle::NoResponse);
}

#[tokio::test]
async fn test_slow_response_reports_timeout() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/slow",
        html_page("Too Late"),
        Duration::from_secs(3),
    )
    .await;

    let failure = test_fetcher(200)
        .try_fetch(&format!("{}/slow", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(failure.kind(), "timeout");
}

#[tokio::test]
async fn test_body_cap_limits_search() {
    let mock_server = MockServer::start().await;
    let padding = "x".repeat(4096);
    mount_page(
        &mock_server,
        "/late-title",
        format!("<html><!-- {} --><title>Buried</title></html>", padding),
        Duration::ZERO,
    )
    .await;
    mount_page(
        &mock_server,
        "/early-title",
        format!("<html><title>Up Front</title><!-- {} --></html>", padding),
        Duration::ZERO,
    )
    .await;

    let fetcher = Fetcher::new(FetcherConfig {
        max_body_bytes: 1024,
        ..crate::common::test_fetcher_config(2000)
    })
    .unwrap();

    let late = fetcher
        .fetch(&format!("{}/late-title", mock_server.uri()))
        .await;
    let early = fetcher
        .fetch(&format!("{}/early-title", mock_server.uri()))
        .await;

    assert_eq!(late.title, PageTitle::NoResponse);
    assert_eq!(early.title, PageTitle::Extracted("Up Front".to_string()));
}

#[tokio::test]
async fn test_invalid_utf8_is_decoded_lossily() {
    let mock_server = MockServer::start().await;
    let mut body = b"<html><head><meta charset=\"latin1\"><!-- \xff\xfe --><title>Caf".to_vec();
    body.extend_from_slice(b"\xe9</title></head></html>");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(&mock_server)
        .await;

    let result = test_fetcher(2000).fetch(&mock_server.uri()).await;
    assert_eq!(
        result.title,
        PageTitle::Extracted("Caf\u{fffd}".to_string())
    );
}

#[tokio::test]
async fn test_unprefixed_address_defaults_to_https() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html_page("Plain Only"), Duration::ZERO).await;

    // The mock server only speaks plain HTTP, so a TLS attempt cannot succeed.
    let address = mock_server.uri().trim_start_matches("http://").to_string();
    let result = test_fetcher(2000).fetch(&address).await;

    assert_eq!(result.address, address);
    assert_eq!(result.title, PageTitle::NoResponse);
}
