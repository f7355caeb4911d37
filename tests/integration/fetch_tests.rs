use hound_relay::dispatch::{Fetcher, HttpFetcher};
use hound_relay::exec::{execute_with_retry, RetryOutcome, RetryPolicy};
use hound_relay::stealth::IdentityPool;
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, Duration::from_millis(5)).with_jitter(Duration::ZERO)
}

#[tokio::test]
async fn test_fetch_presents_identity_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header_exists("user-agent"))
        .and(header_exists("sec-ch-ua"))
        .and(header("sec-fetch-mode", "navigate"))
        .and(header("dnt", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body>hello</body></html>",
            "text/html; charset=utf-8",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = IdentityPool::default().next_session();
    let url = format!("{}/page", mock_server.uri());

    let result = HttpFetcher::default()
        .fetch(&url, &session)
        .await
        .expect("fetch should not error");

    assert!(result.success);
    let page = result.payload.expect("successful fetch carries a page");
    assert_eq!(page.status_code, 200);
    assert_eq!(page.final_url, url);
    assert!(page.content_type.starts_with("text/html"));
    assert!(page.body.contains("hello"));
}

#[tokio::test]
async fn test_not_found_is_a_failed_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let session = IdentityPool::default().next_session();
    let result = HttpFetcher::default()
        .fetch(&format!("{}/missing", mock_server.uri()), &session)
        .await
        .expect("HTTP errors are results, not errors");

    assert!(!result.success);
    assert!(result.error_message.unwrap().contains("404"));
}

#[tokio::test]
async fn test_rate_limit_is_a_failed_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let session = IdentityPool::default().next_session();
    let result = HttpFetcher::default()
        .fetch(&mock_server.uri(), &session)
        .await
        .unwrap();

    assert!(!result.success);
    assert!(result.error_message.unwrap().contains("rate limited"));
}

#[tokio::test]
async fn test_retry_recovers_from_server_errors() {
    let mock_server = MockServer::start().await;

    // Mounted first, so it answers until it has been used twice
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::default();
    let session = IdentityPool::default().next_session();
    let url = format!("{}/flaky", mock_server.uri());

    let outcome =
        execute_with_retry(&fast_policy(3), None, || fetcher.fetch(&url, &session)).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.attempts(), 3);
    assert_eq!(outcome.payload().unwrap().body, "recovered");
}

#[tokio::test]
async fn test_retry_exhausts_on_persistent_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::default();
    let session = IdentityPool::default().next_session();
    let url = format!("{}/down", mock_server.uri());

    let outcome =
        execute_with_retry(&fast_policy(3), None, || fetcher.fetch(&url, &session)).await;

    match &outcome {
        RetryOutcome::Exhausted {
            attempts,
            last_error,
        } => {
            assert_eq!(*attempts, 4);
            assert!(last_error.contains("503"));
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }

    let flattened = outcome.into_fetch_result();
    assert!(!flattened.success);
    assert!(flattened
        .error_message
        .unwrap()
        .starts_with("Failed after 4 attempts"));
}

#[tokio::test]
async fn test_connection_refused_is_retried() {
    // Bind and drop a listener to get a port nothing listens on
    let closed_uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}/", listener.local_addr().unwrap())
    };

    let fetcher = HttpFetcher::default();
    let session = IdentityPool::default().next_session();

    let outcome =
        execute_with_retry(&fast_policy(1), None, || fetcher.fetch(&closed_uri, &session)).await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.attempts(), 2);
}
