use hound_relay::config::parse_config;
use hound_relay::dispatch::{Dispatcher, CHINESE_ACCEPT_LANGUAGE};
use hound_relay::exec::{RetryOutcome, RetryPolicy, TaskFailure};
use hound_relay::intent::EngineSelectionMode;
use hound_relay::{Config, SearchEngine};
use std::time::Duration;
use wiremock::matchers::{headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Points every engine at the mock server, one path per engine
fn config_for(server: &MockServer, extra: &str) -> Config {
    let mut toml = String::new();
    for engine in SearchEngine::ALL {
        toml.push_str(&format!(
            "[engines.{name}]\nbase-url = \"{uri}/{name}\"\nquery-param = \"q\"\n\n",
            name = engine.as_str(),
            uri = server.uri()
        ));
    }
    toml.push_str(extra);
    parse_config(&toml).expect("test config should be valid")
}

/// `accept-language` split the way wiremock compares multi-value headers
fn chinese_language_ranges() -> Vec<&'static str> {
    CHINESE_ACCEPT_LANGUAGE.split(',').map(str::trim).collect()
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(2, Duration::from_millis(5)).with_jitter(Duration::ZERO)
}

#[tokio::test]
async fn test_explicit_search_hits_named_engine() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("bing results"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher =
        Dispatcher::new(config_for(&mock_server, "")).with_retry_policy(fast_policy());
    let response = dispatcher.search("用Bing搜索 tokio runtime").await.unwrap();

    assert_eq!(response.plan.engine, SearchEngine::Bing);
    assert_eq!(response.plan.mode, EngineSelectionMode::Explicit);
    assert!(response.plan.url.contains("q="));
    assert_eq!(response.outcome.payload().unwrap().body, "bing results");
}

#[tokio::test]
async fn test_implicit_privacy_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/duckduckgo"))
        .and(headers("accept-language", chinese_language_ranges()))
        .respond_with(ResponseTemplate::new(200).set_body_string("ddg"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher =
        Dispatcher::new(config_for(&mock_server, "")).with_retry_policy(fast_policy());
    let response = dispatcher.search("匿名搜索隐私信息").await.unwrap();

    assert_eq!(response.plan.engine, SearchEngine::DuckDuckGo);
    assert_eq!(response.plan.mode, EngineSelectionMode::Implicit);
    assert!(response.outcome.is_success());
}

#[tokio::test]
async fn test_search_failure_is_reported_as_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/google"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dispatcher =
        Dispatcher::new(config_for(&mock_server, "")).with_retry_policy(fast_policy());
    let response = dispatcher.search("hello world").await.unwrap();

    assert_eq!(response.plan.mode, EngineSelectionMode::Auto);
    assert_eq!(response.outcome.attempts(), 3);
    assert!(response
        .outcome
        .failure_message()
        .unwrap()
        .contains("502"));
}

#[tokio::test]
async fn test_fetch_all_mixed_results_in_order() {
    let mock_server = MockServer::start().await;

    for page in ["a", "c"] {
        Mock::given(method("GET"))
            .and(path(format!("/{}", page)))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::new(config_for(
        &mock_server,
        "[concurrency]\nmax-concurrent = 2\n",
    ))
    .with_retry_policy(fast_policy());

    let urls: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|p| format!("{}/{}", mock_server.uri(), p))
        .collect();
    let results = dispatcher.fetch_all(&urls).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().payload().unwrap().body, "a");
    let missing = results[1].as_ref().unwrap();
    assert!(!missing.is_success());
    assert_eq!(missing.attempts(), 3);
    assert_eq!(results[2].as_ref().unwrap().payload().unwrap().body, "c");
}

#[tokio::test]
async fn test_fetch_all_respects_deadline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::new(config_for(
        &mock_server,
        "[concurrency]\ndeadline-secs = 1\n",
    ));

    let urls = vec![format!("{}/slow", mock_server.uri())];
    let results = dispatcher.fetch_all(&urls).await;

    // Either layer may notice the deadline first
    match &results[0] {
        Ok(RetryOutcome::DeadlineExceeded { .. }) | Err(TaskFailure::DeadlineExceeded) => {}
        other => panic!("expected a deadline failure, got {:?}", other),
    }
}
