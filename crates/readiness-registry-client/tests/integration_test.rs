use readiness_registry_client::{HttpRegistryClient, PackageRegistryClient, StaticRegistryClient};
use std::collections::HashMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn version_availability_analyzer_sees_true_when_registry_lists_the_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p2/vendor%2Fnews.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "versions": ["12.4.0", "13.0.0"]
        })))
        .mount(&server)
        .await;

    let client = HttpRegistryClient::with_rate_limit(server.uri(), 100.0);
    assert!(client.has_version_for("vendor/news", "13.0.0").await);
    assert!(!client.has_version_for("vendor/news", "99.0.0").await);
}

#[tokio::test]
async fn a_404_from_the_registry_degrades_to_unavailable_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p2/vendor%2Fmissing.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = HttpRegistryClient::with_rate_limit(server.uri(), 100.0);
    assert!(!client.has_version_for("vendor/missing", "13.0.0").await);
}

#[tokio::test(start_paused = true)]
async fn a_429_from_the_registry_also_degrades_to_unavailable_after_exhausting_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p2/vendor%2Fbusy.json"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = HttpRegistryClient::with_rate_limit(server.uri(), 100.0);
    assert!(!client.has_version_for("vendor/busy", "13.0.0").await);
}

#[tokio::test(start_paused = true)]
async fn a_429_followed_by_success_is_retried_with_backoff() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p2/vendor%2Fflaky.json"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2/vendor%2Fflaky.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "versions": ["13.0.0"]
        })))
        .mount(&server)
        .await;

    let client = HttpRegistryClient::with_rate_limit(server.uri(), 100.0);
    assert!(client.has_version_for("vendor/flaky", "13.0.0").await);
}

#[tokio::test]
async fn static_client_serves_as_an_offline_stand_in() {
    let mut known = HashMap::new();
    known.insert("vendor/news".to_string(), vec!["13.0.0".to_string()]);
    let client: Box<dyn PackageRegistryClient> = Box::new(StaticRegistryClient::new(known));

    assert!(client.has_version_for("vendor/news", "13.0.0").await);
    assert!(!client.has_version_for("vendor/other", "13.0.0").await);
}
