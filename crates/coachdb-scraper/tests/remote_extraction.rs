//! Integration tests for `RemoteExtractionClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers the happy path, the API error envelope,
//! non-2xx statuses, retry behavior, and the orchestrator-level
//! retry-then-succeed scenario.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coachdb_core::DifficultTargets;
use coachdb_scraper::{
    AcquisitionMethod, HybridOrchestrator, Pacer, RemoteExtractionClient, ScrapeError,
    ScrapeMethod, StealthScraper, Target,
};

fn test_client(base_url: &str) -> RemoteExtractionClient {
    RemoteExtractionClient::with_base_url("test-key", 5, "coachdb-test/0.1", 0, 0, base_url)
        .expect("failed to build test client")
}

fn retrying_client(base_url: &str, max_retries: u32) -> RemoteExtractionClient {
    RemoteExtractionClient::with_base_url("test-key", 5, "coachdb-test/0.1", max_retries, 0, base_url)
        .expect("failed to build test client")
}

fn test_target(base_url: &str) -> Target {
    Target {
        name: "Lincoln High School".to_string(),
        slug: "lincoln-high-school".to_string(),
        base_url: base_url.to_string(),
    }
}

fn markdown_body(markdown: &str) -> serde_json::Value {
    json!({ "success": true, "data": { "markdown": markdown } })
}

const STAFF_TABLE: &str = "\
| [Jane Doe](https://athletics.test/jane) | Head Basketball Coach |
| [Mike Ross](https://athletics.test/mike) | Assistant Basketball Coach |
| [Tom Bell](https://athletics.test/tom) | Recruiting Coordinator |";

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_content_returns_markdown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&markdown_body("# Coaching Staff")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let content = client
        .fetch_content("https://athletics.test")
        .await
        .expect("fetch should succeed");

    assert_eq!(content.source_url, "https://athletics.test");
    assert_eq!(content.text, "# Coaching Staff");
    assert_eq!(content.method, AcquisitionMethod::RemoteExtraction);
}

#[tokio::test]
async fn extract_staff_runs_the_pattern_engine() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&markdown_body(STAFF_TABLE)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let yielded = client
        .extract_staff(&test_target("https://athletics.test"))
        .await
        .expect("extraction should succeed");

    assert_eq!(yielded.records.len(), 3);
    assert_eq!(yielded.records[0].name, "Jane Doe");
    assert_eq!(yielded.records[0].title, "Head Coach");
    assert_eq!(yielded.records[0].sport, "Basketball");
    assert!(yielded
        .records
        .iter()
        .all(|r| r.method == AcquisitionMethod::RemoteExtraction));
}

// ---------------------------------------------------------------------------
// Error envelope and statuses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_reported_failure_is_an_extraction_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "success": false,
            "error": "target returned a bot challenge"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_content("https://athletics.test").await;

    match result {
        Err(ScrapeError::Extraction { reason, .. }) => {
            assert!(reason.contains("bot challenge"), "reason: {reason}");
        }
        other => panic!("expected Extraction error, got: {other:?}"),
    }
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = retrying_client(&server.uri(), 3);
    let result = client.fetch_content("https://athletics.test").await;

    assert!(
        matches!(result, Err(ScrapeError::Api { status: 404, .. })),
        "expected Api(404), got: {result:?}"
    );
}

#[tokio::test]
async fn empty_markdown_is_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&markdown_body("   ")))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_content("https://athletics.test").await;

    assert!(matches!(result, Err(ScrapeError::NoContent { .. })));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_content("https://athletics.test").await;

    assert!(matches!(result, Err(ScrapeError::Deserialize { .. })));
}

// ---------------------------------------------------------------------------
// Retry behavior
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rate_limit_is_retried_until_success() {
    let server = MockServer::start().await;

    // First two requests are rate limited, the third succeeds.
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&markdown_body("# Staff")))
        .mount(&server)
        .await;

    let client = retrying_client(&server.uri(), 2);
    let content = client
        .fetch_content("https://athletics.test")
        .await
        .expect("should succeed on the third attempt");

    assert_eq!(content.text, "# Staff");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn rate_limit_error_surfaces_after_retries_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let client = retrying_client(&server.uri(), 1);
    let result = client.fetch_content("https://athletics.test").await;

    match result {
        Err(ScrapeError::RateLimited {
            retry_after_secs, ..
        }) => assert_eq!(retry_after_secs, 7),
        other => panic!("expected RateLimited, got: {other:?}"),
    }
    // 1 retry → 2 total attempts.
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&markdown_body("# Staff")))
        .mount(&server)
        .await;

    let client = retrying_client(&server.uri(), 1);
    let content = client
        .fetch_content("https://athletics.test")
        .await
        .expect("should succeed after one 503");
    assert_eq!(content.text, "# Staff");
}

// ---------------------------------------------------------------------------
// Orchestrator-level retry scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn target_succeeds_after_two_transient_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&markdown_body(STAFF_TABLE)))
        .mount(&server)
        .await;

    let remote = retrying_client(&server.uri(), 2);
    let stealth = StealthScraper::new("coachdb-test/0.1", 5, 0, 0, Pacer::zero());
    let orchestrator = HybridOrchestrator::new(
        Some(remote),
        stealth,
        DifficultTargets::default(),
        3,
    );

    let result = orchestrator
        .scrape_target(&test_target("https://athletics.test"), ScrapeMethod::Hybrid)
        .await;

    assert!(result.success, "attempt should succeed: {result:?}");
    assert_eq!(result.method, AcquisitionMethod::RemoteExtraction);
    assert_eq!(result.records.len(), 3);
    // Elapsed time covers all three attempts, not just the last one.
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
    assert!(result.error.is_none());
}
