//! Integration tests for `Crawler::run`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Scenarios cover both pagination modes, the
//! strict filter, and every detail-stage degradation path.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sauto_core::{FilterConfig, SearchParams};
use sauto_crawler::{Crawler, RequestAudit, SautoClient, VecSink};

const LISTING_BASE: &str = "https://www.sauto.cz/osobni/detail";

fn test_crawler(server: &MockServer, filter: FilterConfig) -> Crawler {
    let client = SautoClient::new(
        &format!("{}/api/v1/items/search", server.uri()),
        &format!("{}/api/v1/items", server.uri()),
        5,
        "sauto-test/0.1",
    )
    .expect("failed to build test client");
    Crawler::new(client, filter, LISTING_BASE, 4, 0)
}

/// Minimal listing fixture with both slugs and a dealer premise.
fn listing_json(id: i64, manufacturer: &str, model: &str) -> Value {
    json!({
        "id": id,
        "manufacturer_cb": {"name": manufacturer, "seo_name": manufacturer},
        "model_cb": {"name": model, "seo_name": model},
        "premise": {"id": 1},
        "price": 250_000,
    })
}

fn detail_json(id: i64) -> Value {
    json!({"id": id, "vin": format!("TMB{id:08}"), "gallery": []})
}

async fn mount_search_page(server: &MockServer, offset: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/items/search"))
        .and(query_param("offset", offset))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, id: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/items/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&detail_json(id)))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Pagination with a known total
// ---------------------------------------------------------------------------

#[tokio::test]
async fn known_total_crawl_walks_pages_and_enriches_every_record() {
    let server = MockServer::start().await;

    mount_search_page(
        &server,
        "0",
        json!({
            "results": [listing_json(1, "skoda", "octavia"), listing_json(2, "skoda", "octavia")],
            "pagination": {"total": 3},
        }),
    )
    .await;
    mount_search_page(
        &server,
        "2",
        json!({
            "results": [listing_json(3, "skoda", "octavia")],
            "pagination": {"total": 3},
        }),
    )
    .await;
    for id in [1, 2, 3] {
        mount_detail(&server, id).await;
    }

    let crawler = test_crawler(&server, FilterConfig::default());
    let mut sink = VecSink::default();
    let params = SearchParams::from_pairs([("limit", "2")]);
    let totals = crawler
        .run(params, &mut sink)
        .await
        .expect("crawl should not fail");

    assert_eq!(totals.pages, 2, "expected exactly two search pages");
    assert_eq!(totals.emitted, 3, "expected all three records emitted");
    assert_eq!(sink.records.len(), 3);

    let mut ids: Vec<i64> = sink.records.iter().filter_map(|r| r.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);

    for record in &sink.records {
        assert!(record.detail_fetch_ok, "detail fetch should have succeeded");
        let detail = record.detail_raw.as_ref().expect("detail payload attached");
        assert_eq!(detail["id"], record.id.map(Value::from).unwrap());
        assert!(record.detail_error.is_none());
        assert_eq!(record.seller_type.as_str(), "bazar");
        let id = record.id.expect("record id");
        assert_eq!(
            record.url.as_deref(),
            Some(format!("{LISTING_BASE}/skoda/octavia/{id}").as_str())
        );
    }
    // Mock expectations verify on drop that no third page was requested.
}

// ---------------------------------------------------------------------------
// Pagination fallback with an unknown total
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_total_continues_on_full_page_and_stops_on_short_page() {
    let server = MockServer::start().await;

    mount_search_page(
        &server,
        "0",
        json!({"results": [listing_json(1, "skoda", "octavia"), listing_json(2, "skoda", "octavia")]}),
    )
    .await;
    mount_search_page(
        &server,
        "2",
        json!({"results": [listing_json(3, "skoda", "octavia")]}),
    )
    .await;
    for id in [1, 2, 3] {
        mount_detail(&server, id).await;
    }

    let crawler = test_crawler(&server, FilterConfig::default());
    let mut sink = VecSink::default();
    let params = SearchParams::from_pairs([("limit", "2")]);
    let totals = crawler
        .run(params, &mut sink)
        .await
        .expect("crawl should not fail");

    assert_eq!(
        totals.pages, 2,
        "a short page under unknown total must terminate the crawl"
    );
    assert_eq!(totals.emitted, 3);
}

// ---------------------------------------------------------------------------
// Strict filter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn strict_filter_drops_mismatched_records_before_detail_stage() {
    let server = MockServer::start().await;

    mount_search_page(
        &server,
        "0",
        json!({
            "results": [listing_json(1, "skoda", "octavia"), listing_json(2, "opel", "astra")],
            "total": 2,
        }),
    )
    .await;
    mount_detail(&server, 1).await;
    // The rejected record must never reach the detail stage.
    Mock::given(method("GET"))
        .and(path("/api/v1/items/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&detail_json(2)))
        .expect(0)
        .mount(&server)
        .await;

    let filter = FilterConfig {
        manufacturer_seo: Some("skoda".to_string()),
        ..FilterConfig::default()
    };
    let crawler = test_crawler(&server, filter);
    let mut sink = VecSink::default();
    let totals = crawler
        .run(SearchParams::from_pairs([("limit", "35")]), &mut sink)
        .await
        .expect("crawl should not fail");

    assert_eq!(totals.emitted, 1);
    assert_eq!(totals.filtered_out, 1);
    assert_eq!(sink.records.len(), 1);
    assert_eq!(sink.records[0].id, Some(1));
}

// ---------------------------------------------------------------------------
// Detail-stage degradation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detail_transport_failure_degrades_record_but_emits_it_once() {
    let server = MockServer::start().await;

    mount_search_page(
        &server,
        "0",
        json!({"results": [listing_json(7, "skoda", "octavia")], "total": 1}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/items/7"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let crawler = test_crawler(&server, FilterConfig::default());
    let mut sink = VecSink::default();
    let totals = crawler
        .run(SearchParams::from_pairs([("limit", "35")]), &mut sink)
        .await
        .expect("crawl should not fail");

    assert_eq!(totals.emitted, 1, "degraded record must still be emitted");
    assert_eq!(totals.detail_failures, 1);
    assert_eq!(sink.records.len(), 1, "record must be emitted exactly once");

    let record = &sink.records[0];
    assert!(!record.detail_fetch_ok);
    assert!(record.detail_raw.is_none());
    let error = record
        .detail_error
        .as_deref()
        .expect("transport failure must carry an error description");
    assert!(error.contains("500"), "got: {error}");
}

#[tokio::test]
async fn detail_parse_failure_degrades_record_without_error_description() {
    let server = MockServer::start().await;

    mount_search_page(
        &server,
        "0",
        json!({"results": [listing_json(7, "skoda", "octavia")], "total": 1}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/items/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let crawler = test_crawler(&server, FilterConfig::default());
    let mut sink = VecSink::default();
    let totals = crawler
        .run(SearchParams::from_pairs([("limit", "35")]), &mut sink)
        .await
        .expect("crawl should not fail");

    assert_eq!(totals.emitted, 1);
    assert_eq!(totals.detail_failures, 1);
    let record = &sink.records[0];
    assert!(!record.detail_fetch_ok);
    assert!(record.detail_raw.is_none());
    assert!(
        record.detail_error.is_none(),
        "parse failures do not attach an error description"
    );
}

#[tokio::test]
async fn record_without_id_is_emitted_immediately_with_no_detail_request() {
    let server = MockServer::start().await;

    mount_search_page(
        &server,
        "0",
        json!({
            "results": [{
                "manufacturer_cb": {"name": "Škoda", "seo_name": "skoda"},
                "model_cb": {"name": "Octavia", "seo_name": "octavia"},
                "price": 99_000,
            }],
            "total": 1,
        }),
    )
    .await;
    // Any detail request at all would be a bug.
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/items/\d+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = test_crawler(&server, FilterConfig::default());
    let mut sink = VecSink::default();
    let totals = crawler
        .run(SearchParams::from_pairs([("limit", "35")]), &mut sink)
        .await
        .expect("crawl should not fail");

    assert_eq!(totals.emitted, 1);
    assert_eq!(totals.detail_failures, 0);
    let record = &sink.records[0];
    assert!(!record.detail_fetch_ok);
    assert!(record.detail_raw.is_none());
    assert!(record.detail_error.is_none());
    assert!(record.url.is_none(), "no id means no canonical listing url");
}

// ---------------------------------------------------------------------------
// Search-stage failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unparseable_search_body_terminates_without_failing_the_crawl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/items/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
        .mount(&server)
        .await;

    let crawler = test_crawler(&server, FilterConfig::default());
    let mut sink = VecSink::default();
    let totals = crawler
        .run(SearchParams::from_pairs([("limit", "35")]), &mut sink)
        .await
        .expect("a search parse failure is recovered, not propagated");

    assert_eq!(totals.pages, 0);
    assert_eq!(totals.emitted, 0);
    assert!(sink.records.is_empty());
}

#[tokio::test]
async fn second_page_failure_keeps_first_page_records() {
    let server = MockServer::start().await;

    mount_search_page(
        &server,
        "0",
        json!({
            "results": [listing_json(1, "skoda", "octavia"), listing_json(2, "skoda", "octavia")],
            "total": 4,
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/items/search"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    for id in [1, 2] {
        mount_detail(&server, id).await;
    }

    let crawler = test_crawler(&server, FilterConfig::default());
    let mut sink = VecSink::default();
    let totals = crawler
        .run(SearchParams::from_pairs([("limit", "2")]), &mut sink)
        .await
        .expect("a page-level failure is recovered, not propagated");

    assert_eq!(totals.pages, 1, "only the first page parsed successfully");
    assert_eq!(
        totals.emitted, 2,
        "records from the first page survive a later page failure"
    );
}

// ---------------------------------------------------------------------------
// Request audit
// ---------------------------------------------------------------------------

/// Collects dispatched URLs instead of writing them to a file.
#[derive(Default)]
struct CapturingAudit {
    urls: Mutex<Vec<String>>,
}

impl RequestAudit for CapturingAudit {
    fn request_dispatched(&self, url: &str) {
        self.urls
            .lock()
            .expect("audit mutex not poisoned")
            .push(url.to_string());
    }
}

#[tokio::test]
async fn every_dispatched_request_is_reported_to_the_audit() {
    let server = MockServer::start().await;

    mount_search_page(
        &server,
        "0",
        json!({"results": [listing_json(1, "skoda", "octavia")], "total": 1}),
    )
    .await;
    mount_detail(&server, 1).await;

    let audit = Arc::new(CapturingAudit::default());
    let client = SautoClient::new(
        &format!("{}/api/v1/items/search", server.uri()),
        &format!("{}/api/v1/items", server.uri()),
        5,
        "sauto-test/0.1",
    )
    .expect("failed to build test client")
    .with_audit(Arc::clone(&audit) as Arc<dyn RequestAudit>);
    let crawler = Crawler::new(client, FilterConfig::default(), LISTING_BASE, 4, 0);

    let mut sink = VecSink::default();
    crawler
        .run(SearchParams::from_pairs([("limit", "35")]), &mut sink)
        .await
        .expect("crawl should not fail");

    let urls = audit.urls.lock().expect("audit mutex not poisoned");
    assert_eq!(urls.len(), 2, "one search page plus one detail fetch");
    assert!(urls[0].contains("/api/v1/items/search?"), "got: {}", urls[0]);
    assert!(urls[0].contains("offset=0"), "got: {}", urls[0]);
    assert!(urls[1].ends_with("/api/v1/items/1"), "got: {}", urls[1]);
}

// ---------------------------------------------------------------------------
// Empty result sets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_results_array_is_treated_as_an_empty_page() {
    let server = MockServer::start().await;

    mount_search_page(&server, "0", json!({"total": 0})).await;

    let crawler = test_crawler(&server, FilterConfig::default());
    let mut sink = VecSink::default();
    let totals = crawler
        .run(SearchParams::from_pairs([("limit", "35")]), &mut sink)
        .await
        .expect("crawl should not fail");

    assert_eq!(totals.pages, 1);
    assert_eq!(totals.emitted, 0);
}
